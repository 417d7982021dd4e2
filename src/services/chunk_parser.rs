//! 作业流解析 - 业务能力层
//!
//! 一段作业的典型写法：`o:traffic/AB,foo|bar ; *o:baz ; glub`
//! - `;` 分隔标记组，`flags:` 为可选前缀
//! - `,` 分隔个性化题组
//! - `|` 分隔同一题组中可互换的题目
//! - `label/parts` 指定小题

use crate::error::{AppResult, ParseError};
use crate::models::{Catalog, Chunk, FlagGroup, FlagSet, IndividualizationGroup, ParsedStream, RawStream};
use crate::utils::truncate_text;
use tracing::{debug, warn};

/// 超过这个数量的标记很可能是漏写了分号
const SUSPICIOUS_FLAG_COUNT: usize = 6;

const ILLEGAL_FLAG_CHARS: [char; 3] = [',', '|', '/'];

/// 解析一段作业
pub fn parse_hw_chunk(chunk: &str, catalog: &Catalog) -> AppResult<Chunk> {
    debug!("解析作业段 '{}'", truncate_text(chunk, 60));
    let compact: String = chunk.chars().filter(|c| !c.is_whitespace()).collect();

    let mut result = Vec::new();
    for flag_group in compact.split(';') {
        // 与贪婪匹配一致：以最后一个冒号切分
        let (flags, body) = match flag_group.rsplit_once(':') {
            Some((f, b)) => (parse_flags(f, chunk)?, b),
            None => (FlagSet::new(), flag_group),
        };

        let mut groups = Vec::new();
        for group_text in body.split(',') {
            groups.push(resolve_group(group_text, chunk, catalog)?);
        }
        result.push(FlagGroup { flags, groups });
    }
    Ok(result)
}

fn parse_flags(f: &str, chunk: &str) -> AppResult<FlagSet> {
    let mut flags = FlagSet::new();
    let mut duplicated = false;
    for c in f.chars() {
        if !flags.insert(c) {
            duplicated = true;
        }
    }
    if flags.len() > SUSPICIOUS_FLAG_COUNT {
        warn!(
            "⚠️ 输入 '{}' 中的标记 '{}' 超过 {} 个，可能缺少分号",
            chunk, f, SUSPICIOUS_FLAG_COUNT
        );
    }
    if let Some(illegal) = ILLEGAL_FLAG_CHARS.iter().copied().find(|&c| flags.contains(c)) {
        return Err(ParseError::IllegalFlagChar {
            chunk: chunk.to_string(),
            flags: f.to_string(),
            illegal,
        }
        .into());
    }
    if duplicated {
        return Err(ParseError::DuplicateFlag {
            chunk: chunk.to_string(),
            flags: f.to_string(),
        }
        .into());
    }
    Ok(flags)
}

// "foo/B|bar.../AB|baz" -> 个性化题组
fn resolve_group(group_text: &str, chunk: &str, catalog: &Catalog) -> AppResult<IndividualizationGroup> {
    let mut members = Vec::new();
    for alternative in group_text.split('|') {
        let (label, parts) = alternative.rsplit_once('/').unwrap_or((alternative, ""));
        members.extend(catalog.resolve_label(label, parts)?);
    }
    if members.is_empty() {
        return Err(ParseError::UnresolvedGroup {
            chunk: chunk.to_string(),
            group: group_text.to_string(),
        }
        .into());
    }
    IndividualizationGroup::new(members)
}

/// 解析整个作业流
pub fn parse_hw_stream(stream: &RawStream, catalog: &Catalog) -> AppResult<ParsedStream> {
    debug!("📖 作业流 {}：延迟 {}，共 {} 段", stream.stream, stream.delay, stream.chunks.len());
    let chunks = stream
        .chunks
        .iter()
        .map(|c| parse_hw_chunk(c, catalog))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(ParsedStream {
        stream: stream.stream.clone(),
        delay: stream.delay,
        chunks,
        notes: stream.notes.clone(),
    })
}

/// 解析所有作业流
pub fn parse_hw(streams: &[RawStream], catalog: &Catalog) -> AppResult<Vec<ParsedStream>> {
    streams.iter().map(|s| parse_hw_stream(s, catalog)).collect()
}
