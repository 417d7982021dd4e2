//! 题目目录
//!
//! 由 problems.csv 构建，每次运行只构建一次，之后以不可变引用传给各个需要查表的函数。
//! 文件没有表头，每行格式为 `book,ch,num,label,soln`。

use crate::error::{AppResult, CatalogError};
use crate::models::problem::{ProblemKey, ProblemNumber, ProblemRef};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// 通配符
pub const WILDCARD: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    label: String,
    key: ProblemKey,
    has_solution: bool,
}

/// 题目目录：标签 <-> 题目，以及书后是否有答案
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    book: String,
    // 保留文件中的顺序，通配符匹配结果按此顺序返回
    entries: Vec<Entry>,
    by_label: HashMap<String, usize>,
    by_key: HashMap<ProblemKey, usize>,
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9\-._]*$").expect("标签正则表达式无效"))
}

impl Catalog {
    /// 解析 problems.csv 内容，只保留属于 `book` 的行
    pub fn parse(content: &str, book: &str, path: &str) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut catalog = Catalog {
            book: book.to_string(),
            ..Default::default()
        };

        for record in reader.records() {
            let record = record?;
            if record.len() != 5 {
                debug!("跳过格式不符的行: {:?}", record);
                continue;
            }
            let (b, ch, num, label, soln) = (&record[0], &record[1], &record[2], &record[3], &record[4]);
            // 即使不属于当前教材，题号格式也必须合法
            let number = ProblemNumber::parse(num)?;
            if b != book || label == "deleted" {
                continue;
            }
            let chapter: u32 = match ch.parse() {
                Ok(c) => c,
                Err(_) => {
                    debug!("跳过章节号非法的行: {:?}", record);
                    continue;
                }
            };
            catalog.insert(
                label.to_string(),
                ProblemKey::new(chapter, number),
                soln == "1",
                path,
            )?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, label: String, key: ProblemKey, has_solution: bool, path: &str) -> AppResult<()> {
        if self.by_label.contains_key(&label) {
            return Err(CatalogError::DuplicateLabel {
                label,
                path: path.to_string(),
                book: self.book.clone(),
            }
            .into());
        }
        if let Some(&idx) = self.by_key.get(&key) {
            return Err(CatalogError::TwoLabels {
                problem: key.to_string(),
                first: self.entries[idx].label.clone(),
                second: label,
                book: self.book.clone(),
            }
            .into());
        }
        let idx = self.entries.len();
        self.by_label.insert(label.clone(), idx);
        self.by_key.insert(key.clone(), idx);
        self.entries.push(Entry {
            label,
            key,
            has_solution,
        });
        Ok(())
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_for_label(&self, label: &str) -> Option<&ProblemKey> {
        self.by_label.get(label).map(|&i| &self.entries[i].key)
    }

    pub fn label_for(&self, key: &ProblemKey) -> Option<&str> {
        self.by_key.get(key).map(|&i| self.entries[i].label.as_str())
    }

    /// 书后是否有答案；目录中没有的题目视为没有
    pub fn has_solution(&self, key: &ProblemKey) -> bool {
        self.by_key
            .get(key)
            .map(|&i| self.entries[i].has_solution)
            .unwrap_or(false)
    }

    /// 所有题目，按文件顺序
    pub fn keys(&self) -> impl Iterator<Item = &ProblemKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// 把标签（可带 `...` 通配符）解析为题目列表
    ///
    /// 不带通配符的未知标签只记录警告并返回空列表；通配符一个都匹配不上则报错。
    pub fn resolve_label(&self, label: &str, parts: &str) -> AppResult<Vec<ProblemRef>> {
        if !label_regex().is_match(label) {
            return Err(CatalogError::IllegalLabel {
                label: label.to_string(),
            }
            .into());
        }

        if label.contains(WILDCARD) {
            return self.resolve_wildcard(label, parts);
        }

        match self.key_for_label(label) {
            Some(key) => Ok(vec![ProblemRef::new(key.chapter, key.number.clone(), parts)]),
            None => {
                warn!("⚠️ 标签 {} 不在 problems.csv 中，可能需要重新生成题目目录", label);
                Ok(Vec::new())
            }
        }
    }

    fn resolve_wildcard(&self, pattern: &str, parts: &str) -> AppResult<Vec<ProblemRef>> {
        let body = pattern
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let re = Regex::new(&format!("^{}$", body)).map_err(|_| CatalogError::IllegalLabel {
            label: pattern.to_string(),
        })?;

        let matches: Vec<ProblemRef> = self
            .entries
            .iter()
            .filter(|e| re.is_match(&e.label))
            .map(|e| ProblemRef::new(e.key.chapter, e.key.number.clone(), parts))
            .collect();

        if matches.is_empty() {
            return Err(CatalogError::WildcardNoMatch {
                pattern: pattern.to_string(),
            }
            .into());
        }
        Ok(matches)
    }
}
