//! 题目描述与排序 - 业务能力层
//!
//! 生成 `2(5|7)` 这类简短描述，并提供各报表共用的题组排序规则。

use crate::models::group::{FLAG_ONLINE, FLAG_SOLUTION};
use crate::models::{Catalog, FlagSet, IndividualizationGroup, ProblemRef};
use std::cmp::Ordering;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Plain,
    Tex,
    Html,
}

static TEX_FLAGS: phf::Map<char, &'static str> = phf::phf_map! {
    'c' => "$\\int$",
    's' => "${}_\\textup{s}$",
};

static PLAIN_FLAGS: phf::Map<char, &'static str> = phf::phf_map! {
    'c' => "(calculus)",
};

static HTML_FLAGS: phf::Map<char, &'static str> = phf::phf_map! {
    'c' => "&int;",
};

/// 把标记渲染为文本；联网标记 `o` 不显示
pub fn describe_flags(flags: &FlagSet, format: Format) -> String {
    let table = match format {
        Format::Plain => &PLAIN_FLAGS,
        Format::Tex => &TEX_FLAGS,
        Format::Html => &HTML_FLAGS,
    };
    flags
        .iter()
        .filter(|&f| f != FLAG_ONLINE)
        .map(|f| match table.get(&f) {
            Some(s) => (*s).to_string(),
            None => f.to_string(),
        })
        .collect()
}

/// 简短描述：`2-5ab`、`2(5|7)` 或跨章节时的 `(2-5|3-1)`
pub fn describe_group_simple(group: &IndividualizationGroup) -> String {
    if group.len() == 1 {
        let p = group.first();
        return format!("{}-{}", p.chapter, p.number_and_parts());
    }
    match group.common_chapter() {
        Some(ch) => {
            let mut members: Vec<&ProblemRef> = group.members().iter().collect();
            members.sort_by(|a, b| a.number.cmp(&b.number));
            let inner: Vec<String> = members.iter().map(|p| p.number_and_parts()).collect();
            format!("{}({})", ch, inner.join("|"))
        }
        None => {
            let inner: Vec<String> = group
                .members()
                .iter()
                .map(|p| format!("{}-{}", p.chapter, p.number_and_parts()))
                .collect();
            format!("({})", inner.join("|"))
        }
    }
}

/// 题组描述加标记；第一道题书后有答案时补上 `s`
pub fn describe_group(flags: &FlagSet, group: &IndividualizationGroup, format: Format, catalog: &Catalog) -> String {
    let flags = flags_with_solution(flags, group.first(), catalog);
    format!("{}{}", describe_group_simple(group), describe_flags(&flags, format))
}

/// 单道题的描述（带章节），用于网页端的候选题说明
pub fn describe_problem_with_flags(p: &ProblemRef, flags: &FlagSet, format: Format, catalog: &Catalog) -> String {
    let flags = flags_with_solution(flags, p, catalog);
    format!("{}-{}{}", p.chapter, p.number_and_parts(), describe_flags(&flags, format))
}

fn flags_with_solution(flags: &FlagSet, p: &ProblemRef, catalog: &Catalog) -> FlagSet {
    if catalog.has_solution(&p.key()) {
        flags.with(FLAG_SOLUTION)
    } else {
        flags.clone()
    }
}

/// 题组排序：先按章节，再按最小题号；跨章节题组退化为按描述字符串比较
pub fn compare_groups(a: &IndividualizationGroup, b: &IndividualizationGroup) -> Ordering {
    match (a.common_chapter(), b.common_chapter()) {
        (Some(ca), Some(cb)) => ca
            .cmp(&cb)
            .then_with(|| a.lowest_number().cmp(b.lowest_number())),
        _ => describe_group_simple(a).cmp(&describe_group_simple(b)),
    }
}
