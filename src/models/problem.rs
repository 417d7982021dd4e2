//! 题目引用
//!
//! 题号可以带字母前缀（例如 `g7`），因此不能直接当成整数处理。

use crate::error::{AppResult, CatalogError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-z]*)([0-9]+)$").expect("题号正则表达式无效"))
}

/// 题号：可选的小写字母前缀 + 数字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProblemNumber {
    raw: String,
    prefix: String,
    value: u64,
}

impl ProblemNumber {
    /// 解析题号，格式错误时返回错误
    pub fn parse(s: &str) -> AppResult<Self> {
        let caps = number_regex()
            .captures(s)
            .ok_or_else(|| CatalogError::IllegalProblemNumber {
                number: s.to_string(),
            })?;
        let value = caps[2]
            .parse::<u64>()
            .map_err(|_| CatalogError::IllegalProblemNumber {
                number: s.to_string(),
            })?;
        Ok(Self {
            raw: s.to_string(),
            prefix: caps[1].to_string(),
            value,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 字母前缀（没有则为空字符串）
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 数字部分的数值
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl Ord for ProblemNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix
            .cmp(&other.prefix)
            .then(self.value.cmp(&other.value))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for ProblemNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for ProblemNumber {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ProblemNumber::parse(&s).map_err(|e| e.to_string())
    }
}

impl From<ProblemNumber> for String {
    fn from(n: ProblemNumber) -> Self {
        n.raw
    }
}

impl fmt::Display for ProblemNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 章节 + 题号，作为查找表的键
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProblemKey {
    pub chapter: u32,
    pub number: ProblemNumber,
}

impl ProblemKey {
    pub fn new(chapter: u32, number: ProblemNumber) -> Self {
        Self { chapter, number }
    }
}

impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.chapter, self.number)
    }
}

/// 题目引用：章节、题号以及可选的小题（例如 "ab"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemRef {
    pub chapter: u32,
    pub number: ProblemNumber,
    #[serde(default)]
    pub parts: String,
}

impl ProblemRef {
    pub fn new(chapter: u32, number: ProblemNumber, parts: impl Into<String>) -> Self {
        Self {
            chapter,
            number,
            parts: parts.into(),
        }
    }

    pub fn key(&self) -> ProblemKey {
        ProblemKey::new(self.chapter, self.number.clone())
    }

    /// 题号加小题，统一小写，例如 "7ab"
    pub fn number_and_parts(&self) -> String {
        format!("{}{}", self.number, self.parts).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> ProblemNumber {
        ProblemNumber::parse(s).unwrap()
    }

    #[test]
    fn test_parse_plain_and_prefixed() {
        let n = num("7");
        assert_eq!(n.prefix(), "");
        assert_eq!(n.value(), 7);

        let g = num("g12");
        assert_eq!(g.prefix(), "g");
        assert_eq!(g.value(), 12);
        assert_eq!(g.as_str(), "g12");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ProblemNumber::parse("").is_err());
        assert!(ProblemNumber::parse("g").is_err());
        assert!(ProblemNumber::parse("7b").is_err());
        assert!(ProblemNumber::parse("G7").is_err());
    }

    #[test]
    fn test_ordering_prefix_then_numeric() {
        assert!(num("3") < num("7"));
        assert!(num("7") < num("12"));
        assert!(num("12") < num("g1"));
        assert!(num("g7") < num("h3"));
        assert!(num("g2") < num("g10"));
    }

    #[test]
    fn test_leading_zero_numbers_stay_distinct() {
        assert_ne!(num("07"), num("7"));
        assert_ne!(num("07").cmp(&num("7")), Ordering::Equal);
    }

    #[test]
    fn test_number_and_parts_lowercase() {
        let p = ProblemRef::new(3, num("g7"), "AB");
        assert_eq!(p.number_and_parts(), "g7ab");
        assert_eq!(p.key().to_string(), "3-g7");
    }

    #[test]
    fn test_serde_number_as_string() {
        let p = ProblemRef::new(2, num("5"), "");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"chapter":2,"number":"5","parts":""}"#);
        let back: ProblemRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<ProblemRef>(r#"{"chapter":2,"number":"x"}"#).is_err());
    }
}
