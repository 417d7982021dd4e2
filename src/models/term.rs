//! 学期
//!
//! 学期字符串形如 `f14`、`s15`：一个字母表示春/秋季，两位数字表示年份。

use crate::error::{AppResult, ParseError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// 学期序号的起点年份（2014 年春季 = 0），服务端与网页端必须一致
pub const EPOCH_YEAR: i32 = 2014;

/// 春季或秋季
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "s")]
    Spring,
    #[serde(rename = "f")]
    Fall,
}

impl Semester {
    pub fn code(self) -> &'static str {
        match self {
            Semester::Spring => "s",
            Semester::Fall => "f",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "s" => Some(Semester::Spring),
            "f" => Some(Semester::Fall),
            _ => None,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 一个学期：季节 + 四位年份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub semester: Semester,
    pub year: i32,
}

impl Term {
    pub fn new(semester: Semester, year: i32) -> Self {
        Self { semester, year }
    }

    /// 解析 `f14` 形式的学期字符串
    pub fn parse(term: &str) -> AppResult<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^([sf])(\d\d)$").expect("学期正则表达式无效"));

        let illegal = || ParseError::IllegalTerm {
            term: term.to_string(),
        };
        let caps = re.captures(term).ok_or_else(illegal)?;
        let semester = Semester::from_code(&caps[1]).ok_or_else(illegal)?;
        let year: i32 = caps[2].parse().map_err(|_| illegal())?;
        Ok(Self::new(semester, year + 2000))
    }

    /// 学期序号：从 2014 年春季 = 0 开始，每学期加一
    pub fn ordinal(&self) -> i64 {
        let s = (i64::from(self.year) - i64::from(EPOCH_YEAR)) * 2;
        match self.semester {
            Semester::Spring => s,
            Semester::Fall => s + 1,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.semester, self.year)
    }
}
