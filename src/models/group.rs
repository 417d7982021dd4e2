//! 个性化题组与标记
//!
//! 一个个性化题组里的题目可以互相替换，每个学生只会分到其中一道。

use crate::error::{AppResult, ParseError};
use crate::models::problem::{ProblemNumber, ProblemRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 联网作业
pub const FLAG_ONLINE: char = 'o';
/// 附加题
pub const FLAG_EXTRA_CREDIT: char = '*';
/// 需要微积分
pub const FLAG_CALCULUS: char = 'c';
/// 书后有答案
pub const FLAG_SOLUTION: char = 's';

/// 单字符标记集合
///
/// 保留插入顺序，只是为了输出稳定；语义上是无序集合。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FlagSet(Vec<char>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一个标记，已存在时返回 false
    pub fn insert(&mut self, flag: char) -> bool {
        if self.0.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn contains(&self, flag: char) -> bool {
        self.0.contains(&flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    pub fn is_online(&self) -> bool {
        self.contains(FLAG_ONLINE)
    }

    pub fn is_extra_credit(&self) -> bool {
        self.contains(FLAG_EXTRA_CREDIT)
    }

    /// 是否包含 `letters` 中的任意一个字符；`letters` 为空时返回 false
    pub fn contains_any_of(&self, letters: &str) -> bool {
        letters.chars().any(|c| self.contains(c))
    }

    /// 复制一份并加入一个标记
    pub fn with(&self, flag: char) -> Self {
        let mut copy = self.clone();
        copy.insert(flag);
        copy
    }
}

impl From<String> for FlagSet {
    fn from(s: String) -> Self {
        let mut set = FlagSet::new();
        for c in s.chars() {
            set.insert(c);
        }
        set
    }
}

impl From<FlagSet> for String {
    fn from(f: FlagSet) -> Self {
        f.0.into_iter().collect()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// 个性化题组：有序、非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProblemRef>", into = "Vec<ProblemRef>")]
pub struct IndividualizationGroup(Vec<ProblemRef>);

impl IndividualizationGroup {
    pub fn new(members: Vec<ProblemRef>) -> AppResult<Self> {
        if members.is_empty() {
            return Err(ParseError::EmptyGroup.into());
        }
        Ok(Self(members))
    }

    pub fn members(&self) -> &[ProblemRef] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 题组永远非空，这里只为配合 `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &ProblemRef {
        &self.0[0]
    }

    pub fn get(&self, index: usize) -> Option<&ProblemRef> {
        self.0.get(index)
    }

    /// 第一道题的章节，用作整个题组的章节
    pub fn chapter(&self) -> u32 {
        self.first().chapter
    }

    /// 所有题目同属一章时返回该章节
    pub fn common_chapter(&self) -> Option<u32> {
        let ch = self.chapter();
        self.0.iter().all(|p| p.chapter == ch).then_some(ch)
    }

    /// 候选题号列表，顺序与输入一致
    pub fn candidate_numbers(&self) -> Vec<String> {
        self.0.iter().map(|p| p.number.to_string()).collect()
    }

    /// 题组中最小的题号
    pub fn lowest_number(&self) -> &ProblemNumber {
        self.0
            .iter()
            .map(|p| &p.number)
            .min()
            .unwrap_or(&self.first().number)
    }
}

impl TryFrom<Vec<ProblemRef>> for IndividualizationGroup {
    type Error = String;

    fn try_from(members: Vec<ProblemRef>) -> Result<Self, Self::Error> {
        IndividualizationGroup::new(members).map_err(|e| e.to_string())
    }
}

impl From<IndividualizationGroup> for Vec<ProblemRef> {
    fn from(g: IndividualizationGroup) -> Self {
        g.0
    }
}

/// 一组共享同一套标记的个性化题组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagGroup {
    #[serde(default)]
    pub flags: FlagSet,
    pub groups: Vec<IndividualizationGroup>,
}

/// 作业流中的一段：一次作业的内容
pub type Chunk = Vec<FlagGroup>;
