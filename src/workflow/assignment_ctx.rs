//! 选题上下文
//!
//! 封装"给哪个学生、在哪个学期、从哪组候选题里选一道"这一信息

use crate::models::{IndividualizationGroup, Term};
use std::fmt::Display;

/// 选题上下文
///
/// 候选题号的顺序会影响选题结果，构造后不要排序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCtx {
    /// 章节
    pub chapter: u32,

    /// 候选题号，保持输入顺序
    pub candidates: Vec<String>,

    /// 学期
    pub term: Term,

    /// 学号（字符串，保留前导零）
    pub student_id: String,
}

impl AssignmentCtx {
    /// 创建新的选题上下文
    pub fn new(
        chapter: u32,
        candidates: Vec<String>,
        term: Term,
        student_id: impl Into<String>,
    ) -> Self {
        Self {
            chapter,
            candidates,
            term,
            student_id: student_id.into(),
        }
    }

    /// 从个性化题组构造：章节取第一道题的章节
    pub fn for_group(group: &IndividualizationGroup, term: Term, student_id: impl Into<String>) -> Self {
        Self::new(group.chapter(), group.candidate_numbers(), term, student_id)
    }
}

impl Display for AssignmentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[学号#{} 第{}章 候选#{} 学期#{}]",
            self.student_id,
            self.chapter,
            self.candidates.join("|"),
            self.term
        )
    }
}
