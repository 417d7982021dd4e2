//! 单个学生的作业展开
//!
//! 对排期中的每个个性化题组调用选题函数，得到该学生实际要做的题目。

use crate::error::{AppResult, SelectionError};
use crate::models::{FlagSet, IndividualizationGroup, ProblemRef, Student, Term};
use crate::services::schedule::Schedule;
use crate::services::selector::select_using_hash;
use crate::workflow::AssignmentCtx;
use tracing::debug;

/// 一行分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub set_number: usize,
    pub problem: ProblemRef,
    pub flags: FlagSet,
    pub student_key: String,
}

/// 排除规则
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    /// 带有其中任一标记的题目不布置
    pub exclude_if: String,
    /// 对指定班级，带有其中任一标记的题目不布置，例如 ("205", "c")
    pub exclude_if_class_and_flag: Option<(String, String)>,
}

impl ExclusionRules {
    pub fn excludes(&self, flags: &FlagSet, class: &str) -> bool {
        if flags.contains_any_of(&self.exclude_if) {
            return true;
        }
        match &self.exclude_if_class_and_flag {
            Some((e_class, e_flags)) => class == e_class && flags.contains_any_of(e_flags),
            None => false,
        }
    }
}

/// 取出选中的候选题；下标越界时报错，不退回第一道
pub fn pick_candidate(group: &IndividualizationGroup, index: usize) -> AppResult<&ProblemRef> {
    group.get(index).ok_or_else(|| {
        SelectionError::IndexOutOfRange {
            chapter: group.chapter(),
            index,
            count: group.len(),
        }
        .into()
    })
}

/// 单个学生的作业流程
pub struct StudentAssignment<'a> {
    schedule: &'a Schedule,
    term: Term,
}

impl<'a> StudentAssignment<'a> {
    pub fn new(schedule: &'a Schedule, term: Term) -> Self {
        Self { schedule, term }
    }

    /// 为一名学生生成全部作业行（按作业编号、题组顺序）
    pub fn rows_for(&self, student_key: &str, student: &Student, rules: &ExclusionRules) -> AppResult<Vec<AssignmentRow>> {
        let mut rows = Vec::new();
        for set_number in self.schedule.set_numbers() {
            for victim in self.schedule.victims(set_number, |_| true) {
                let ctx = AssignmentCtx::for_group(victim.group, self.term, student.id.as_str());
                let index = select_using_hash(&ctx)?;
                let problem = pick_candidate(victim.group, index)?.clone();

                if rules.excludes(victim.flags, &student.class) {
                    debug!("{} 第 {} 次作业排除 {}", ctx, set_number, problem.key());
                    continue;
                }
                rows.push(AssignmentRow {
                    set_number,
                    problem,
                    flags: victim.flags.clone(),
                    student_key: student_key.to_string(),
                });
            }
        }
        Ok(rows)
    }
}
