//! sets.csv：每名学生每个题组一行，题目由选题函数决定

use crate::error::{AppError, AppResult, RosterError};
use crate::models::{Roster, Term};
use crate::reports::csv_to_string;
use crate::services::Schedule;
use crate::workflow::{ExclusionRules, StudentAssignment};
use serde::Deserialize;
use tracing::{debug, info};

/// sets.csv 中的一行（读回时使用）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetsCsvRow {
    pub set: usize,
    pub book: String,
    pub ch: u32,
    /// 题号保持字符串，可能是 "g7"
    pub num: String,
    pub parts: String,
    pub flags: String,
    pub chunk: String,
    pub student: String,
}

/// 读取带表头的 sets.csv
pub fn parse_sets_csv(content: &str, path: &str) -> AppResult<Vec<SetsCsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    reader
        .deserialize()
        .collect::<Result<Vec<SetsCsvRow>, _>>()
        .map_err(|e| AppError::csv_failed(path, e))
}

/// sets.csv 生成选项
#[derive(Debug, Clone)]
pub struct SetsCsvOptions {
    pub term: Term,
    /// 只输出该班级的学生
    pub only_class: Option<String>,
    pub rules: ExclusionRules,
    pub header: bool,
}

/// 生成 `set,book,ch,num,parts,flags,chunk,student` CSV；book 列恒为 1
pub fn render_sets_csv(schedule: &Schedule, roster: &Roster, opts: &SetsCsvOptions) -> AppResult<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    if opts.header {
        w.write_record(["set", "book", "ch", "num", "parts", "flags", "chunk", "student"])?;
    }

    let flow = StudentAssignment::new(schedule, opts.term);
    let mut row_count = 0usize;
    for (key, student) in roster {
        if let Some(only) = &opts.only_class {
            if student.class.is_empty() {
                return Err(RosterError::ClassNotSet {
                    student: key.clone(),
                }
                .into());
            }
            if &student.class != only {
                debug!("跳过其他班级学生 {} ({})", key, student.class);
                continue;
            }
        }

        for row in flow.rows_for(key, student, &opts.rules)? {
            w.write_record([
                row.set_number.to_string(),
                "1".to_string(),
                row.problem.chapter.to_string(),
                row.problem.number.to_string(),
                row.problem.parts.to_lowercase(),
                row.flags.to_string(),
                String::new(),
                row.student_key,
            ])?;
            row_count += 1;
        }
    }

    info!("📋 sets.csv 共 {} 行", row_count);
    csv_to_string(w)
}
