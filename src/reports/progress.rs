//! 进度报告
//!
//! 对照课程日程（reading.csv、due.csv）与实际生成的 sets.csv，输出两份文本：
//! 每次课的作业安排表，以及按章节统计的已布置/未布置题目。

use crate::error::{AppError, AppResult, ScheduleError};
use crate::models::{Catalog, ProblemNumber};
use crate::reports::points::{points_possible_on_set, PointsCount, PointsOptions};
use crate::reports::sets_csv::SetsCsvRow;
use crate::services::Schedule;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::{info, warn};

const TABLE_HEADER: &str = "                          hw     stream's label
hw date       reading     ch     in hw.yaml
-- ---------- ----------- --     --------------
";

/// 报告所需的输入文本
#[derive(Debug, Clone, Copy)]
pub struct ProgressSources<'a> {
    /// 每行 `date,"reading"`
    pub reading: &'a str,
    pub reading_path: &'a str,
    /// 每行 `hw,date`
    pub due: &'a str,
    pub due_path: &'a str,
    pub sets: &'a [SetsCsvRow],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    /// 每次课一行的安排表
    pub report: String,
    /// 按章节统计的题目布置情况
    pub problems_assigned: String,
}

/// 对齐方向：`Left` 在左侧补空格（右对齐），`Right` 在右侧补空格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSide {
    Left,
    Right,
}

pub fn pad_string(s: &str, width: usize, side: PadSide) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let fill = " ".repeat(width - len);
    match side {
        PadSide::Left => format!("{}{}", fill, s),
        PadSide::Right => format!("{}{}", s, fill),
    }
}

struct Meeting {
    date: String,
    reading: String,
}

fn parse_reading(content: &str, path: &str) -> AppResult<Vec<Meeting>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"^(.*),"(.*)"$"#).expect("reading.csv 正则表达式无效"));

    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let caps = re
                .captures(line.trim_end())
                .ok_or_else(|| AppError::illegal_line(path, line))?;
            Ok(Meeting {
                date: caps[1].to_string(),
                reading: caps[2].to_string(),
            })
        })
        .collect()
}

fn parse_due(content: &str, path: &str) -> AppResult<Vec<(usize, String)>> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let (hw, date) = line
                .trim_end()
                .rsplit_once(',')
                .ok_or_else(|| AppError::illegal_line(path, line))?;
            let hw: usize = hw.trim().parse().map_err(|_| AppError::illegal_line(path, line))?;
            Ok((hw, date.to_string()))
        })
        .collect()
}

pub fn render_progress_report(
    schedule: &Schedule,
    catalog: &Catalog,
    opts: &PointsOptions,
    src: &ProgressSources<'_>,
) -> AppResult<ProgressReport> {
    // 课次从 1 开始编号
    let meetings = parse_reading(src.reading, src.reading_path)?;
    let date_to_meeting: HashMap<&str, usize> = meetings
        .iter()
        .enumerate()
        .map(|(i, m)| (m.date.as_str(), i + 1))
        .collect();

    let mut meeting_to_hw: HashMap<usize, usize> = HashMap::new();
    let mut hw_to_meeting: HashMap<usize, usize> = HashMap::new();
    let mut n_hw_in_syllabus = 0;
    for (hw, date) in parse_due(src.due, src.due_path)? {
        n_hw_in_syllabus = n_hw_in_syllabus.max(hw);
        let m = *date_to_meeting
            .get(date.as_str())
            .ok_or_else(|| ScheduleError::UnknownDueDate {
                date: date.clone(),
                due_path: src.due_path.to_string(),
                reading_path: src.reading_path.to_string(),
            })?;
        meeting_to_hw.insert(m, hw);
        hw_to_meeting.insert(hw, m);
    }

    let mut n_hw_defined = 0;
    let mut ch_to_meeting: BTreeMap<u32, usize> = BTreeMap::new();
    let mut when_ch_assigned: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
    for row in src.sets {
        n_hw_defined = n_hw_defined.max(row.set);
        if let Some(&m) = hw_to_meeting.get(&row.set) {
            let first = ch_to_meeting.entry(row.ch).or_insert(m);
            *first = (*first).min(m);
            when_ch_assigned.entry(m).or_default().push(row.ch);
        }
    }

    // 某章在这次课布置、下次课不再布置，即该章主线作业结束
    let mut end_ch_to_meeting: BTreeMap<u32, usize> = BTreeMap::new();
    for (&m, chapters) in &when_ch_assigned {
        let next = when_ch_assigned.get(&(m + 1));
        for ch in chapters {
            if !next.is_some_and(|n| n.contains(ch)) {
                end_ch_to_meeting.entry(*ch).or_insert(m);
            }
        }
    }

    // 一次课只显示一个开始的章节，编号大的覆盖编号小的
    let meeting_to_ch: HashMap<usize, u32> = ch_to_meeting.iter().map(|(&ch, &m)| (m, ch)).collect();
    let mut meeting_to_end_ch: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
    for (&ch, &m) in &end_ch_to_meeting {
        meeting_to_end_ch.entry(m).or_default().push(ch);
    }

    let mut report = String::from(TABLE_HEADER);
    for (i, meeting) in meetings.iter().enumerate() {
        let m = i + 1;
        let hw = meeting_to_hw.get(&m).copied();

        let mut descr = Vec::new();
        if let Some(hw) = hw {
            let label = schedule.stream_label(hw);
            if !label.is_empty() {
                descr.push(label.to_string());
            }
        }
        if let Some(ended) = meeting_to_end_ch.get(&m) {
            let list: Vec<String> = ended.iter().map(u32::to_string).collect();
            descr.push(format!("(end hw for ch.{})", list.join(",")));
        }

        let (hw_text, hw_ch) = match hw {
            None => ("--".to_string(), "--".to_string()),
            Some(hw) => (
                hw.to_string(),
                meeting_to_ch.get(&m).map(u32::to_string).unwrap_or_default(),
            ),
        };
        report.push_str(&format!(
            "{} {} {} {}     {}\n",
            pad_string(&hw_text, 2, PadSide::Left),
            pad_string(&meeting.date, 10, PadSide::Right),
            pad_string(&meeting.reading, 11, PadSide::Left),
            pad_string(&hw_ch, 2, PadSide::Left),
            descr.join(" ")
        ));
    }

    if n_hw_defined != n_hw_in_syllabus {
        let msg = format!(
            "The schedule page of the syllabus has {} hw assignments, but {} are defined.\n",
            n_hw_in_syllabus, n_hw_defined
        );
        warn!("⚠️ {}", msg.trim_end());
        report.push_str(&msg);
    } else {
        report.push_str(&format!(
            "The number of hw assignments on the schedule page of the syllabus matches the number defined; both are {}\n",
            n_hw_in_syllabus
        ));
    }

    let problems_assigned = render_problems_assigned(schedule, catalog, opts, ch_to_meeting.keys().next_back().copied());
    info!("📊 进度报告：{} 次课，{} 次作业", meetings.len(), n_hw_defined);
    Ok(ProgressReport {
        report,
        problems_assigned,
    })
}

fn render_problems_assigned(schedule: &Schedule, catalog: &Catalog, opts: &PointsOptions, last_chapter: Option<u32>) -> String {
    let mut out = String::new();
    let mut grand_total = 0;

    let chapters = match last_chapter {
        Some(last) => 0..=last,
        None => 1..=0,
    };
    for ch in chapters {
        let mut assigned: Vec<&ProblemNumber> = Vec::new();
        let mut not_assigned: Vec<&ProblemNumber> = Vec::new();
        for key in catalog.keys().filter(|k| k.chapter == ch) {
            if schedule.assigned_on(key).is_some() {
                assigned.push(&key.number);
            } else {
                not_assigned.push(&key.number);
            }
        }
        grand_total += assigned.len() + not_assigned.len();
        if assigned.is_empty() {
            continue;
        }
        assigned.sort();
        not_assigned.sort();
        out.push_str(&format!(
            "------ chapter {} ------\nassigned: {}\nnot assigned: {}\n",
            ch,
            join_numbers(&assigned),
            join_numbers(&not_assigned)
        ));
    }

    let mut tot = PointsCount::default();
    for set_number in schedule.set_numbers() {
        tot.add(&points_possible_on_set(schedule, set_number, catalog, opts));
    }
    out.push_str(&format!(
        "totals:\n  grand total: {}\n  per student:\n    graded paper:  {} + {} extra credit\n    graded online: {} + {} extra credit\n",
        grand_total, tot.paper, tot.paper_ec, tot.online, tot.online_ec
    ));
    out
}

fn join_numbers(numbers: &[&ProblemNumber]) -> String {
    numbers.iter().map(|n| n.as_str()).collect::<Vec<_>>().join(" ")
}
