//! 作业排期 - 业务能力层
//!
//! 把各个作业流按延迟铺到编号从 1 开始的作业上，并记录每道题第一次出现在哪次作业。

use crate::error::{AppResult, CatalogError, ScheduleError};
use crate::models::{Catalog, Chunk, FlagSet, IndividualizationGroup, ParsedStream, ProblemKey};
use crate::services::describe::compare_groups;
use std::collections::HashMap;

/// 作业注释
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetNote {
    /// 只有学生分到这道题时才显示；`None` 表示总是显示
    pub problem: Option<ProblemKey>,
    pub text: String,
}

/// 一次作业中的一个（标记, 个性化题组）
#[derive(Debug, Clone, Copy)]
pub struct Victim<'a> {
    pub flags: &'a FlagSet,
    pub group: &'a IndividualizationGroup,
}

/// 排期结果
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    // 下标 0 不使用
    sets: Vec<Vec<Chunk>>,
    notes: Vec<Vec<SetNote>>,
    stream_labels: Vec<String>,
    assigned_on_set: HashMap<ProblemKey, usize>,
}

impl Schedule {
    /// 根据解析后的作业流生成排期
    pub fn build(streams: &[ParsedStream], catalog: &Catalog) -> AppResult<Self> {
        let mut sets: Vec<Vec<Chunk>> = vec![Vec::new()];
        let mut stream_starts = Vec::with_capacity(streams.len());

        let mut start = 1usize;
        for stream in streams {
            start += stream.delay as usize;
            stream_starts.push(start);
            for (i, chunk) in stream.chunks.iter().enumerate() {
                let set_number = start + i;
                if sets.len() <= set_number {
                    sets.resize_with(set_number + 1, Vec::new);
                }
                sets[set_number].push(chunk.clone());
            }
        }

        let mut schedule = Schedule {
            notes: vec![Vec::new(); sets.len()],
            stream_labels: vec![String::new(); sets.len()],
            sets,
            ..Default::default()
        };
        schedule.record_assignments(catalog)?;
        schedule.assign_stream_labels(streams, &stream_starts);
        schedule.assign_notes(streams, &stream_starts, catalog)?;
        Ok(schedule)
    }

    fn record_assignments(&mut self, catalog: &Catalog) -> AppResult<()> {
        for set_number in 1..self.sets.len() {
            for chunk in &self.sets[set_number] {
                for fg in chunk {
                    for group in &fg.groups {
                        for p in group.members() {
                            let key = p.key();
                            match self.assigned_on_set.get(&key) {
                                None => {
                                    self.assigned_on_set.insert(key, set_number);
                                }
                                Some(&first) if p.parts.is_empty() => {
                                    return Err(ScheduleError::AssignedTwice {
                                        problem: key.to_string(),
                                        label: catalog.label_for(&key).unwrap_or("").to_string(),
                                        first,
                                        second: set_number,
                                    }
                                    .into());
                                }
                                Some(_) => {}
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn assign_stream_labels(&mut self, streams: &[ParsedStream], starts: &[usize]) {
        for (stream, &start) in streams.iter().zip(starts) {
            if start >= self.stream_labels.len() {
                self.stream_labels.resize(start + 1, String::new());
            }
            let slot = &mut self.stream_labels[start];
            if !slot.is_empty() {
                slot.push(';');
            }
            slot.push_str(&stream.stream);
        }
    }

    fn assign_notes(&mut self, streams: &[ParsedStream], starts: &[usize], catalog: &Catalog) -> AppResult<()> {
        for (stream, &start) in streams.iter().zip(starts) {
            for note in &stream.notes {
                let (set_number, set_note) = match note.key.parse::<usize>() {
                    Ok(offset) => (
                        start + offset,
                        SetNote {
                            problem: None,
                            text: note.text.clone(),
                        },
                    ),
                    Err(_) => {
                        let key = catalog.key_for_label(&note.key).ok_or_else(|| {
                            ScheduleError::NoteForUnknownLabel {
                                label: note.key.clone(),
                                text: note.text.clone(),
                            }
                        })?;
                        let set_number = *self.assigned_on_set.get(key).ok_or_else(|| {
                            ScheduleError::NoteForUnassignedProblem {
                                label: note.key.clone(),
                            }
                        })?;
                        (
                            set_number,
                            SetNote {
                                problem: Some(key.clone()),
                                text: note.text.replace("$$", &key.to_string()),
                            },
                        )
                    }
                };
                if set_number >= self.notes.len() {
                    self.notes.resize(set_number + 1, Vec::new());
                }
                self.notes[set_number].push(set_note);
            }
        }
        Ok(())
    }

    /// 作业次数（编号 1..=n）
    pub fn set_count(&self) -> usize {
        self.sets.len().saturating_sub(1)
    }

    pub fn set_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.set_count()
    }

    pub fn chunks(&self, set_number: usize) -> &[Chunk] {
        self.sets.get(set_number).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn notes(&self, set_number: usize) -> &[SetNote] {
        self.notes.get(set_number).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 从这次作业开始的作业流标签，多个以 `;` 连接
    pub fn stream_label(&self, set_number: usize) -> &str {
        self.stream_labels.get(set_number).map(String::as_str).unwrap_or("")
    }

    /// 题目第一次出现的作业编号
    pub fn assigned_on(&self, key: &ProblemKey) -> Option<usize> {
        self.assigned_on_set.get(key).copied()
    }

    /// 某次作业中满足条件的（标记, 题组），按章节和最小题号排序
    pub fn victims<F>(&self, set_number: usize, mut keep: F) -> Vec<Victim<'_>>
    where
        F: FnMut(&FlagSet) -> bool,
    {
        let mut victims: Vec<Victim<'_>> = self
            .chunks(set_number)
            .iter()
            .flatten()
            .filter(|fg| keep(&fg.flags))
            .flat_map(|fg| {
                fg.groups.iter().map(move |group| Victim {
                    flags: &fg.flags,
                    group,
                })
            })
            .collect();
        victims.sort_by(|a, b| compare_groups(a.group, b.group));
        victims
    }
}

/// 根据题目键查标签，找不到时报错
pub fn require_label<'a>(catalog: &'a Catalog, key: &ProblemKey) -> AppResult<&'a str> {
    catalog.label_for(key).ok_or_else(|| {
        CatalogError::NoLabelForProblem {
            chapter: key.chapter,
            number: key.number.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::catalog::tests::sample_catalog;
    use crate::models::{Note, RawStream};
    use crate::services::chunk_parser::parse_hw;

    fn raw(label: &str, delay: u32, chunks: &[&str], notes: &[(&str, &str)]) -> RawStream {
        RawStream {
            stream: label.to_string(),
            delay,
            chunks: chunks.iter().map(|s| s.to_string()).collect(),
            notes: notes
                .iter()
                .map(|(k, t)| Note {
                    key: k.to_string(),
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    fn build(streams: &[RawStream]) -> AppResult<Schedule> {
        let c = sample_catalog();
        let parsed = parse_hw(streams, &c)?;
        Schedule::build(&parsed, &c)
    }

    #[test]
    fn test_streams_laid_out_with_delay() {
        let s = build(&[
            raw("a", 0, &["free-fall", "dropped-ball"], &[]),
            raw("b", 2, &["ramp"], &[]),
        ])
        .unwrap();
        // a 从第 1 次开始；b 从 1+2=3 开始
        assert_eq!(s.set_count(), 3);
        assert_eq!(s.chunks(1).len(), 1);
        assert_eq!(s.chunks(2).len(), 1);
        assert_eq!(s.chunks(3).len(), 1);
        assert_eq!(s.stream_label(1), "a");
        assert_eq!(s.stream_label(2), "");
        assert_eq!(s.stream_label(3), "b");

        let c = sample_catalog();
        assert_eq!(s.assigned_on(c.key_for_label("ramp").unwrap()), Some(3));
    }

    #[test]
    fn test_gap_sets_are_empty() {
        let s = build(&[raw("a", 3, &["free-fall"], &[])]).unwrap();
        assert_eq!(s.set_count(), 4);
        assert!(s.chunks(1).is_empty());
        assert!(s.victims(2, |_| true).is_empty());
        assert_eq!(s.stream_label(4), "a");
    }

    #[test]
    fn test_streams_starting_together_join_labels() {
        let s = build(&[raw("a", 0, &["free-fall"], &[]), raw("b", 0, &["ramp"], &[])]).unwrap();
        assert_eq!(s.stream_label(1), "a;b");
        assert_eq!(s.chunks(1).len(), 2);
    }

    #[test]
    fn test_problem_twice_without_parts_is_fatal() {
        let err = build(&[raw("a", 0, &["free-fall", "free-fall"], &[])]).unwrap_err();
        assert!(matches!(err, AppError::Schedule(ScheduleError::AssignedTwice { .. })));

        assert!(build(&[raw("a", 0, &["free-fall/a", "free-fall/b"], &[])]).is_ok());
    }

    #[test]
    fn test_notes() {
        let s = build(&[raw(
            "a",
            0,
            &["free-fall", "dropped-ball|ramp"],
            &[("0", "Welcome."), ("ramp", "For $$, draw a diagram.")],
        )])
        .unwrap();
        assert_eq!(s.notes(1), &[SetNote { problem: None, text: "Welcome.".to_string() }]);
        let n = &s.notes(2)[0];
        assert_eq!(n.problem.as_ref().unwrap().to_string(), "4-12");
        assert_eq!(n.text, "For 4-12, draw a diagram.");
    }

    #[test]
    fn test_note_for_unknown_label_is_fatal() {
        let err = build(&[raw("a", 0, &["free-fall"], &[("bogus", "x")])]).unwrap_err();
        assert!(matches!(err, AppError::Schedule(ScheduleError::NoteForUnknownLabel { .. })));
    }

    #[test]
    fn test_victims_sorted_and_filtered() {
        let s = build(&[raw("a", 0, &["o:ramp; dropped-ball|galileo-tower; free-fall"], &[])]).unwrap();
        let all: Vec<String> = s
            .victims(1, |_| true)
            .iter()
            .map(|v| v.group.first().key().to_string())
            .collect();
        assert_eq!(all, vec!["2-5", "2-7", "4-12"]);

        let online = s.victims(1, |f| f.is_online());
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].group.chapter(), 4);
    }
}
