//! 每名学生的作业解答（LaTeX，使用 simplesolns 文档类）
//!
//! 题目来自 sets.csv；书后有答案的题只写一句提示，其余题目的解答来自
//! 各子目录下的 `<标签>.tex`，由编排层读入后传进来。

use crate::error::{AppResult, CatalogError, RosterError};
use crate::models::{Catalog, ProblemKey, ProblemNumber, Roster};
use crate::reports::sets_csv::SetsCsvRow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

const IN_BOOK: &str = "solution in the back of the book";
const MISSING: &str = "!!!!!!!!!!! missing solution !!!!!!!!!!!!!!";

#[derive(Debug, Clone)]
pub struct SolutionsOptions {
    pub class_title: String,
    /// 以下两个路径只用于错误信息
    pub sets_path: String,
    pub gradebook_path: String,
}

/// 每名学生每次作业的题目标签
type StudentSets = HashMap<String, BTreeMap<usize, Vec<String>>>;

fn row_key(row: &SetsCsvRow) -> AppResult<ProblemKey> {
    let number = ProblemNumber::parse(&row.num)?;
    Ok(ProblemKey::new(row.ch, number))
}

fn label_of<'a>(catalog: &'a Catalog, row: &SetsCsvRow) -> AppResult<&'a str> {
    let key = row_key(row)?;
    catalog.label_for(&key).ok_or_else(|| {
        CatalogError::NoLabelForProblem {
            chapter: row.ch,
            number: row.num.clone(),
        }
        .into()
    })
}

/// 需要查找解答源文件的标签（书后没有答案的题），按字母排序、去重
pub fn labels_needing_sources(catalog: &Catalog, rows: &[SetsCsvRow]) -> AppResult<Vec<String>> {
    let mut labels = BTreeSet::new();
    for row in rows {
        let label = label_of(catalog, row)?;
        if !catalog.has_solution(&row_key(row)?) {
            labels.insert(label.to_string());
        }
    }
    Ok(labels.into_iter().collect())
}

fn solution_block(key: &ProblemKey, body: &str) -> String {
    format!("\\noindent\\textbf{{{}}}\\quad %\n{}\n\\par\n", key, body)
}

/// 生成解答文档
///
/// `sources` 以标签为键，值为 `.tex` 源文件内容；缺少的题目输出醒目的占位符。
pub fn render_solutions(
    catalog: &Catalog,
    roster: &Roster,
    rows: &[SetsCsvRow],
    sources: &HashMap<String, String>,
    opts: &SolutionsOptions,
) -> AppResult<String> {
    let mut per_student: StudentSets = HashMap::new();
    let mut n_hw_defined = 0;
    for row in rows {
        n_hw_defined = n_hw_defined.max(row.set);
        let label = label_of(catalog, row)?;
        per_student
            .entry(row.student.clone())
            .or_default()
            .entry(row.set)
            .or_default()
            .push(label.to_string());
    }

    let mut in_sets: Vec<&String> = per_student.keys().collect();
    in_sets.sort();
    for student in in_sets {
        if !roster.contains_key(student) {
            return Err(RosterError::StudentMismatch {
                student: student.clone(),
                present_in: opts.sets_path.clone(),
                missing_from: opts.gradebook_path.clone(),
            }
            .into());
        }
    }
    for student in roster.keys() {
        if !per_student.contains_key(student) {
            return Err(RosterError::StudentMismatch {
                student: student.clone(),
                present_in: opts.gradebook_path.clone(),
                missing_from: opts.sets_path.clone(),
            }
            .into());
        }
    }

    let mut warned: BTreeSet<&str> = BTreeSet::new();
    let mut toc = String::new();
    let mut tex = String::new();
    for hw in 1..=n_hw_defined {
        toc.push_str(&format!("\\noindent Homework {} ... \\pageref{{set{}}}\\\\\n", hw, hw));
        for (i, (key, student)) in roster.iter().enumerate() {
            let toc_label = if i == 0 {
                format!("\\label{{set{}}}", hw)
            } else {
                String::new()
            };
            tex.push_str(&format!(
                "\n\\pagebreak\n\n\\noindent%\n{{\\large\\textbf{{Solutions to Homework {}, {},\n  {} }}}}{}\\\\\n\n",
                hw,
                opts.class_title,
                student.full_name(),
                toc_label
            ));

            let labels = per_student
                .get(key)
                .and_then(|sets| sets.get(&hw))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for label in labels {
                let Some(pkey) = catalog.key_for_label(label) else {
                    continue;
                };
                if catalog.has_solution(pkey) {
                    tex.push_str(&solution_block(pkey, IN_BOOK));
                    continue;
                }
                match sources.get(label) {
                    Some(body) => tex.push_str(&solution_block(pkey, body)),
                    None => {
                        if warned.insert(label.as_str()) {
                            warn!("⚠️ 没有找到 {} 的解答", label);
                        }
                        tex.push_str(&solution_block(pkey, MISSING));
                    }
                }
            }
        }
    }

    Ok(format!(
        "\\documentclass{{simplesolns}}\n\\begin{{document}}\n{{\\Huge\\textbf{{Solutions for {}}}}}\\\\\n\n{}\\pagebreak{}\\end{{document}}\n",
        opts.class_title, toc, tex
    ))
}
