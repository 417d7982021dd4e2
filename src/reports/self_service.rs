//! 自助作业网页
//!
//! 服务端把排期整理成一串 `HwDatum`，嵌入网页；学生在浏览器里输入学号后，
//! `assets/select_using_hash.js` 按与服务端相同的算法选题并拼出作业清单。
//! `render_for_student` 是同一拼接逻辑的 Rust 版本，用来核对网页与 sets.csv 是否一致。

use crate::error::AppResult;
use crate::models::{Catalog, Semester, Term};
use crate::reports::{escape_html, fill_template, script_safe_json};
use crate::services::describe::{describe_group, describe_problem_with_flags, Format};
use crate::services::selector::select_using_hash;
use crate::services::Schedule;
use crate::workflow::AssignmentCtx;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

const PAGE_TEMPLATE: &str = include_str!("../../assets/self_service.html");
const SELECTOR_JS: &str = include_str!("../../assets/select_using_hash.js");

/// 网页端作业数据的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HwDatum {
    /// 原样输出
    Text { html: String },
    /// 只有学生分到 `chapter-number` 时才输出
    Conditional {
        html: String,
        chapter: u32,
        number: String,
    },
    /// 不输出，只标记这道题已布置
    Assigned { chapter: u32, number: String },
    /// 个性化题组：按学号选出一道，输出对应的描述
    Indiv {
        chapter: u32,
        year: i32,
        semester: Semester,
        probs: Vec<String>,
        description: Vec<String>,
    },
}

impl HwDatum {
    fn text(html: impl Into<String>) -> Self {
        HwDatum::Text { html: html.into() }
    }
}

/// 网页生成选项
#[derive(Debug, Clone)]
pub struct SelfServiceOptions {
    pub term: Term,
    /// 已经带上课时段的班级名
    pub class_title: String,
    /// 带有其中任一标记的题组不出现在网页上
    pub exclude_if: String,
    /// 放在作业清单最前面的 HTML
    pub boilerplate: String,
    /// 输入学号前显示的说明 HTML
    pub instructions: String,
    pub id_digits: usize,
    /// 生成日期，例如 "10-18-2026"
    pub defined_on: String,
}

#[derive(Serialize)]
struct PageInfo<'a> {
    class_title: &'a str,
    term: String,
    id_digits: usize,
    defined_on: &'a str,
}

/// 把排期整理成网页端数据
pub fn build_hw_data(schedule: &Schedule, catalog: &Catalog, term: Term, boilerplate: &str, exclude_if: &str) -> Vec<HwDatum> {
    let mut d = Vec::new();
    if !boilerplate.is_empty() {
        d.push(HwDatum::text(boilerplate));
    }

    for set_number in schedule.set_numbers() {
        d.push(HwDatum::text(format!("<h2>Homework {}</h2>\n", set_number)));
        for note in schedule.notes(set_number) {
            let html = format!("  <p>{}</p>\n", note.text);
            d.push(match &note.problem {
                None => HwDatum::Text { html },
                Some(key) => HwDatum::Conditional {
                    html,
                    chapter: key.chapter,
                    number: key.number.to_string(),
                },
            });
        }

        for (label, online) in [("paper", false), ("online", true)] {
            d.push(HwDatum::text(format!("<p><i>{}</i>: ", label)));
            let victims = schedule.victims(set_number, |f| {
                f.is_online() == online && !f.contains_any_of(exclude_if)
            });
            if victims.is_empty() {
                d.push(HwDatum::text("none"));
            }
            for v in victims {
                if v.group.len() == 1 {
                    let p = v.group.first();
                    d.push(HwDatum::Assigned {
                        chapter: p.chapter,
                        number: p.number.to_string(),
                    });
                    d.push(HwDatum::text(format!(
                        "{} ",
                        describe_group(v.flags, v.group, Format::Html, catalog)
                    )));
                } else {
                    d.push(HwDatum::Indiv {
                        chapter: v.group.chapter(),
                        year: term.year,
                        semester: term.semester,
                        probs: v.group.candidate_numbers(),
                        description: v
                            .group
                            .members()
                            .iter()
                            .map(|p| describe_problem_with_flags(p, v.flags, Format::Html, catalog))
                            .collect(),
                    });
                }
            }
            d.push(HwDatum::text("</p>"));
        }
    }
    d
}

/// 为某个学号拼出作业清单，与网页端的 `the_hw` 输出一致
pub fn render_for_student(data: &[HwDatum], student_id: &str) -> AppResult<String> {
    let mut assigned: HashSet<String> = HashSet::new();
    let mut picks: Vec<Option<usize>> = vec![None; data.len()];

    for (i, x) in data.iter().enumerate() {
        match x {
            HwDatum::Assigned { chapter, number } => {
                assigned.insert(format!("{}-{}", chapter, number));
            }
            HwDatum::Indiv {
                chapter,
                year,
                semester,
                probs,
                ..
            } => {
                let ctx = AssignmentCtx::new(*chapter, probs.clone(), Term::new(*semester, *year), student_id);
                let m = select_using_hash(&ctx)?;
                picks[i] = Some(m);
                assigned.insert(format!("{}-{}", chapter, probs[m]));
            }
            _ => {}
        }
    }

    let mut html = String::new();
    for (x, pick) in data.iter().zip(&picks) {
        match x {
            HwDatum::Text { html: h } => html.push_str(h),
            HwDatum::Conditional {
                html: h,
                chapter,
                number,
            } => {
                if assigned.contains(&format!("{}-{}", chapter, number)) {
                    html.push_str(h);
                }
            }
            HwDatum::Indiv { description, .. } => {
                if let Some(d) = pick.and_then(|m| description.get(m)) {
                    html.push_str(d);
                    html.push(' ');
                }
            }
            HwDatum::Assigned { .. } => {}
        }
    }
    Ok(html)
}

/// 生成完整网页
pub fn render_self_service_page(data: &[HwDatum], opts: &SelfServiceOptions) -> AppResult<String> {
    let title = format!("Homework Assignments for {}, {}", opts.class_title, opts.term);
    let page = PageInfo {
        class_title: &opts.class_title,
        term: opts.term.to_string(),
        id_digits: opts.id_digits,
        defined_on: &opts.defined_on,
    };
    let hw_data = script_safe_json(&data)?;
    let page_json = script_safe_json(&page)?;
    debug!("网页端数据 {} 项，{} 字节", data.len(), hw_data.len());

    Ok(fill_template(
        PAGE_TEMPLATE,
        &[
            ("title", &escape_html(&title)),
            ("instructions", &opts.instructions),
            ("hw_data", &hw_data),
            ("page", &page_json),
            ("selector_js", SELECTOR_JS),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::tests::sample_catalog;
    use crate::models::{fake_roster, Note, RawStream};
    use crate::reports::points::tests::sample_schedule;
    use crate::services::parse_hw;
    use crate::workflow::{ExclusionRules, StudentAssignment};

    fn f14() -> Term {
        Term::new(Semester::Fall, 2014)
    }

    #[test]
    fn test_hw_data_layout() {
        let c = sample_catalog();
        let s = sample_schedule();
        let d = build_hw_data(&s, &c, f14(), "<p>intro</p>", "");

        assert_eq!(d[0], HwDatum::text("<p>intro</p>"));
        assert_eq!(d[1], HwDatum::text("<h2>Homework 1</h2>\n"));
        assert_eq!(d[2], HwDatum::text("<p><i>paper</i>: "));
        match &d[3] {
            HwDatum::Indiv {
                chapter,
                probs,
                description,
                ..
            } => {
                assert_eq!(*chapter, 2);
                assert_eq!(probs, &vec!["5".to_string(), "g3".to_string()]);
                assert_eq!(description, &vec!["2-5".to_string(), "2-g3".to_string()]);
            }
            other => panic!("unexpected datum: {other:?}"),
        }
        assert!(d.contains(&HwDatum::text("2-7s ")));
        assert!(d.contains(&HwDatum::text("3-2a&int;s ")));

        // 第 2 次作业没有纸质题
        let set2 = d
            .iter()
            .position(|x| *x == HwDatum::text("<h2>Homework 2</h2>\n"))
            .unwrap();
        assert_eq!(d[set2 + 2], HwDatum::text("none"));
    }

    #[test]
    fn test_hw_data_json_shape() {
        let d = vec![
            HwDatum::text("<p>"),
            HwDatum::Indiv {
                chapter: 2,
                year: 2014,
                semester: Semester::Fall,
                probs: vec!["5".to_string(), "7".to_string()],
                description: vec!["2-5".to_string(), "2-7".to_string()],
            },
        ];
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"text","html":"<p>"},{"type":"indiv","chapter":2,"year":2014,"semester":"f","probs":["5","7"],"description":["2-5","2-7"]}]"#
        );
    }

    #[test]
    fn test_render_for_student_matches_selector() {
        let d = vec![HwDatum::Indiv {
            chapter: 2,
            year: 2014,
            semester: Semester::Fall,
            probs: vec!["5".to_string(), "7".to_string()],
            description: vec!["2-5".to_string(), "2-7".to_string()],
        }];
        assert_eq!(render_for_student(&d, "0").unwrap(), "2-5 ");
        assert_eq!(render_for_student(&d, "00123456").unwrap(), "2-7 ");
    }

    #[test]
    fn test_conditional_notes() {
        let c = sample_catalog();
        let raw = RawStream {
            stream: "s".to_string(),
            delay: 0,
            chunks: vec!["free-fall|dropped-ball ; projectile-a".to_string()],
            notes: vec![
                Note {
                    key: "free-fall".to_string(),
                    text: "hint for $$".to_string(),
                },
                Note {
                    key: "0".to_string(),
                    text: "always".to_string(),
                },
            ],
        };
        let s = Schedule::build(&parse_hw(&[raw], &c).unwrap(), &c).unwrap();
        let d = build_hw_data(&s, &c, f14(), "", "");

        // f14：学号 "0" 分到 2-5，"00123456" 分到 2-7
        let got_5 = render_for_student(&d, "0").unwrap();
        assert!(got_5.contains("<p>hint for 2-5</p>"));
        assert!(got_5.contains("<p>always</p>"));
        let got_7 = render_for_student(&d, "00123456").unwrap();
        assert!(!got_7.contains("hint for"));
        assert!(got_7.contains("<p>always</p>"));
    }

    #[test]
    fn test_page_agrees_with_sets_csv_rows() {
        let c = sample_catalog();
        let s = sample_schedule();
        let d = build_hw_data(&s, &c, f14(), "", "");
        let roster = fake_roster("blow_joe");
        let student = &roster["blow_joe"];

        let html = render_for_student(&d, &student.id).unwrap();
        let rows = StudentAssignment::new(&s, f14())
            .rows_for("blow_joe", student, &ExclusionRules::default())
            .unwrap();
        for row in rows {
            let needle = format!("{}-{}", row.problem.chapter, row.problem.number_and_parts());
            assert!(html.contains(&needle), "{needle} missing from {html}");
        }
    }

    #[test]
    fn test_exclude_if_hides_groups() {
        let c = sample_catalog();
        let s = sample_schedule();
        let d = build_hw_data(&s, &c, f14(), "", "*");
        assert!(!d.iter().any(|x| matches!(x, HwDatum::Text { html } if html.contains("4-12"))));
    }

    #[test]
    fn test_render_page() {
        let opts = SelfServiceOptions {
            term: f14(),
            class_title: "Physics 210, Mon-Wed section".to_string(),
            exclude_if: String::new(),
            boilerplate: String::new(),
            instructions: "<p>Enter your ID.</p>".to_string(),
            id_digits: 8,
            defined_on: "10-18-2026".to_string(),
        };
        let page = render_self_service_page(&[HwDatum::text("</script>")], &opts).unwrap();
        assert!(page.contains("<title>Homework Assignments for Physics 210, Mon-Wed section, f2014</title>"));
        assert!(page.contains("<p>Enter your ID.</p>"));
        assert!(page.contains(r#""html":"<\/script>""#));
        assert!(page.contains(r#""id_digits":8"#));
        assert!(page.contains("function select_using_hash("));
        assert!(!page.contains("{{"));
    }
}
