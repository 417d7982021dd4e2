//! LaTeX 作业一览表
//!
//! 每次作业一张两栏表：纸质 / 联网。需要手工批改的题目（非联网、非附加、书后无答案）加下划线。

use crate::models::Catalog;
use crate::reports::points::{points_possible_on_set, PointsOptions};
use crate::services::describe::{describe_group, Format};
use crate::services::Schedule;
use tracing::warn;

const PREAMBLE: &str = "\\documentclass{article}
\\usepackage[T1]{fontenc}
\\begin{document}
";

pub fn render_hw_table(schedule: &Schedule, catalog: &Catalog, opts: &PointsOptions) -> String {
    let mut tex = String::from(PREAMBLE);

    for set_number in schedule.set_numbers() {
        tex.push_str(&format!("\\noindent{{\\textbf{{Homework {}}}}}\\\\\n", set_number));

        let c = points_possible_on_set(schedule, set_number, catalog, opts);
        let count_paper = format!("{}+{}", c.get(false, false), c.get(false, true));
        let count_online = format!("{}+{}", c.get(true, false), c.get(true, true));

        let mut columns: [Vec<String>; 2] = [Vec::new(), Vec::new()];
        let mut total = 0;
        for (col, online) in [(0usize, false), (1usize, true)] {
            let victims = schedule.victims(set_number, |f| f.is_online() == online);
            total += victims.len();
            for v in victims {
                let d = describe_group(v.flags, v.group, Format::Tex, catalog);
                let hand_graded = !(v.flags.is_online()
                    || v.flags.is_extra_credit()
                    || catalog.has_solution(&v.group.first().key()));
                columns[col].push(if hand_graded {
                    format!("\\underline{{{}}}", d)
                } else {
                    d
                });
            }
        }

        tex.push_str(&format!(
            "\\begin{{tabular}}{{p{{60mm}}p{{60mm}}}}\n\\emph{{paper}} {} & \\emph{{online}} {} \\\\\n{} & {}\n\\end{{tabular}}\n",
            count_paper,
            count_online,
            columns[0].join(" "),
            columns[1].join(" ")
        ));

        if total == 0 {
            warn!("⚠️ 第 {} 次作业没有任何题目", set_number);
        }
    }

    tex.push_str("\\end{document}\n");
    tex
}
