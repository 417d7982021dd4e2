//! 随机分组网页：洗牌和分组都在浏览器里完成

use crate::error::AppResult;
use crate::models::Roster;
use crate::reports::{escape_html, fill_template, script_safe_json};

const GROUPS_TEMPLATE: &str = include_str!("../../assets/groups.html");

pub const DEFAULT_GROUP_SIZE: usize = 4;

/// 默认的课桌排数：sqrt(人数 / 每组人数) + 1，限制在 2..=5
pub fn default_rows(student_count: usize, group_size: usize) -> usize {
    let rows = (student_count as f64 / group_size.max(1) as f64).sqrt() as usize + 1;
    rows.clamp(2, 5)
}

pub fn render_groups_page(roster: &Roster, class_title: &str) -> AppResult<String> {
    let names: Vec<String> = roster.values().map(|s| s.full_name()).collect();
    let rows = default_rows(names.len(), DEFAULT_GROUP_SIZE);

    Ok(fill_template(
        GROUPS_TEMPLATE,
        &[
            ("class_title", &escape_html(class_title)),
            ("group_size", &DEFAULT_GROUP_SIZE.to_string()),
            ("rows", &rows.to_string()),
            ("names_text", &escape_html(&names.join("\n"))),
            ("names_json", &script_safe_json(&names)?),
        ],
    ))
}
