use crate::error::{AppResult, RosterError};
use crate::models::Roster;
use crate::reports::csv_to_string;

/// 生成 `key,last,first,class` CSV
///
/// 班级要么全部设置，要么全部为空；混用时报错并列出未设置班级的学生。
pub fn render_roster_csv(roster: &Roster) -> AppResult<String> {
    let missing: Vec<&str> = roster
        .iter()
        .filter(|(_, s)| s.class.is_empty())
        .map(|(k, _)| k.as_str())
        .collect();
    if !missing.is_empty() && missing.len() < roster.len() {
        return Err(RosterError::MixedClasses {
            students: missing.join(","),
        }
        .into());
    }

    let mut w = csv::Writer::from_writer(Vec::new());
    for (key, s) in roster {
        w.write_record([key.as_str(), &s.last, &s.first, &s.class])?;
    }
    csv_to_string(w)
}
