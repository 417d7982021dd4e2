//! 报表层
//!
//! 每个报表都是纯函数：输入排期、目录、花名册等，输出一个字符串，
//! 文件读写统一交给编排层。

pub mod groups_page;
pub mod hw_table;
pub mod labels;
pub mod points;
pub mod progress;
pub mod roster_csv;
pub mod self_service;
pub mod sets_csv;
pub mod solutions;

use crate::error::{AppError, AppResult};

/// 把写入内存的 CSV 转为字符串
pub(crate) fn csv_to_string(writer: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::file_write_failed("<csv>", e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| AppError::file_write_failed("<csv>", e))
}

/// 替换模板中的 `{{name}}` 占位符
pub(crate) fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{}}}}}", name), value)
    })
}

/// 转义 HTML 文本
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 嵌入 `<script>` 的 JSON 不能出现 `</`
pub(crate) fn script_safe_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// 班级名加上课时段，例如 "Physics 210, Mon-Wed section"
pub fn class_title_with_section(title: &str, section: &str) -> String {
    match section {
        "m" => format!("{}, Mon-Wed section", title),
        "t" => format!("{}, Tue-Thu section", title),
        _ => title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template() {
        let out = fill_template("<p>{{a}} and {{b}} and {{a}}</p>", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "<p>x and y and x</p>");
    }

    #[test]
    fn test_script_safe_json() {
        let s = script_safe_json(&vec!["</script>"]).unwrap();
        assert_eq!(s, r#"["<\/script>"]"#);
    }

    #[test]
    fn test_class_title_with_section() {
        assert_eq!(class_title_with_section("Physics 210", "m"), "Physics 210, Mon-Wed section");
        assert_eq!(class_title_with_section("Physics 210", "t"), "Physics 210, Tue-Thu section");
        assert_eq!(class_title_with_section("Physics 210", ""), "Physics 210");
        assert_eq!(escape_html("a<b>&\""), "a&lt;b&gt;&amp;&quot;");
    }
}
