use crate::models::{Catalog, ProblemKey, ProblemNumber};
use tracing::warn;

/// 把一章中的若干题号换成标签
///
/// `numbers` 以空白分隔。找不到的题号各占一行说明，放在逗号分隔的标签列表之前。
pub fn render_labels(catalog: &Catalog, chapter: u32, numbers: &str) -> String {
    let mut errors = String::new();
    let mut labels = Vec::new();

    for n in numbers.split_whitespace() {
        let label = ProblemNumber::parse(n)
            .ok()
            .and_then(|number| catalog.label_for(&ProblemKey::new(chapter, number)));
        match label {
            Some(label) => labels.push(label),
            None => {
                warn!("⚠️ 教材 {} 第 {} 章没有题号 {} 的标签", catalog.book(), chapter, n);
                errors.push_str(&format!(
                    "no label found for book={}, ch={}, n={}\n",
                    catalog.book(),
                    chapter,
                    n
                ));
            }
        }
    }

    format!("{}{}\n", errors, labels.join(","))
}
