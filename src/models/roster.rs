use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 成绩册中的学生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub last: String,
    pub first: String,
    /// 班级，例如 "210"；未设置时为空字符串
    pub class: String,
    /// 学号，原样保留（包括前导零）
    pub id: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// 花名册：按学生键（如 `blow_joe`）排序
pub type Roster = BTreeMap<String, Student>;

/// 没有成绩册时使用的假花名册，只有 Joe Blow 一人
pub fn fake_roster(key: &str) -> Roster {
    let mut roster = Roster::new();
    roster.insert(
        key.to_string(),
        Student {
            last: "Blow".to_string(),
            first: "Joe".to_string(),
            class: "210".to_string(),
            id: "0".to_string(),
        },
    );
    roster
}

/// 成绩册 JSON 中的单个学生记录
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradebookEntry {
    pub last: Option<String>,
    pub first: Option<String>,
    pub id: Option<String>,
    pub class: Option<String>,
    pub dropped: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradebookData {
    #[serde(default)]
    pub roster: BTreeMap<String, GradebookEntry>,
}

/// 成绩册文件的顶层结构：`{"data": {"roster": {...}}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Gradebook {
    pub data: GradebookData,
}

impl Gradebook {
    /// 转换为花名册，跳过已退课的学生
    pub fn into_roster(self) -> Roster {
        self.data
            .roster
            .into_iter()
            .filter(|(_, e)| e.dropped.as_deref() != Some("true"))
            .map(|(key, e)| {
                let (mut last, mut first) = names_from_key(&key);
                if let Some(l) = e.last {
                    last = l;
                }
                if let Some(f) = e.first {
                    first = f;
                }
                let student = Student {
                    last,
                    first,
                    class: e.class.unwrap_or_default(),
                    id: e.id.unwrap_or_default(),
                };
                (key, student)
            })
            .collect()
    }
}

// "blow_joe" -> ("Blow", "Joe")；在最后一个下划线处切分
fn names_from_key(key: &str) -> (String, String) {
    match key.rsplit_once('_') {
        Some((last, first)) => (capitalize(last), capitalize(first)),
        None => (key.to_string(), String::new()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradebook_into_roster() {
        let json = r#"{"data":{"roster":{
            "blow_joe":{"id":"00123456","class":"210"},
            "van_der_berg_ANNA":{"id":"2","first":"Anna Maria"},
            "gone_guy":{"id":"3","dropped":"true"},
            "cher":{"id":"4","dropped":"false"}
        }}}"#;
        let gb: Gradebook = serde_json::from_str(json).unwrap();
        let roster = gb.into_roster();

        assert_eq!(roster.len(), 3);
        let joe = &roster["blow_joe"];
        assert_eq!(joe.last, "Blow");
        assert_eq!(joe.first, "Joe");
        assert_eq!(joe.id, "00123456");
        assert_eq!(joe.class, "210");

        let anna = &roster["van_der_berg_ANNA"];
        assert_eq!(anna.last, "Van_der_berg");
        assert_eq!(anna.first, "Anna Maria");
        assert_eq!(anna.class, "");

        assert_eq!(roster["cher"].last, "cher");
        assert!(!roster.contains_key("gone_guy"));
    }

    #[test]
    fn test_fake_roster() {
        let r = fake_roster("blow_joe");
        assert_eq!(r.len(), 1);
        assert_eq!(r["blow_joe"].id, "0");
        assert_eq!(r["blow_joe"].full_name(), "Joe Blow");
    }
}
