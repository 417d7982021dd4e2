use crate::models::group::Chunk;
use serde::{Deserialize, Serialize};

/// 作业注释
///
/// `key` 可以是数字（相对于作业流起点的作业偏移）或题目标签。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub key: String,
    pub text: String,
}

/// 手写的作业流（YAML 输入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStream {
    pub stream: String,
    #[serde(default)]
    pub delay: u32,
    #[serde(default)]
    pub chunks: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: Vec<Note>,
}

/// 解析后的作业流（`parse-hw` 输出的 JSON）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStream {
    pub stream: String,
    #[serde(default)]
    pub delay: u32,
    pub chunks: Vec<Chunk>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

// 注释的键既可能是数字也可能是字符串，并且需要保留书写顺序
fn deserialize_notes<'de, D>(deserializer: D) -> Result<Vec<Note>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{MapAccess, Visitor};
    use std::fmt;

    struct NoteKey(String);

    impl<'de> Deserialize<'de> for NoteKey {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            struct KeyVisitor;

            impl<'de> Visitor<'de> for KeyVisitor {
                type Value = NoteKey;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a string or integer note key")
                }

                fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
                where
                    E: serde::de::Error,
                {
                    Ok(NoteKey(value.to_string()))
                }

                fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
                where
                    E: serde::de::Error,
                {
                    Ok(NoteKey(value.to_string()))
                }

                fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
                where
                    E: serde::de::Error,
                {
                    Ok(NoteKey(value.to_string()))
                }
            }

            deserializer.deserialize_any(KeyVisitor)
        }
    }

    struct NotesVisitor;

    impl<'de> Visitor<'de> for NotesVisitor {
        type Value = Vec<Note>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from note keys to note text")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut notes = Vec::new();
            while let Some((key, text)) = map.next_entry::<NoteKey, String>()? {
                notes.push(Note { key: key.0, text });
            }
            Ok(notes)
        }
    }

    deserializer.deserialize_any(NotesVisitor)
}
