use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// 整理后的题目：题干 + 选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Vec<String>,
}

impl ParsedQuestion {
    /// 整理阶段失败时的占位结果：直接使用识别出的原文
    pub fn placeholder(extracted_text: &str) -> Self {
        Self {
            question: Some(extracted_text.trim().to_string()),
            options: Vec::new(),
        }
    }

    /// 去掉首尾空白，丢弃空选项
    pub fn normalized(self) -> Self {
        let question = self
            .question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let options = self
            .options
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        Self { question, options }
    }

    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.options.is_empty()
    }
}

/// 解答：答案 + 解析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub explanation: Option<String>,
}

impl Solution {
    /// 解题阶段失败时的占位结果
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// 模型没有按 JSON 返回时，把整段回复当作解析
    pub fn from_plain_text(text: &str) -> Self {
        let text = text.trim();
        Self {
            answer: None,
            explanation: (!text.is_empty()).then(|| text.to_string()),
        }
    }

    pub fn normalized(self) -> Self {
        let clean = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            answer: clean(self.answer),
            explanation: clean(self.explanation),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.answer.is_none() && self.explanation.is_none()
    }
}

fn json_value_to_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        JsonValue::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(json_value_to_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        JsonValue::Object(map) => {
            // {"label": "A", "text": "..."} 形式的选项
            let label = map
                .get("label")
                .or_else(|| map.get("key"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let text = map
                .get("text")
                .or_else(|| map.get("content"))
                .or_else(|| map.get("value"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            match (label, text) {
                (Some(l), Some(t)) => Some(format!("{}. {}", l, t)),
                (None, Some(t)) => Some(t),
                _ => Some(JsonValue::Object(map).to_string()),
            }
        }
        other => Some(other.to_string()),
    }
}

// 模型返回的字段类型并不稳定：答案可能是数字或数组，这里统一转为字符串
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(json_value_to_text))
}

// 选项可能是字符串数组、对象数组，也可能是 {"A": "..."} 的映射
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{MapAccess, SeqAccess, Visitor};

    struct OptionsVisitor;

    impl<'de> Visitor<'de> for OptionsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a list of options or a map of label to option text")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut options = Vec::new();
            while let Some(item) = seq.next_element::<JsonValue>()? {
                if let Some(text) = json_value_to_text(item) {
                    options.push(text);
                }
            }
            Ok(options)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut options = Vec::new();
            while let Some((label, value)) = map.next_entry::<String, JsonValue>()? {
                if let Some(text) = json_value_to_text(value) {
                    options.push(format!("{}. {}", label, text));
                }
            }
            Ok(options)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(OptionsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_as_list() {
        let q: ParsedQuestion = serde_json::from_str(
            r#"{"question": "2+2=?", "options": ["A. 3", "B. 4", "C. 5"]}"#,
        )
        .unwrap();
        assert_eq!(q.question.as_deref(), Some("2+2=?"));
        assert_eq!(q.options, vec!["A. 3", "B. 4", "C. 5"]);
    }

    #[test]
    fn test_options_as_map_keeps_order() {
        let q: ParsedQuestion =
            serde_json::from_str(r#"{"question": "x", "options": {"B": "two", "A": "one"}}"#)
                .unwrap();
        assert_eq!(q.options, vec!["B. two", "A. one"]);
    }

    #[test]
    fn test_options_as_objects() {
        let q: ParsedQuestion = serde_json::from_str(
            r#"{"question": "x", "options": [{"label": "A", "text": "one"}, {"text": "two"}]}"#,
        )
        .unwrap();
        assert_eq!(q.options, vec!["A. one", "two"]);
    }

    #[test]
    fn test_missing_and_null_options() {
        let q: ParsedQuestion = serde_json::from_str(r#"{"question": "简答题"}"#).unwrap();
        assert!(q.options.is_empty());

        let q: ParsedQuestion =
            serde_json::from_str(r#"{"question": "简答题", "options": null}"#).unwrap();
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_normalized_drops_blanks() {
        let q = ParsedQuestion {
            question: Some("   ".to_string()),
            options: vec!["  A. 1 ".to_string(), " ".to_string()],
        }
        .normalized();
        assert_eq!(q.question, None);
        assert_eq!(q.options, vec!["A. 1"]);
    }

    #[test]
    fn test_answer_accepts_number_and_list() {
        let s: Solution =
            serde_json::from_str(r#"{"answer": 42, "explanation": "because"}"#).unwrap();
        assert_eq!(s.answer.as_deref(), Some("42"));

        let s: Solution = serde_json::from_str(r#"{"answer": ["A", "C"]}"#).unwrap();
        assert_eq!(s.answer.as_deref(), Some("A, C"));
        assert_eq!(s.explanation, None);
    }

    #[test]
    fn test_solution_from_plain_text() {
        assert_eq!(Solution::from_plain_text("  ").explanation, None);
        let s = Solution::from_plain_text("答案是 B，因为……");
        assert_eq!(s.answer, None);
        assert_eq!(s.explanation.as_deref(), Some("答案是 B，因为……"));
    }
}
