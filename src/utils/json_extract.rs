//! 从 LLM 回复中提取 JSON
//!
//! 模型经常把 JSON 包在 markdown 代码块里，或在前后附带说明文字

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

use crate::error::LlmError;
use crate::utils::logging::truncate_text;

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)\r?\n[ \t]*```")
            .expect("valid fence regex")
    })
}

fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("valid fence regex"))
}

/// 去掉包在整段回复外面的 markdown 代码块标记
///
/// 只处理以 ``` 开头的回复，正文中间的反引号保持不变；
/// 回复被截断时可能只有开头的 ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(m) = opening_fence().find(trimmed) else {
        return trimmed;
    };

    let inner = &trimmed[m.end()..];
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// 说明文字中夹着的第一个代码块
fn embedded_block(text: &str) -> Option<&str> {
    fenced_block()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// 第一个 `{` 到最后一个 `}` 之间的内容
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// 把 LLM 回复解析为指定类型
///
/// 依次尝试：原文、去掉外层代码块、说明文字中的代码块、`{` 到 `}` 之间的内容
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let trimmed = text.trim();

    let first_error = match serde_json::from_str::<T>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let unfenced = strip_code_fences(trimmed);
    let candidates = [
        (unfenced != trimmed).then_some(unfenced),
        embedded_block(trimmed),
        brace_span(trimmed),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str::<T>(candidate) {
            return Ok(value);
        }
    }

    Err(LlmError::InvalidJson {
        reason: first_error.to_string(),
        snippet: truncate_text(trimmed, 200),
    })
}
