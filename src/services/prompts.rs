//! 三个阶段使用的提示词

use crate::models::ParsedQuestion;

/// 图片中没有文字时模型应返回的标记
pub const NO_TEXT_SENTINEL: &str = "NO_TEXT_FOUND";

pub const OCR_SYSTEM: &str = "你是一个精确的文字识别助手，负责把试题图片中的文字原样转写出来。";

pub fn ocr_user_message() -> String {
    format!(
        r#"请识别这张试题图片中的全部文字。

【要求】
- 按原有顺序逐行转写，保留题号、选项字母和标点
- 数学公式用 LaTeX 表示，例如 $x^2+1$
- 不要解答题目，不要添加任何解释或说明
- 如果图片中没有任何文字，只返回 {}"#,
        NO_TEXT_SENTINEL
    )
}

pub const PARSE_SYSTEM: &str = "你是一个试题整理助手，负责把识别出的试题文字整理成结构化的 JSON。";

pub fn parse_user_message(extracted_text: &str) -> String {
    format!(
        r#"下面是从试题图片中识别出的文字：

{}

请把它整理为如下 JSON 格式：
{{"question": "题干", "options": ["A. 选项一", "B. 选项二"]}}

【要求】
- question 只包含题干，不包含选项
- options 按原顺序列出，每项带上原有的字母标号；没有选项时返回空数组
- 不要改写题目内容，不要作答
- 只返回 JSON，不要返回任何其他内容"#,
        extracted_text.trim()
    )
}

pub const SOLVE_SYSTEM: &str = "你是一位经验丰富的老师，擅长准确解答各学科试题并给出清晰的解析。";

pub fn solve_user_message(question: &ParsedQuestion) -> String {
    let stem = question.question.as_deref().unwrap_or("(题干缺失)");
    let options = if question.options.is_empty() {
        "无（非选择题）".to_string()
    } else {
        question.options.join("\n")
    };

    format!(
        r#"请解答下面这道题。

题干：
{}

选项：
{}

请按如下 JSON 格式返回：
{{"answer": "最终答案（选择题给出选项字母）", "explanation": "解题思路与步骤"}}

只返回 JSON，不要返回任何其他内容。"#,
        stem, options
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_message_lists_options() {
        let q = ParsedQuestion {
            question: Some("2+2=?".to_string()),
            options: vec!["A. 3".to_string(), "B. 4".to_string()],
        };
        let msg = solve_user_message(&q);
        assert!(msg.contains("2+2=?"));
        assert!(msg.contains("A. 3\nB. 4"));
    }

    #[test]
    fn test_solve_message_without_options() {
        let q = ParsedQuestion::placeholder("简述光合作用的过程");
        let msg = solve_user_message(&q);
        assert!(msg.contains("无（非选择题）"));
    }

    #[test]
    fn test_ocr_message_mentions_sentinel() {
        assert!(ocr_user_message().contains(NO_TEXT_SENTINEL));
    }
}
