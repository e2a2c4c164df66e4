use serde::{Deserialize, Serialize};

use super::question::{ParsedQuestion, Solution};

/// `/api/solve` 成功时的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    /// 图片中识别出的原文
    pub extracted_text: String,
    pub parsed_question: ParsedQuestion,
    pub solution: Solution,
    /// 被兜底处理的阶段说明
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// 失败时的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}
