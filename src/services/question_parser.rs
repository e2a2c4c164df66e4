//! 题目整理服务 - 业务能力层
//!
//! 把识别出的原文整理为题干 + 选项

use std::sync::Arc;
use tracing::debug;

use crate::error::LlmError;
use crate::models::ParsedQuestion;
use crate::services::llm_service::{ChatRequest, VisionModel};
use crate::services::prompts;
use crate::utils::extract_json;

pub struct QuestionParser {
    model: Arc<dyn VisionModel>,
    model_name: String,
}

impl QuestionParser {
    pub fn new(model: Arc<dyn VisionModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    pub async fn parse(&self, extracted_text: &str) -> Result<ParsedQuestion, LlmError> {
        let user_message = prompts::parse_user_message(extracted_text);
        let reply = self
            .model
            .chat(ChatRequest {
                model: &self.model_name,
                system_message: Some(prompts::PARSE_SYSTEM),
                user_message: &user_message,
                image: None,
            })
            .await?;

        let parsed = extract_json::<ParsedQuestion>(&reply)?.normalized();
        debug!(
            "整理结果: 题干{}，{} 个选项",
            if parsed.question.is_some() { "存在" } else { "缺失" },
            parsed.options.len()
        );

        Ok(parsed)
    }
}
