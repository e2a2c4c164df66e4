//! 文字识别服务 - 业务能力层
//!
//! 只负责"从图片中读出文字"

use std::sync::Arc;
use tracing::debug;

use crate::error::LlmError;
use crate::models::ImageUpload;
use crate::services::llm_service::{ChatRequest, VisionModel};
use crate::services::prompts::{self, NO_TEXT_SENTINEL};

pub struct OcrService {
    model: Arc<dyn VisionModel>,
    model_name: String,
}

impl OcrService {
    pub fn new(model: Arc<dyn VisionModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// 识别图片中的文字
    ///
    /// 模型返回空内容或无文字标记时返回 `LlmError::NoTextFound`
    pub async fn extract_text(&self, image: &ImageUpload) -> Result<String, LlmError> {
        let user_message = prompts::ocr_user_message();
        let reply = self
            .model
            .chat(ChatRequest {
                model: &self.model_name,
                system_message: Some(prompts::OCR_SYSTEM),
                user_message: &user_message,
                image: Some(image),
            })
            .await?;

        let text = reply.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(NO_TEXT_SENTINEL) {
            return Err(LlmError::NoTextFound);
        }

        debug!("识别出 {} 个字符", text.chars().count());
        Ok(text.to_string())
    }
}
