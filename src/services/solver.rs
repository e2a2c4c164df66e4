//! 解题服务 - 业务能力层

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::models::{ParsedQuestion, Solution};
use crate::services::llm_service::{ChatRequest, VisionModel};
use crate::services::prompts;
use crate::utils::{extract_json, truncate_text};

pub struct Solver {
    model: Arc<dyn VisionModel>,
    model_name: String,
}

impl Solver {
    pub fn new(model: Arc<dyn VisionModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// 解答题目
    ///
    /// 回复不是 JSON 但有内容时，整段回复作为解析返回；
    /// 是 JSON 却没有答案和解析时返回错误
    pub async fn solve(&self, question: &ParsedQuestion) -> Result<Solution, LlmError> {
        let user_message = prompts::solve_user_message(question);
        let reply = self
            .model
            .chat(ChatRequest {
                model: &self.model_name,
                system_message: Some(prompts::SOLVE_SYSTEM),
                user_message: &user_message,
                image: None,
            })
            .await?;

        match extract_json::<Solution>(&reply) {
            Ok(solution) => {
                let solution = solution.normalized();
                if solution.is_empty() {
                    // JSON 合法但没有答案和解析，原样带回便于排查
                    return Err(LlmError::InvalidJson {
                        reason: "缺少 answer 和 explanation 字段".to_string(),
                        snippet: truncate_text(reply.trim(), 200),
                    });
                }
                debug!("答案: {:?}", solution.answer);
                Ok(solution)
            }
            Err(e) if !reply.trim().is_empty() => {
                warn!(
                    "解题回复不是 JSON，按纯文本处理: {} ({})",
                    truncate_text(&reply, 80),
                    e
                );
                Ok(Solution::from_plain_text(&reply))
            }
            Err(e) => Err(e),
        }
    }
}
