//! LLM 服务 - 业务能力层
//!
//! 只负责"调用模型"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::models::ImageUpload;

/// 一次模型调用的输入
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system_message: Option<&'a str>,
    pub user_message: &'a str,
    /// 随消息附带的图片（可选）
    pub image: Option<&'a ImageUpload>,
}

/// 能接收文字和图片的对话模型
///
/// 三个阶段都通过这个接口调用模型，测试时可替换为预设回复
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<String, LlmError>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 OpenAI 兼容接口
/// - 图片以 data URL 的形式随用户消息发送
/// - 不做重试，不关心调用方是哪个阶段
pub struct LlmService {
    client: Client<OpenAIConfig>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn build_user_message(
        user_message: &str,
        image: Option<&ImageUpload>,
    ) -> Result<ChatCompletionRequestMessage, LlmError> {
        let built = match image {
            Some(image) => {
                // 使用 Vision API：文本 + 图片
                let content_parts = vec![
                    ChatCompletionRequestUserMessageContentPart::Text(
                        ChatCompletionRequestMessageContentPartText {
                            text: user_message.to_string(),
                        },
                    ),
                    ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: image.to_data_url(),
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    ),
                ];

                debug!(
                    "使用 Vision API，图片: {} ({}, {} 字节)",
                    image.file_name,
                    image.content_type,
                    image.size()
                );

                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(
                        content_parts,
                    ))
                    .build()
            }
            None => ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build(),
        };

        built
            .map(ChatCompletionRequestMessage::User)
            .map_err(LlmError::request_build)
    }
}

#[async_trait]
impl VisionModel for LlmService {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", request.model);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = request.system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(LlmError::request_build)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        messages.push(Self::build_user_message(
            request.user_message,
            request.image,
        )?);

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(request.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(LlmError::request_build)?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                LlmError::api_call_failed(request.model, e)
            })?;

        debug!("LLM API 调用成功");

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::EmptyResponse {
                model: request.model.to_string(),
            })?;

        let content = choice
            .message
            .content
            .clone()
            .ok_or_else(|| LlmError::EmptyContent {
                model: request.model.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        let config = Config::default()
            .with_env_overrides(|name| std::env::var(name).ok())
            .expect("环境变量配置无效");
        LlmService::new(&config)
    }

    #[test]
    fn test_user_message_without_image_is_text() {
        let message = LlmService::build_user_message("你好", None).unwrap();
        match message {
            ChatCompletionRequestMessage::User(user) => {
                assert!(matches!(
                    user.content,
                    ChatCompletionRequestUserMessageContent::Text(ref t) if t == "你好"
                ));
            }
            _ => panic!("应当是用户消息"),
        }
    }

    #[test]
    fn test_user_message_with_image_has_two_parts() {
        let image = ImageUpload::new("q.gif", Some("image/gif"), b"GIF89a".to_vec(), 1024).unwrap();
        let message = LlmService::build_user_message("识别文字", Some(&image)).unwrap();
        match message {
            ChatCompletionRequestMessage::User(user) => match user.content {
                ChatCompletionRequestUserMessageContent::Array(parts) => {
                    assert_eq!(parts.len(), 2);
                    match &parts[1] {
                        ChatCompletionRequestUserMessageContentPart::ImageUrl(part) => {
                            assert!(part.image_url.url.starts_with("data:image/gif;base64,"));
                        }
                        _ => panic!("第二部分应当是图片"),
                    }
                }
                _ => panic!("带图片时应当是多部分内容"),
            },
            _ => panic!("应当是用户消息"),
        }
    }

    /// 测试通用 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_chat_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_chat_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let model = Config::default().parse_model_name;

        let result = service
            .chat(ChatRequest {
                model: &model,
                system_message: Some("你是一个简洁的助手，回答要简短。"),
                user_message: "1+1 等于几？只回答数字。",
                image: None,
            })
            .await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }
}
