use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorBody;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 上传内容错误（客户端问题）
    #[error("上传错误: {0}")]
    Upload(#[from] UploadError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    /// JSON 序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 上传相关错误
#[derive(Debug, Error)]
pub enum UploadError {
    /// 表单中没有图片字段
    #[error("缺少图片字段 \"{field}\"")]
    MissingImage { field: String },
    /// 图片内容为空
    #[error("上传的图片为空: {file_name}")]
    EmptyFile { file_name: String },
    /// 不支持的文件类型
    #[error("不支持的文件类型: {content_type}")]
    UnsupportedType { content_type: String },
    /// 文件过大
    #[error("图片过大: {size} 字节 (上限 {limit} 字节)")]
    TooLarge { size: usize, limit: usize },
    /// 请求体超过限制（读取表单时被截断）
    #[error("请求体超过上限 {limit} 字节")]
    BodyLimitExceeded { limit: usize },
    /// multipart 解析失败
    #[error("无法解析表单: {message}")]
    Multipart { message: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("构建请求失败: {message}")]
    RequestBuild { message: String },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 图片中没有识别到文字
    #[error("图片中未识别到文字")]
    NoTextFound,
    /// 返回内容不是合法 JSON
    #[error("无法解析LLM返回的JSON ({reason}): {snippet}")]
    InvalidJson { reason: String, snippet: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {message}")]
    TomlParseFailed { path: String, message: String },
    /// 无法监听地址（主机名无法解析或端口被占用）
    #[error("无法监听地址 {address}: {message}")]
    BindFailed { address: String, message: String },
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建 API 调用错误
    pub fn api_call_failed(model: impl Into<String>, source: impl std::fmt::Display) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            message: source.to_string(),
        }
    }

    /// 创建请求构建错误
    pub fn request_build(source: impl std::fmt::Display) -> Self {
        LlmError::RequestBuild {
            message: source.to_string(),
        }
    }
}

impl AppError {
    /// 创建 multipart 解析错误
    pub fn multipart(source: impl std::fmt::Display) -> Self {
        AppError::Upload(UploadError::Multipart {
            message: source.to_string(),
        })
    }

    /// 错误类别，写入响应体的 `kind` 字段
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Upload(
                UploadError::TooLarge { .. } | UploadError::BodyLimitExceeded { .. },
            ) => "file_too_large",
            AppError::Upload(UploadError::UnsupportedType { .. }) => "unsupported_type",
            AppError::Upload(_) => "bad_upload",
            AppError::Llm(LlmError::NoTextFound) => "no_text_found",
            AppError::Llm(_) => "llm_error",
            AppError::Config(_) => "config_error",
            AppError::Io(_) => "io_error",
            AppError::Json(_) => "json_error",
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upload(
                UploadError::TooLarge { .. } | UploadError::BodyLimitExceeded { .. },
            ) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upload(UploadError::UnsupportedType { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::Llm(LlmError::NoTextFound) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Io(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("请求失败 ({}): {}", status, self);
        } else {
            tracing::warn!("请求被拒绝 ({}): {}", status, self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing: AppError = UploadError::MissingImage {
            field: "image".to_string(),
        }
        .into();
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.kind(), "bad_upload");

        let unsupported: AppError = UploadError::UnsupportedType {
            content_type: "application/pdf".to_string(),
        }
        .into();
        assert_eq!(unsupported.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let no_text: AppError = LlmError::NoTextFound.into();
        assert_eq!(no_text.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let api: AppError = LlmError::api_call_failed("gpt-4o", "connection reset").into();
        assert_eq!(api.status_code(), StatusCode::BAD_GATEWAY);
        assert!(api.to_string().contains("gpt-4o"));
    }
}
