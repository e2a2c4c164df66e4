//! HTTP 路由处理

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::debug;

use crate::error::{AppError, AppResult, UploadError};
use crate::models::{ImageUpload, SolveResponse};
use crate::server::state::AppState;
use crate::workflow::SolveCtx;

/// 表单中图片字段的名称
pub const IMAGE_FIELD: &str = "image";
/// 兼容部分客户端使用的字段名
const IMAGE_FIELD_ALIAS: &str = "file";

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET / - 上传表单页面
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// POST /api/solve - 上传题目图片并返回识别、整理、解答结果
pub async fn solve(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SolveResponse>> {
    let multipart = multipart.map_err(AppError::multipart)?;
    let image = read_image_field(multipart, state.max_upload_bytes()).await?;

    let ctx = SolveCtx::new(state.next_request_id(), image.file_name.clone(), image.size());
    let response = state.flow().run(&image, &ctx).await?;

    Ok(Json(response))
}

/// 从表单中取出图片字段，忽略其他字段
async fn read_image_field(mut multipart: Multipart, max_bytes: usize) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != IMAGE_FIELD && name != IMAGE_FIELD_ALIAS {
            debug!("忽略表单字段: {}", name);
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload".to_string());
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| map_multipart_error(e, max_bytes))?;

        return Ok(ImageUpload::new(
            file_name,
            content_type.as_deref(),
            bytes.to_vec(),
            max_bytes,
        )?);
    }

    Err(UploadError::MissingImage {
        field: IMAGE_FIELD.to_string(),
    }
    .into())
}

fn map_multipart_error(err: axum::extract::multipart::MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::BodyLimitExceeded { limit }.into()
    } else {
        AppError::multipart(err)
    }
}
