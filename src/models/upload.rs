use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::UploadError;

/// 用户上传的题目图片
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    /// 媒体类型，例如 `image/png`
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// 校验并创建上传图片
    ///
    /// `declared_type` 为表单中声明的类型；缺失或为通用二进制类型时根据文件头判断
    pub fn new(
        file_name: impl Into<String>,
        declared_type: Option<&str>,
        bytes: Vec<u8>,
        max_bytes: usize,
    ) -> Result<Self, UploadError> {
        let file_name = file_name.into();

        if bytes.is_empty() {
            return Err(UploadError::EmptyFile { file_name });
        }
        if bytes.len() > max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        let declared = declared_type
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty() && t != "application/octet-stream");

        let content_type = match declared {
            Some(t) if t.starts_with("image/") => t,
            Some(t) => return Err(UploadError::UnsupportedType { content_type: t }),
            None => sniff_image_type(&bytes)
                .map(str::to_string)
                .ok_or_else(|| UploadError::UnsupportedType {
                    content_type: "unknown".to_string(),
                })?,
        };

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// 转为 Vision API 可用的 data URL
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// 根据文件头识别常见图片格式
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}
