//! 请求处理上下文
//!
//! 封装"我正在处理哪一次上传"这一信息

use std::fmt::Display;

/// 单次解题请求的上下文
#[derive(Debug, Clone)]
pub struct SolveCtx {
    /// 请求序号（进程内递增，仅用于日志）
    pub request_id: u64,

    /// 上传的文件名
    pub file_name: String,

    /// 图片字节数
    pub size: usize,
}

impl SolveCtx {
    pub fn new(request_id: u64, file_name: impl Into<String>, size: usize) -> Self {
        Self {
            request_id,
            file_name: file_name.into(),
            size,
        }
    }
}

impl Display for SolveCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[请求 #{} {}]", self.request_id, self.file_name)
    }
}
