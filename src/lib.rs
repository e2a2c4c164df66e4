//! # Question Solver
//!
//! 上传试题图片，调用多模态大模型识别文字、整理题目并给出解答
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只对应一次模型调用
//! - `LlmService` - 调用 OpenAI 兼容接口（`VisionModel` 的实现）
//! - `OcrService` - 识别图片文字
//! - `QuestionParser` - 整理题干与选项
//! - `Solver` - 给出答案与解析
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整处理流程
//! - `SolveCtx` - 请求上下文（序号 + 文件名）
//! - `SolveFlow` - 流程编排（识别 → 整理 → 解题，后两步失败时兜底）
//!
//! ### ③ 接入层（Server）
//! - `server/` - axum 路由、上传解析、表单页面
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, LlmError, UploadError};
pub use models::{ImageUpload, ParsedQuestion, Solution, SolveResponse};
pub use server::{build_router, AppState, SolverServer};
pub use services::{ChatRequest, LlmService, VisionModel};
pub use workflow::{SolveCtx, SolveFlow};
