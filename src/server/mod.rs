//! HTTP 服务
//!
//! - `GET /`          上传表单页面
//! - `POST /api/solve` 上传图片并解题
//! - `GET /health`    健康检查

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::services::VisionModel;
pub use state::AppState;

/// multipart 边界和其他字段的额外空间
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes() + MULTIPART_OVERHEAD;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health_check))
        .route(
            "/api/solve",
            post(routes::solve).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// 解题服务
pub struct SolverServer {
    config: Config,
    state: AppState,
}

impl SolverServer {
    pub fn new(config: Config, model: Arc<dyn VisionModel>) -> Self {
        let state = AppState::new(&config, model);
        Self { config, state }
    }

    /// 启动服务，收到 Ctrl+C 后退出
    pub async fn start(self) -> AppResult<()> {
        let listener = bind_listener(&self.config.bind_address()).await?;
        let router = build_router(self.state);

        info!("✓ 服务已启动: http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("服务已停止");
        Ok(())
    }
}

/// 监听地址，主机名交给系统解析
async fn bind_listener(address: &str) -> AppResult<TcpListener> {
    TcpListener::bind(address).await.map_err(|e| {
        AppError::Config(ConfigError::BindFailed {
            address: address.to_string(),
            message: e.to_string(),
        })
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到退出信号，正在关闭服务...");
    }
}
