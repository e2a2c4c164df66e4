/// 日志工具模块
///
/// 提供日志初始化、启动信息输出和文本截断
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::error::AppError;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择默认级别
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "question_solver=debug,tower_http=debug"
    } else {
        "question_solver=info,tower_http=info"
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// 按配置初始化日志
///
/// 配置加载失败时以默认级别初始化，先记录错误再返回
pub fn init_from_config(loaded: Result<Config, AppError>) -> Result<Config, AppError> {
    match loaded {
        Ok(config) => {
            init(config.verbose_logging);
            Ok(config)
        }
        Err(e) => {
            init(false);
            error!("❌ 配置加载失败: {}", e);
            Err(e)
        }
    }
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 题目解答服务启动");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📡 监听地址: http://{}", config.bind_address());
    info!("🔗 LLM 接口: {}", config.llm_api_base_url);
    info!(
        "🤖 模型: 识别={} | 整理={} | 解题={}",
        config.ocr_model_name, config.parse_model_name, config.solve_model_name
    );
    info!("📦 上传上限: {} 字节", config.max_upload_bytes);
    info!("{}", "=".repeat(60));

    if config.llm_api_key.is_empty() {
        warn!("⚠️ 未设置 LLM_API_KEY，调用模型时将会失败");
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
