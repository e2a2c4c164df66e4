use anyhow::Result;
use std::sync::Arc;

use question_solver::utils::logging;
use question_solver::{Config, LlmService, SolverServer};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置并初始化日志，配置出错时也会先写入日志
    let config = logging::init_from_config(Config::load())?;
    logging::log_startup(&config);

    let model = Arc::new(LlmService::new(&config));

    SolverServer::new(config, model).start().await?;

    Ok(())
}
