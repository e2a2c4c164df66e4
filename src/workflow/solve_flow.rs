//! 解题流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 识别文字（失败则整个请求失败）
//! 2. 整理题干与选项（失败时使用原文作为题干）
//! 3. 解题（失败时返回空解答）

use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ImageUpload, ParsedQuestion, Solution, SolveResponse};
use crate::services::{OcrService, QuestionParser, Solver, VisionModel};
use crate::utils::truncate_text;
use crate::workflow::solve_ctx::SolveCtx;

/// 流程阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ocr,
    Parse,
    Solve,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ocr => "文字识别",
            Stage::Parse => "题目整理",
            Stage::Solve => "解题",
        };
        f.write_str(name)
    }
}

/// 解题流程
///
/// - 按顺序编排三个阶段
/// - 决定哪些阶段失败需要兜底
/// - 不持有请求级别的状态，可在请求之间共享
pub struct SolveFlow {
    ocr: OcrService,
    parser: QuestionParser,
    solver: Solver,
    verbose_logging: bool,
}

impl SolveFlow {
    pub fn new(config: &Config, model: Arc<dyn VisionModel>) -> Self {
        Self {
            ocr: OcrService::new(model.clone(), config.ocr_model_name.clone()),
            parser: QuestionParser::new(model.clone(), config.parse_model_name.clone()),
            solver: Solver::new(model, config.solve_model_name.clone()),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, image: &ImageUpload, ctx: &SolveCtx) -> AppResult<SolveResponse> {
        let started = Instant::now();
        let mut warnings = Vec::new();

        info!(
            "{} 开始处理 ({}, {} 字节)",
            ctx, image.content_type, ctx.size
        );

        // ========== 阶段 1: 识别文字 ==========
        let stage_start = Instant::now();
        let extracted_text = match self.ocr.extract_text(image).await {
            Ok(text) => {
                info!(
                    "{} ✓ {}完成，耗时 {} ms",
                    ctx,
                    Stage::Ocr,
                    stage_start.elapsed().as_millis()
                );
                text
            }
            Err(e) => {
                warn!("{} ❌ {}失败: {}", ctx, Stage::Ocr, e);
                return Err(e.into());
            }
        };
        self.log_preview(ctx, "原文", &extracted_text);

        // ========== 阶段 2: 整理题目 ==========
        let stage_start = Instant::now();
        let parsed_question = match self.parser.parse(&extracted_text).await {
            Ok(parsed) if !parsed.is_empty() => {
                info!(
                    "{} ✓ {}完成，{} 个选项，耗时 {} ms",
                    ctx,
                    Stage::Parse,
                    parsed.options.len(),
                    stage_start.elapsed().as_millis()
                );
                parsed
            }
            Ok(_) => {
                warn!("{} ⚠️ {}结果为空，使用原文作为题干", ctx, Stage::Parse);
                warnings.push(format!("{}结果为空，已使用识别原文作为题干", Stage::Parse));
                ParsedQuestion::placeholder(&extracted_text)
            }
            Err(e) => {
                warn!("{} ⚠️ {}失败，使用原文作为题干: {}", ctx, Stage::Parse, e);
                warnings.push(format!("{}失败，已使用识别原文作为题干: {}", Stage::Parse, e));
                ParsedQuestion::placeholder(&extracted_text)
            }
        };

        // ========== 阶段 3: 解题 ==========
        let stage_start = Instant::now();
        let solution = match self.solver.solve(&parsed_question).await {
            Ok(solution) => {
                info!(
                    "{} ✓ {}完成，耗时 {} ms",
                    ctx,
                    Stage::Solve,
                    stage_start.elapsed().as_millis()
                );
                solution
            }
            Err(e) => {
                warn!("{} ⚠️ {}失败: {}", ctx, Stage::Solve, e);
                warnings.push(format!("{}失败: {}", Stage::Solve, e));
                Solution::placeholder()
            }
        };

        info!(
            "{} 处理结束，总耗时 {} ms，兜底 {} 处",
            ctx,
            started.elapsed().as_millis(),
            warnings.len()
        );

        Ok(SolveResponse {
            extracted_text,
            parsed_question,
            solution,
            warnings,
        })
    }

    fn log_preview(&self, ctx: &SolveCtx, label: &str, text: &str) {
        if self.verbose_logging {
            info!("{} {}: {}", ctx, label, text);
        } else {
            info!("{} {}: {}", ctx, label, truncate_text(text, 80));
        }
    }
}
