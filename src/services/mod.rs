pub mod llm_service;
pub mod ocr_service;
pub mod prompts;
pub mod question_parser;
pub mod solver;

pub use llm_service::{ChatRequest, LlmService, VisionModel};
pub use ocr_service::OcrService;
pub use question_parser::QuestionParser;
pub use solver::Solver;
