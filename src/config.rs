use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, ConfigError};

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "QUESTION_SOLVER_CONFIG";

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 上传图片的最大字节数
    pub max_upload_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 识别图片文字所用模型（必须支持图片输入）
    pub ocr_model_name: String,
    /// 整理题干与选项所用模型
    pub parse_model_name: String,
    /// 解题所用模型
    pub solve_model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: 8 * 1024 * 1024,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            ocr_model_name: "gpt-4o-mini".to_string(),
            parse_model_name: "gpt-4o-mini".to_string(),
            solve_model_name: "gpt-4o".to_string(),
            temperature: 0.2,
            max_tokens: 2048,
        }
    }
}

impl Config {
    /// 加载配置：TOML 文件（可选）+ 环境变量覆盖
    pub fn load() -> Result<Self, AppError> {
        let base = match config_file_path() {
            Some(path) => Self::from_toml_file(&path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取配置，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::Config(ConfigError::TomlParseFailed { message, .. }) => {
                AppError::Config(ConfigError::TomlParseFailed {
                    path: path.display().to_string(),
                    message,
                })
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        toml::from_str(content).map_err(|e| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: String::new(),
                message: e.to_string(),
            })
        })
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 负责读取变量，测试中可以传入固定的映射
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HOST") {
            self.host = v;
        }
        if let Some(v) = parse_var(&lookup, "PORT", "u16")? {
            self.port = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_UPLOAD_BYTES", "usize")? {
            self.max_upload_bytes = v;
        }
        if let Some(v) = parse_var(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = lookup("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Some(v) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = lookup("OCR_MODEL_NAME") {
            self.ocr_model_name = v;
        }
        if let Some(v) = lookup("PARSE_MODEL_NAME") {
            self.parse_model_name = v;
        }
        if let Some(v) = lookup("SOLVE_MODEL_NAME") {
            self.solve_model_name = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_TEMPERATURE", "f32")? {
            self.temperature = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_MAX_TOKENS", "u32")? {
            self.max_tokens = v;
        }
        Ok(self)
    }

    /// 服务监听地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.exists().then_some(default)
}

fn parse_var<F, T>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            port = 8080
            solve_model_name = "deepseek-chat"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.solve_model_name, "deepseek-chat");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_upload_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("port = \"abc\"").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::TomlParseFailed { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env_overrides(lookup_from(&[
                ("PORT", "9000"),
                ("LLM_API_KEY", "sk-test"),
                ("OCR_MODEL_NAME", "qwen-vl-max"),
                ("VERBOSE_LOGGING", "true"),
            ]))
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.llm_api_key, "sk-test");
        assert_eq!(config.ocr_model_name, "qwen-vl-max");
        assert!(config.verbose_logging);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_bad_env_number_is_rejected() {
        let err = Config::default()
            .with_env_overrides(lookup_from(&[("LLM_MAX_TOKENS", "lots")]))
            .unwrap_err();

        match err {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name, value, ..
            }) => {
                assert_eq!(var_name, "LLM_MAX_TOKENS");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
