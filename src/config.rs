use std::path::PathBuf;

use crate::error::ConfigError;

const APP_NAME: &str = "comment_writer";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次请求最多返回的 token 数
    pub llm_max_tokens: u32,
    /// 批量生成的采样温度
    pub generation_temperature: f32,
    /// 单条改写的采样温度
    pub regeneration_temperature: f32,
    // --- 本地存储 ---
    /// 保存进度的目录
    pub data_dir: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            llm_max_tokens: 8192,
            generation_temperature: 0.8,
            regeneration_temperature: 0.7,
            data_dir: default_data_dir(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            generation_temperature: std::env::var("GENERATION_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.generation_temperature),
            regeneration_temperature: std::env::var("REGENERATION_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.regeneration_temperature),
            data_dir: std::env::var("DATA_DIR").map(PathBuf::from).unwrap_or(default.data_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 调用模型前检查必需的配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(APP_NAME),
        None => PathBuf::from("."),
    }
}
