//! 程序配置
//!
//! 启动时构建一次，之后只读，通过引用或 `Arc` 传给各个组件。
//!
//! 优先级（从低到高）：内置默认值 → `REWRITER_CONFIG` 指向的 TOML 文件 → 环境变量

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 指向 TOML 配置文件的环境变量
pub const CONFIG_PATH_ENV: &str = "REWRITER_CONFIG";

/// 程序配置文件
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    // --- LLM 配置 ---
    pub openai_api_key: Option<String>,
    /// 兼容 OpenAI API 的自定义端点
    pub openai_api_base: Option<String>,
    pub model_name: String,
    /// 本文超过该字符数时截断后再写入提示词
    pub max_body_chars: usize,
    // --- 批量处理配置 ---
    /// 同时处理的文章数量
    pub batch_concurrency: usize,
    /// 每批文章数量
    pub batch_chunk_size: usize,
    /// 批与批之间的冷却时间（毫秒）
    pub chunk_cooldown_ms: u64,
    /// 最后一批之后是否也冷却
    pub trailing_cooldown: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            openai_api_key: None,
            openai_api_base: None,
            model_name: "gpt-5-mini".to_string(),
            max_body_chars: 200_000,
            batch_concurrency: 4,
            batch_chunk_size: 3,
            chunk_cooldown_ms: 50,
            trailing_cooldown: true,
            verbose_logging: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "***"),
            )
            .field("openai_api_base", &self.openai_api_base)
            .field("model_name", &self.model_name)
            .field("max_body_chars", &self.max_body_chars)
            .field("batch_concurrency", &self.batch_concurrency)
            .field("batch_chunk_size", &self.batch_chunk_size)
            .field("chunk_cooldown_ms", &self.chunk_cooldown_ms)
            .field("trailing_cooldown", &self.trailing_cooldown)
            .field("verbose_logging", &self.verbose_logging)
            .finish()
    }
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())?
            .validated()
    }

    /// 从 TOML 文件加载，缺省的项取默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::FileReadFailed {
                path: display.clone(),
                source,
            }
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: display,
            source,
        })
    }

    /// 用 `lookup` 返回的值覆盖对应配置项
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(v).filter(|k| !k.trim().is_empty());
        }
        if let Some(v) = lookup("OPENAI_API_BASE") {
            self.openai_api_base = Some(v).filter(|b| !b.trim().is_empty());
        }
        if let Some(v) = lookup("MODEL_NAME") {
            self.model_name = v;
        }
        if let Some(v) = lookup("MAX_BODY_CHARS") {
            self.max_body_chars = parse_var("MAX_BODY_CHARS", &v, "usize")?;
        }
        if let Some(v) = lookup("BATCH_CONCURRENCY") {
            self.batch_concurrency = parse_var("BATCH_CONCURRENCY", &v, "usize")?;
        }
        if let Some(v) = lookup("BATCH_CHUNK_SIZE") {
            self.batch_chunk_size = parse_var("BATCH_CHUNK_SIZE", &v, "usize")?;
        }
        if let Some(v) = lookup("BATCH_CHUNK_COOLDOWN_MS") {
            self.chunk_cooldown_ms = parse_var("BATCH_CHUNK_COOLDOWN_MS", &v, "u64")?;
        }
        if let Some(v) = lookup("BATCH_TRAILING_COOLDOWN") {
            self.trailing_cooldown = parse_var("BATCH_TRAILING_COOLDOWN", &v, "bool")?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }

    /// 检查数值范围
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.batch_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "batch_concurrency".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.batch_chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "batch_chunk_size".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.max_body_chars == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_body_chars".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(self)
    }

    pub fn chunk_cooldown(&self) -> Duration {
        Duration::from_millis(self.chunk_cooldown_ms)
    }

    pub fn has_credential(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
