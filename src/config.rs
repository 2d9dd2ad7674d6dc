use crate::error::ConfigError;
use crate::infrastructure::RetryPolicy;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 程序配置
///
/// 所有外部端点和重试策略都在这里显式给出，运行时由调用方注入，
/// 不从全局状态读取。
#[derive(Clone, Debug)]
pub struct Config {
    /// 图查询（SPARQL）端点
    pub sparql_endpoint: String,
    /// 语句包接口的基础 URL（`{api_base_url}/statements/{id}/bundle`）
    pub api_base_url: String,
    /// 进度文档存放目录
    pub store_dir: PathBuf,
    /// 单篇论文最多尝试次数
    pub fetch_max_attempts: u32,
    /// 首次重试前的等待时间（之后每次翻倍）
    pub fetch_base_delay_ms: u64,
    /// 单次 HTTP 请求超时
    pub http_timeout_secs: u64,
    /// 额外的查询模板文件（TOML）
    pub templates_file: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sparql_endpoint: "https://orkg.org/triplestore".to_string(),
            api_base_url: "https://orkg.org/api".to_string(),
            store_dir: PathBuf::from("statistics_store"),
            fetch_max_attempts: 3,
            fetch_base_delay_ms: 1000,
            http_timeout_secs: 60,
            templates_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    ///
    /// 数值类环境变量无法解析时返回 [`ConfigError::EnvVarParseFailed`]，
    /// 不会悄悄退回默认值。
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            sparql_endpoint: std::env::var("SPARQL_ENDPOINT").unwrap_or(default.sparql_endpoint),
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            store_dir: std::env::var("STORE_DIR").map(PathBuf::from).unwrap_or(default.store_dir),
            fetch_max_attempts: parse_env("FETCH_MAX_ATTEMPTS", "u32")?.unwrap_or(default.fetch_max_attempts),
            fetch_base_delay_ms: parse_env("FETCH_BASE_DELAY_MS", "u64")?.unwrap_or(default.fetch_base_delay_ms),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", "u64")?.unwrap_or(default.http_timeout_secs),
            templates_file: std::env::var("TEMPLATES_FILE").ok().map(PathBuf::from),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
        })
    }

    /// 根据配置构建重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.fetch_max_attempts,
            Duration::from_millis(self.fetch_base_delay_ms),
        )
    }

    /// HTTP 请求超时
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
