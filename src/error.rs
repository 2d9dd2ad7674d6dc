use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 论文 ID 查询错误（整次运行失败）
    #[error("查询错误: {0}")]
    Query(#[from] QueryError),
    /// 单篇论文语句获取错误
    #[error("获取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 进度存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 图查询（SPARQL）错误
///
/// 解析目标论文集合失败时产生，不做重试。
#[derive(Debug, Error)]
pub enum QueryError {
    /// 网络请求失败
    #[error("查询请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 返回非成功状态码
    #[error("查询返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 内容类型不符
    #[error("查询返回了意外的内容类型 ({endpoint}): {content_type:?}")]
    UnexpectedContentType {
        endpoint: String,
        content_type: Option<String>,
    },
    /// 响应体为空
    #[error("查询返回空结果: {endpoint}")]
    EmptyBody { endpoint: String },
    /// JSON 解析失败
    #[error("查询结果解析失败 ({endpoint}): {source}")]
    ParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 论文语句获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 单次请求失败（可重试）
    #[error("请求 {url} 失败: {message}")]
    Attempt { url: String, message: String },
    /// 重试次数耗尽
    #[error("论文 {paper_id} 在 {attempts} 次尝试后仍然失败: {last_error}")]
    Exhausted {
        paper_id: String,
        attempts: u32,
        last_error: String,
    },
    /// 等待重试期间收到停止信号
    #[error("获取论文 {paper_id} 时收到停止信号")]
    Cancelled { paper_id: String },
}

/// 进度存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读取文档失败
    #[error("读取文档失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文档失败
    #[error("写入文档失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 删除文档失败
    #[error("删除文档失败 ({path}): {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 文档序列化 / 反序列化失败
    #[error("文档格式错误 ({path}): {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 键名不合法（模板键或论文 ID 不能作为文件名）
    #[error("非法的文档键: {0}")]
    InvalidKey(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 模板文件读取失败
    #[error("无法读取模板文件 {path}: {source}")]
    TemplateFileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 模板文件解析失败
    #[error("模板文件解析失败 ({path}): {source}")]
    TemplateParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 未知的查询模板
    #[error("未知的查询模板: {0}")]
    UnknownTemplate(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建未知模板错误
    pub fn unknown_template(key: impl Into<String>) -> Self {
        AppError::Config(ConfigError::UnknownTemplate(key.into()))
    }
}

impl FetchError {
    /// 是否因停止信号而中断
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }
}

impl StoreError {
    pub(crate) fn serialization(path: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Serialization {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_cancelled_flag() {
        let cancelled = FetchError::Cancelled {
            paper_id: "R1".to_string(),
        };
        let exhausted = FetchError::Exhausted {
            paper_id: "R1".to_string(),
            attempts: 3,
            last_error: "boom".to_string(),
        };

        assert!(cancelled.is_cancelled());
        assert!(!exhausted.is_cancelled());
    }

    #[test]
    fn test_app_error_wraps_query_error() {
        let err: AppError = QueryError::EmptyBody {
            endpoint: "http://localhost/sparql".to_string(),
        }
        .into();

        assert!(matches!(err, AppError::Query(_)));
        assert!(err.to_string().contains("http://localhost/sparql"));
    }
}
