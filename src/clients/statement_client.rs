/// 语句包客户端
///
/// 每篇论文一次 `GET {api_base_url}/statements/{paperId}/bundle`，失败时退避重试
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::debug;

use super::StatementSource;
use crate::error::FetchError;
use crate::infrastructure::{retry_with_backoff, RetryError, RetryPolicy, Shutdown};
use crate::models::{Statement, StatementBundle};

/// 语句包客户端
#[derive(Debug, Clone)]
pub struct StatementClient {
    api_base_url: String,
    http: reqwest::Client,
    policy: RetryPolicy,
    shutdown: Shutdown,
}

impl StatementClient {
    /// 创建新的语句包客户端
    ///
    /// # 参数
    /// - `api_base_url`: 接口基础 URL
    /// - `http`: 共享的 HTTP 客户端
    /// - `policy`: 重试策略
    /// - `shutdown`: 停止信号，用于中断退避等待
    pub fn new(
        api_base_url: impl Into<String>,
        http: reqwest::Client,
        policy: RetryPolicy,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            http,
            policy,
            shutdown,
        }
    }

    fn bundle_url(&self, paper_id: &str) -> String {
        format!(
            "{}/statements/{}/bundle",
            self.api_base_url.trim_end_matches('/'),
            paper_id
        )
    }

    /// 单次请求，不重试
    async fn fetch_once(&self, url: &str) -> Result<Vec<Statement>, FetchError> {
        let attempt_failed = |message: String| FetchError::Attempt {
            url: url.to_string(),
            message,
        };

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| attempt_failed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} 不存在，按无语句处理", url);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(attempt_failed(format!("HTTP {}", status)));
        }

        let bundle: StatementBundle = response
            .json()
            .await
            .map_err(|e| attempt_failed(format!("语句包解析失败: {}", e)))?;
        Ok(bundle.statements)
    }
}

#[async_trait]
impl StatementSource for StatementClient {
    async fn fetch_statements(&self, paper_id: &str) -> Result<Vec<Statement>, FetchError> {
        let url = self.bundle_url(paper_id);
        let label = format!("获取论文 {} 的语句", paper_id);

        retry_with_backoff(&self.policy, &self.shutdown, &label, |_| self.fetch_once(&url))
            .await
            .map_err(|e| match e {
                RetryError::Exhausted {
                    attempts,
                    last_error,
                } => FetchError::Exhausted {
                    paper_id: paper_id.to_string(),
                    attempts,
                    last_error: last_error.to_string(),
                },
                RetryError::Cancelled { .. } => FetchError::Cancelled {
                    paper_id: paper_id.to_string(),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_url_trims_slash() {
        let client = StatementClient::new(
            "http://localhost:8080/api/",
            reqwest::Client::new(),
            RetryPolicy::default(),
            Shutdown::never(),
        );

        assert_eq!(
            client.bundle_url("R42"),
            "http://localhost:8080/api/statements/R42/bundle"
        );
    }
}
