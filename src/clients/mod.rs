//! 外部服务客户端
//!
//! - `SparqlClient` - 图查询端点，解析目标论文 ID
//! - `StatementClient` - 语句包端点，获取单篇论文的语句
//!
//! 编排层只依赖下面两个 trait，测试时可以替换为内存实现。

pub mod sparql_client;
pub mod statement_client;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{FetchError, QueryError};
use crate::models::{QueryTemplate, Statement};

pub use sparql_client::SparqlClient;
pub use statement_client::StatementClient;

/// 目标论文集合的来源
#[async_trait]
pub trait PaperIdSource: Send + Sync {
    /// 返回去重后的有序论文 ID 列表
    async fn resolve_paper_ids(&self, template: &QueryTemplate) -> Result<Vec<String>, QueryError>;
}

/// 单篇论文语句的来源
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// 不存在的论文返回空列表
    async fn fetch_statements(&self, paper_id: &str) -> Result<Vec<Statement>, FetchError>;
}

/// 构建共享的 HTTP 客户端
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("paper-statistics/", env!("CARGO_PKG_VERSION")))
        .build()
}
