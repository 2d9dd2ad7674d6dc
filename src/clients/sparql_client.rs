/// 图查询（SPARQL）客户端
///
/// 按模板查询目标论文集合，返回去重后的论文 ID 列表
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info};

use super::PaperIdSource;
use crate::error::QueryError;
use crate::models::QueryTemplate;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// SPARQL 查询客户端
#[derive(Debug, Clone)]
pub struct SparqlClient {
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<PaperBinding>,
}

#[derive(Debug, Deserialize)]
struct PaperBinding {
    paper: Option<BindingValue>,
    #[allow(dead_code)]
    doi: Option<BindingValue>,
}

#[derive(Debug, Deserialize)]
struct BindingValue {
    value: String,
}

impl SparqlClient {
    /// 创建新的查询客户端
    pub fn new(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }
}

#[async_trait]
impl PaperIdSource for SparqlClient {
    async fn resolve_paper_ids(&self, template: &QueryTemplate) -> Result<Vec<String>, QueryError> {
        info!("🔍 查询模板 {} 的目标论文...", template.key);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", template.query.as_str())])
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|source| QueryError::RequestFailed {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());
        if !is_json_content_type(content_type.as_deref()) {
            return Err(QueryError::UnexpectedContentType {
                endpoint: self.endpoint.clone(),
                content_type,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| QueryError::RequestFailed {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(QueryError::EmptyBody {
                endpoint: self.endpoint.clone(),
            });
        }

        let parsed: SparqlResponse =
            serde_json::from_slice(&body).map_err(|source| QueryError::ParseFailed {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let ids = extract_paper_ids(parsed.results.bindings);
        debug!("模板 {} 返回 {} 篇论文", template.key, ids.len());
        Ok(ids)
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains(SPARQL_RESULTS_JSON) || ct.contains("application/json"))
}

/// 提取论文 ID，保留首次出现的顺序
fn extract_paper_ids(bindings: Vec<PaperBinding>) -> Vec<String> {
    let mut seen = HashSet::new();
    bindings
        .into_iter()
        .filter_map(|binding| binding.paper)
        .filter_map(|paper| last_path_segment(&paper.value).map(str::to_string))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// IRI 的最后一个路径段
pub fn last_path_segment(iri: &str) -> Option<&str> {
    iri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
