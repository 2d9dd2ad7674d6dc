//! 查询模板
//!
//! 每个模板对应一个预定义的图查询过滤条件，选出一组目标论文。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// 一个查询模板
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
    /// 模板键，例如 `empire`
    pub key: String,
    /// 统计记录 ID，进度文档键为 `{statistic_id}-progress`
    pub statistic_id: String,
    #[serde(default)]
    pub description: String,
    /// SPARQL 查询文本，结果需绑定 `?paper`
    pub query: String,
}

impl QueryTemplate {
    /// 进度文档的键
    pub fn progress_key(&self) -> String {
        format!("{}-progress", self.statistic_id)
    }
}

const ORKG_PREFIXES: &str = r#"PREFIX orkgr: <http://orkg.org/orkg/resource/>
PREFIX orkgc: <http://orkg.org/orkg/class/>
PREFIX orkgp: <http://orkg.org/orkg/predicate/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
"#;

/// 模板注册表
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, QueryTemplate>,
}

impl TemplateRegistry {
    /// 内置模板：`empire` 和 `nlp4re`
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.insert(QueryTemplate {
            key: "empire".to_string(),
            statistic_id: "empire-statistics".to_string(),
            description: "Empirical research practice in requirements engineering".to_string(),
            query: format!(
                r#"{ORKG_PREFIXES}
SELECT DISTINCT ?paper ?doi
WHERE {{
  ?paper orkgp:P31 ?contribution .
  ?contribution a orkgc:C27001 .
  OPTIONAL {{ ?paper orkgp:P26 ?doi . }}
}}"#
            ),
        });
        registry.insert(QueryTemplate {
            key: "nlp4re".to_string(),
            statistic_id: "nlp4re-statistics".to_string(),
            description: "Natural language processing for requirements engineering".to_string(),
            query: format!(
                r#"{ORKG_PREFIXES}
SELECT DISTINCT ?paper ?doi
WHERE {{
  ?paper orkgp:P31 ?contribution .
  ?contribution a orkgc:C121001 .
  OPTIONAL {{ ?paper orkgp:P26 ?doi . }}
}}"#
            ),
        });
        registry
    }

    /// 添加或覆盖模板
    pub fn insert(&mut self, template: QueryTemplate) {
        self.templates.insert(template.key.clone(), template);
    }

    /// 合并另一组模板（同名覆盖）
    pub fn extend(&mut self, templates: impl IntoIterator<Item = QueryTemplate>) {
        for template in templates {
            self.insert(template);
        }
    }

    pub fn get(&self, key: &str) -> Result<&QueryTemplate, ConfigError> {
        self.templates
            .get(key)
            .ok_or_else(|| ConfigError::UnknownTemplate(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
