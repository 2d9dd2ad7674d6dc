use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单篇论文语句的分类结果（不含论文 ID）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementAnalysis {
    pub total: u64,
    pub resource_count: u64,
    pub literal_count: u64,
    pub predicate_count: u64,
    pub resource_ids: Vec<String>,
    pub literal_ids: Vec<String>,
    pub predicate_ids: Vec<String>,
}

/// 单篇论文的分析结果
///
/// 保留完整的 ID 列表而不只是计数，续跑时重新计算去重集合不需要再次请求网络。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperAnalysisResult {
    pub paper_id: String,
    pub total_statements: u64,
    pub resource_count: u64,
    pub literal_count: u64,
    pub predicate_count: u64,
    #[serde(default)]
    pub resource_ids: Vec<String>,
    #[serde(default)]
    pub literal_ids: Vec<String>,
    #[serde(default)]
    pub predicate_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    /// 获取失败时记录的错误信息，此时所有计数为零
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl PaperAnalysisResult {
    /// 由分类结果构建
    pub fn from_analysis(paper_id: impl Into<String>, analysis: StatementAnalysis) -> Self {
        Self {
            paper_id: paper_id.into(),
            total_statements: analysis.total,
            resource_count: analysis.resource_count,
            literal_count: analysis.literal_count,
            predicate_count: analysis.predicate_count,
            resource_ids: analysis.resource_ids,
            literal_ids: analysis.literal_ids,
            predicate_ids: analysis.predicate_ids,
            analyzed_at: Some(Utc::now()),
            fetch_error: None,
        }
    }

    /// 获取失败的论文：全零计数并附带错误信息
    pub fn failed(paper_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            fetch_error: Some(error.into()),
            ..Self::from_analysis(paper_id, StatementAnalysis::default())
        }
    }

    /// 比较两个结果的统计内容，忽略时间戳
    pub fn same_content(&self, other: &Self) -> bool {
        self.paper_id == other.paper_id
            && self.total_statements == other.total_statements
            && self.resource_count == other.resource_count
            && self.literal_count == other.literal_count
            && self.predicate_count == other.predicate_count
            && self.resource_ids == other.resource_ids
            && self.literal_ids == other.literal_ids
            && self.predicate_ids == other.predicate_ids
            && self.fetch_error == other.fetch_error
    }
}

/// 全局统计
///
/// `total*` 为各论文计数之和（跨论文共享的 ID 会被重复计算），
/// `globalDistinct*` 为去重集合大小，始终不大于对应的和。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatistics {
    pub total_statements: u64,
    pub total_resources: u64,
    pub total_literals: u64,
    pub total_predicates: u64,
    pub global_distinct_resources: u64,
    pub global_distinct_literals: u64,
    pub global_distinct_predicates: u64,
    pub paper_count: u64,
}
