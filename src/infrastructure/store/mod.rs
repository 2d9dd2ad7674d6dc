//! 进度存储 - 基础设施层
//!
//! 被动的持久化边界：保存单篇论文结果、运行进度文档和发布的统计记录。
//! 不包含任何独立的修改逻辑，所有写入都由编排层按顺序发起。
//!
//! 每个模板拥有独立的命名空间：
//! - `{statisticId}-progress`：进度文档
//! - 以论文 ID 为键的单篇结果集合
//! - 发布给看板的最终统计记录

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{
    PaperAnalysisResult, ProgressUpdate, PublishedStatistics, QueryTemplate, StatisticsProgress,
};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// 从存储中读取的缓存进度
#[derive(Debug, Clone, Default)]
pub struct CachedProgress {
    pub processed_paper_ids: HashSet<String>,
    /// 按论文 ID 排序
    pub cached_results: Vec<PaperAnalysisResult>,
}

impl CachedProgress {
    pub fn from_results(mut cached_results: Vec<PaperAnalysisResult>) -> Self {
        cached_results.sort_by(|a, b| a.paper_id.cmp(&b.paper_id));
        let processed_paper_ids = cached_results.iter().map(|r| r.paper_id.clone()).collect();
        Self {
            processed_paper_ids,
            cached_results,
        }
    }
}

/// 进度存储接口
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// 读取模板下已保存的所有单篇结果
    async fn load_progress(&self, template: &QueryTemplate) -> Result<CachedProgress, StoreError>;

    /// 写入（覆盖）一篇论文的结果，幂等
    async fn save_result(
        &self,
        template: &QueryTemplate,
        result: &PaperAnalysisResult,
    ) -> Result<(), StoreError>;

    /// 删除一篇论文的结果，不存在时不报错
    async fn delete_result(&self, template: &QueryTemplate, paper_id: &str) -> Result<(), StoreError>;

    async fn load_progress_summary(
        &self,
        template: &QueryTemplate,
    ) -> Result<Option<StatisticsProgress>, StoreError>;

    /// 整体写入进度文档
    async fn write_progress_summary(
        &self,
        template: &QueryTemplate,
        progress: &StatisticsProgress,
    ) -> Result<(), StoreError>;

    /// 删除全部单篇结果和进度文档（强制全量刷新时使用）
    async fn purge(&self, template: &QueryTemplate) -> Result<(), StoreError>;

    /// 写入面向看板的统计记录
    async fn publish_statistics(&self, published: &PublishedStatistics) -> Result<(), StoreError>;

    async fn load_published(
        &self,
        template: &QueryTemplate,
    ) -> Result<Option<PublishedStatistics>, StoreError>;

    /// 合并更新进度文档，返回更新后的文档
    async fn save_progress_summary(
        &self,
        template: &QueryTemplate,
        update: ProgressUpdate,
    ) -> Result<StatisticsProgress, StoreError> {
        let mut progress = self
            .load_progress_summary(template)
            .await?
            .unwrap_or_else(|| StatisticsProgress::idle(template.key.clone()));
        progress.apply(update);
        self.write_progress_summary(template, &progress).await?;
        Ok(progress)
    }
}
