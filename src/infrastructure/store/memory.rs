use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{CachedProgress, ProgressStore};
use crate::error::StoreError;
use crate::models::{PaperAnalysisResult, PublishedStatistics, QueryTemplate, StatisticsProgress};

#[derive(Debug, Default, Clone)]
struct Namespace {
    results: BTreeMap<String, PaperAnalysisResult>,
    progress: HashMap<String, StatisticsProgress>,
    published: Option<PublishedStatistics>,
}

/// 内存中的进度存储，用于测试和一次性运行
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, Namespace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已保存的论文 ID（排序）
    pub async fn stored_paper_ids(&self, template: &QueryTemplate) -> Vec<String> {
        self.namespaces
            .read()
            .await
            .get(&template.key)
            .map(|ns| ns.results.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load_progress(&self, template: &QueryTemplate) -> Result<CachedProgress, StoreError> {
        let namespaces = self.namespaces.read().await;
        let results = namespaces
            .get(&template.key)
            .map(|ns| ns.results.values().cloned().collect())
            .unwrap_or_default();
        Ok(CachedProgress::from_results(results))
    }

    async fn save_result(
        &self,
        template: &QueryTemplate,
        result: &PaperAnalysisResult,
    ) -> Result<(), StoreError> {
        self.namespaces
            .write()
            .await
            .entry(template.key.clone())
            .or_default()
            .results
            .insert(result.paper_id.clone(), result.clone());
        Ok(())
    }

    async fn delete_result(&self, template: &QueryTemplate, paper_id: &str) -> Result<(), StoreError> {
        if let Some(ns) = self.namespaces.write().await.get_mut(&template.key) {
            ns.results.remove(paper_id);
        }
        Ok(())
    }

    async fn load_progress_summary(
        &self,
        template: &QueryTemplate,
    ) -> Result<Option<StatisticsProgress>, StoreError> {
        Ok(self
            .namespaces
            .read()
            .await
            .get(&template.key)
            .and_then(|ns| ns.progress.get(&template.progress_key()).cloned()))
    }

    async fn write_progress_summary(
        &self,
        template: &QueryTemplate,
        progress: &StatisticsProgress,
    ) -> Result<(), StoreError> {
        self.namespaces
            .write()
            .await
            .entry(template.key.clone())
            .or_default()
            .progress
            .insert(template.progress_key(), progress.clone());
        Ok(())
    }

    async fn purge(&self, template: &QueryTemplate) -> Result<(), StoreError> {
        if let Some(ns) = self.namespaces.write().await.get_mut(&template.key) {
            ns.results.clear();
            ns.progress.remove(&template.progress_key());
        }
        Ok(())
    }

    async fn publish_statistics(&self, published: &PublishedStatistics) -> Result<(), StoreError> {
        self.namespaces
            .write()
            .await
            .entry(published.template_key.clone())
            .or_default()
            .published = Some(published.clone());
        Ok(())
    }

    async fn load_published(
        &self,
        template: &QueryTemplate,
    ) -> Result<Option<PublishedStatistics>, StoreError> {
        Ok(self
            .namespaces
            .read()
            .await
            .get(&template.key)
            .and_then(|ns| ns.published.clone()))
    }
}
