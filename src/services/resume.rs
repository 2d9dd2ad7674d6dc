//! 续跑控制 - 业务能力层
//!
//! 在进度存储之上决定哪些论文可以复用缓存、哪些需要处理、哪些已经过期。
//! 存储写入是尽力而为的：失败只记录日志，不会中断运行。

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::infrastructure::ProgressStore;
use crate::models::{PaperAnalysisResult, ProgressUpdate, QueryTemplate, StatisticsProgress};

/// 续跑计划
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumePlan {
    /// 仍在目标集合内的缓存结果（按目标顺序）
    pub cached: Vec<PaperAnalysisResult>,
    /// 需要处理的论文 ID（按目标顺序）
    pub remaining: Vec<String>,
    /// 已不在目标集合内、被删除的缓存论文 ID
    pub stale: Vec<String>,
}

/// 续跑控制器
#[derive(Clone)]
pub struct ResumeController {
    store: Arc<dyn ProgressStore>,
}

impl ResumeController {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// 生成续跑计划
    ///
    /// # 参数
    /// - `template`: 查询模板
    /// - `target_ids`: 本次运行的目标论文 ID
    /// - `resume`: 是否复用缓存；为 `false` 时先清空该模板的全部状态
    pub async fn prepare(
        &self,
        template: &QueryTemplate,
        target_ids: &[String],
        resume: bool,
    ) -> ResumePlan {
        if !resume {
            info!("🗑️ 未启用续跑，清空模板 {} 的历史状态", template.key);
            if let Err(e) = self.store.purge(template).await {
                warn!("⚠️ 清空模板 {} 的历史状态失败: {}", template.key, e);
            }
            return ResumePlan {
                remaining: target_ids.to_vec(),
                ..ResumePlan::default()
            };
        }

        let cache = match self.store.load_progress(template).await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("⚠️ 读取缓存失败，将重新处理全部论文: {}", e);
                return ResumePlan {
                    remaining: target_ids.to_vec(),
                    ..ResumePlan::default()
                };
            }
        };

        let targets: HashSet<&str> = target_ids.iter().map(String::as_str).collect();
        let mut by_id = std::collections::HashMap::new();
        let mut stale = Vec::new();
        for result in cache.cached_results {
            if targets.contains(result.paper_id.as_str()) {
                by_id.insert(result.paper_id.clone(), result);
            } else {
                stale.push(result.paper_id);
            }
        }

        for paper_id in &stale {
            if let Err(e) = self.store.delete_result(template, paper_id).await {
                warn!("⚠️ 删除过期结果 {} 失败: {}", paper_id, e);
            }
        }

        let mut cached = Vec::with_capacity(by_id.len());
        let mut remaining = Vec::new();
        for paper_id in target_ids {
            match by_id.remove(paper_id) {
                Some(result) => cached.push(result),
                None => remaining.push(paper_id.clone()),
            }
        }

        info!(
            "♻️ 续跑: 复用 {} 篇缓存，待处理 {} 篇，清理过期 {} 篇",
            cached.len(),
            remaining.len(),
            stale.len()
        );

        ResumePlan {
            cached,
            remaining,
            stale,
        }
    }

    /// 保存单篇结果，返回是否成功
    pub async fn save_result(&self, template: &QueryTemplate, result: &PaperAnalysisResult) -> bool {
        match self.store.save_result(template, result).await {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️ 保存论文 {} 的结果失败: {}", result.paper_id, e);
                false
            }
        }
    }

    /// 合并更新进度文档，失败时返回 `None`
    pub async fn save_progress(
        &self,
        template: &QueryTemplate,
        update: ProgressUpdate,
    ) -> Option<StatisticsProgress> {
        match self.store.save_progress_summary(template, update).await {
            Ok(progress) => Some(progress),
            Err(e) => {
                warn!("⚠️ 保存模板 {} 的进度失败: {}", template.key, e);
                None
            }
        }
    }
}
