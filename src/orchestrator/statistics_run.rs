//! 统计运行 - 编排层
//!
//! ## 职责
//!
//! 把一次统计运行编排成状态机：`idle → running → {completed | failed}`。
//!
//! ## 核心流程
//!
//! 1. **解析目标**：按模板查询目标论文，可按 `limit` 截断；查询失败即整次失败，不写任何状态
//! 2. **续跑计划**：复用缓存、删除过期结果，或在未启用续跑时清空全部状态
//! 3. **开始运行**：写入 `running` 进度
//! 4. **逐篇处理**：获取 → 分析 → 聚合 → 保存结果 → 保存进度 → 推送事件；
//!    单篇获取失败记为全零结果，不中断运行
//! 5. **完成**：生成全局统计，写入 `completed` 进度
//!
//! ## 设计特点
//!
//! - **严格顺序**：一次只处理一篇论文，进度计数与已写入的结果数始终一致
//! - **无全局状态**：所有协作者在构造时注入
//! - **可中断**：收到停止信号后在当前论文处停下，持久化状态保持 `running`，之后可以续跑

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clients::{PaperIdSource, StatementSource};
use crate::infrastructure::{ProgressStore, Shutdown};
use crate::models::{
    GlobalStatistics, PaperAnalysisResult, ProgressUpdate, QueryTemplate, RunStatus,
    StatisticsProgress,
};
use crate::orchestrator::observer::ProgressObserver;
use crate::services::{GlobalAggregator, ResumeController};
use crate::workflow::{PaperCtx, PaperFlow, PaperOutcome};

/// 单次运行的参数
#[derive(Clone)]
pub struct RunOptions {
    /// 只处理前 `limit` 篇目标论文
    pub limit: Option<usize>,
    /// 是否复用已保存的结果
    pub resume: bool,
    pub observer: Option<Arc<dyn ProgressObserver>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            limit: None,
            resume: true,
            observer: None,
        }
    }
}

impl RunOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// 运行结果
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub template_key: String,
    /// `Completed`、`Failed`，或被中断时的 `Running`
    pub status: RunStatus,
    /// 缓存结果在前，本次处理的结果在后
    pub results: Vec<PaperAnalysisResult>,
    pub global_stats: GlobalStatistics,
    pub error: Option<String>,
    pub interrupted: bool,
    /// 获取失败、记为零计数的论文数
    pub fetch_failures: usize,
    /// 结果已计入统计、但文档写入失败的论文数（下次续跑会重新处理）
    pub persist_failures: usize,
}

impl RunReport {
    fn failed(template_key: &str, error: String) -> Self {
        Self {
            template_key: template_key.to_string(),
            status: RunStatus::Failed,
            results: Vec::new(),
            global_stats: GlobalStatistics::default(),
            error: Some(error),
            interrupted: false,
            fetch_failures: 0,
            persist_failures: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// 统计运行编排器
pub struct StatisticsRun {
    resolver: Arc<dyn PaperIdSource>,
    flow: PaperFlow,
    resume: ResumeController,
    shutdown: Shutdown,
}

impl StatisticsRun {
    /// 创建编排器
    ///
    /// # 参数
    /// - `resolver`: 目标论文来源
    /// - `source`: 语句来源
    /// - `store`: 进度存储
    /// - `shutdown`: 停止信号
    /// - `verbose_logging`: 是否输出每篇论文的详细计数
    pub fn new(
        resolver: Arc<dyn PaperIdSource>,
        source: Arc<dyn StatementSource>,
        store: Arc<dyn ProgressStore>,
        shutdown: Shutdown,
        verbose_logging: bool,
    ) -> Self {
        Self {
            resolver,
            flow: PaperFlow::new(source, verbose_logging),
            resume: ResumeController::new(store),
            shutdown,
        }
    }

    /// 执行一次统计运行
    ///
    /// 不会返回错误：查询失败体现在 `RunReport::status == Failed`，
    /// 单篇失败体现在对应结果的 `fetch_error`。
    pub async fn run(&self, template: &QueryTemplate, options: RunOptions) -> RunReport {
        let observer = options.observer.as_deref();

        // ========== 1. 解析目标论文 ==========
        let mut target_ids = match self.resolver.resolve_paper_ids(template).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("❌ 模板 {} 查询失败，运行中止: {}", template.key, e);
                let mut failed = StatisticsProgress::idle(template.key.clone());
                failed.status = RunStatus::Failed;
                failed.error = Some(e.to_string());
                notify(observer, &failed);
                return RunReport::failed(&template.key, e.to_string());
            }
        };
        if let Some(limit) = options.limit {
            target_ids.truncate(limit);
        }
        info!("✓ 模板 {} 共 {} 篇目标论文", template.key, target_ids.len());

        // ========== 2. 续跑计划 ==========
        let plan = self
            .resume
            .prepare(template, &target_ids, options.resume)
            .await;

        let mut aggregator = GlobalAggregator::seeded(plan.cached.iter());
        let mut processed = plan.cached.len();
        // 进度文档中的 processedCount 只统计已写入的结果文档
        let mut persisted = processed;
        let total = processed + plan.remaining.len();
        let mut results = plan.cached;

        // ========== 3. 开始运行 ==========
        let mut progress = StatisticsProgress::idle(template.key.clone());
        self.persist_progress(
            template,
            &mut progress,
            ProgressUpdate::started(total as u64, persisted as u64),
        )
        .await;
        notify(observer, &progress);

        // ========== 4. 逐篇处理 ==========
        let mut interrupted = false;
        let mut fetch_failures = 0;
        let mut persist_failures = 0;

        for paper_id in &plan.remaining {
            if self.shutdown.is_triggered() {
                interrupted = true;
                break;
            }

            let ctx = PaperCtx::new(template.key.clone(), paper_id.clone(), processed + 1, total);
            let result = match self.flow.run(&ctx).await {
                PaperOutcome::Analyzed(result) => result,
                PaperOutcome::FetchFailed(result) => {
                    fetch_failures += 1;
                    result
                }
                PaperOutcome::Interrupted => {
                    interrupted = true;
                    break;
                }
            };

            aggregator.fold(&result);
            processed += 1;
            if self.resume.save_result(template, &result).await {
                persisted += 1;
            } else {
                persist_failures += 1;
            }
            self.persist_progress(
                template,
                &mut progress,
                ProgressUpdate::paper_done(persisted as u64, paper_id.clone()),
            )
            .await;
            notify(observer, &progress);
            results.push(result);
        }

        let global_stats = aggregator.finalize();

        if interrupted {
            warn!(
                "⏹️ 模板 {} 在 {}/{} 篇处被中断，可稍后续跑",
                template.key, processed, total
            );
            return RunReport {
                template_key: template.key.clone(),
                status: RunStatus::Running,
                results,
                global_stats,
                error: None,
                interrupted: true,
                fetch_failures,
                persist_failures,
            };
        }

        // ========== 5. 完成 ==========
        self.persist_progress(
            template,
            &mut progress,
            ProgressUpdate::completed(persisted as u64, global_stats),
        )
        .await;
        notify(observer, &progress);

        log_run_complete(&template.key, &global_stats, fetch_failures, persist_failures);

        RunReport {
            template_key: template.key.clone(),
            status: RunStatus::Completed,
            results,
            global_stats,
            error: None,
            interrupted: false,
            fetch_failures,
            persist_failures,
        }
    }

    /// 同时更新本地镜像和持久化的进度文档
    async fn persist_progress(
        &self,
        template: &QueryTemplate,
        progress: &mut StatisticsProgress,
        update: ProgressUpdate,
    ) {
        progress.apply(update.clone());
        self.resume.save_progress(template, update).await;
    }
}

fn notify(observer: Option<&dyn ProgressObserver>, progress: &StatisticsProgress) {
    if let Some(observer) = observer {
        observer.on_progress(&progress.to_event());
    }
}

fn log_run_complete(
    template_key: &str,
    stats: &GlobalStatistics,
    fetch_failures: usize,
    persist_failures: usize,
) {
    info!(
        "✅ 模板 {} 完成: {} 篇论文, {} 条语句",
        template_key, stats.paper_count, stats.total_statements
    );
    info!(
        "   资源 {} (去重 {}), 字面量 {} (去重 {}), 谓词 {} (去重 {})",
        stats.total_resources,
        stats.global_distinct_resources,
        stats.total_literals,
        stats.global_distinct_literals,
        stats.total_predicates,
        stats.global_distinct_predicates
    );
    if fetch_failures > 0 {
        warn!("⚠️ {} 篇论文获取失败，已记为零计数", fetch_failures);
    }
    if persist_failures > 0 {
        warn!("⚠️ {} 篇论文的结果未能保存，下次续跑会重新处理", persist_failures);
    }
}
