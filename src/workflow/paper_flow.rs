//! 论文处理流程 - 流程层
//!
//! 核心职责：定义"一篇论文"的处理流程
//!
//! 流程顺序：
//! 1. 获取语句（带重试）
//! 2. 分类计数
//! 3. 获取彻底失败时记为全零结果（兜底）

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::StatementSource;
use crate::error::FetchError;
use crate::models::PaperAnalysisResult;
use crate::services::analyze;
use crate::workflow::paper_ctx::PaperCtx;

/// 单篇论文的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum PaperOutcome {
    /// 成功获取并分析
    Analyzed(PaperAnalysisResult),
    /// 重试耗尽，记为全零结果
    FetchFailed(PaperAnalysisResult),
    /// 等待重试时收到停止信号，不记录结果
    Interrupted,
}

/// 论文处理流程
///
/// - 不持有存储，不关心进度
/// - 只依赖语句来源和分析能力
pub struct PaperFlow {
    source: Arc<dyn StatementSource>,
    verbose_logging: bool,
}

impl PaperFlow {
    /// 创建新的论文处理流程
    pub fn new(source: Arc<dyn StatementSource>, verbose_logging: bool) -> Self {
        Self {
            source,
            verbose_logging,
        }
    }

    pub async fn run(&self, ctx: &PaperCtx) -> PaperOutcome {
        info!("{} 📥 获取语句...", ctx);

        let statements = match self.source.fetch_statements(&ctx.paper_id).await {
            Ok(statements) => statements,
            Err(e) if e.is_cancelled() => {
                warn!("{} ⏹️ 收到停止信号，中断处理", ctx);
                return PaperOutcome::Interrupted;
            }
            Err(e) => return self.fetch_failed(ctx, e),
        };

        let analysis = analyze(&statements);

        if self.verbose_logging {
            debug!(
                "{} 语句 {}, 资源 {}, 字面量 {}, 谓词 {}",
                ctx,
                analysis.total,
                analysis.resource_count,
                analysis.literal_count,
                analysis.predicate_count
            );
        }
        info!("{} ✓ 分析完成: {} 条语句", ctx, analysis.total);

        PaperOutcome::Analyzed(PaperAnalysisResult::from_analysis(
            ctx.paper_id.clone(),
            analysis,
        ))
    }

    fn fetch_failed(&self, ctx: &PaperCtx, error: FetchError) -> PaperOutcome {
        warn!("{} ❌ 获取失败，记为零计数: {}", ctx, error);
        PaperOutcome::FetchFailed(PaperAnalysisResult::failed(
            ctx.paper_id.clone(),
            error.to_string(),
        ))
    }
}
