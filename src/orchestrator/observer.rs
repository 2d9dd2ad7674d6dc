//! 进度观察者
//!
//! 编排层在运行开始、每篇论文完成和运行结束时推送 [`ProgressEvent`]。

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{ProgressEvent, RunStatus};

/// 进度观察者接口
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// 把进度写入日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        match event.status {
            RunStatus::Completed => info!(
                "📊 [{}] 完成: {}/{} 篇",
                event.template_key, event.processed_count, event.total_papers
            ),
            RunStatus::Failed => info!("❌ [{}] 运行失败", event.template_key),
            _ => info!(
                "⏳ [{}] 进度 {}/{}{}",
                event.template_key,
                event.processed_count,
                event.total_papers,
                event
                    .current_paper
                    .as_deref()
                    .map(|id| format!(" (当前: {})", id))
                    .unwrap_or_default()
            ),
        }
    }
}

/// 把进度事件发送到通道，由调用方自行消费
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// 创建观察者及对应的接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        if self.tx.send(event.clone()).is_err() {
            debug!("进度接收端已关闭，丢弃事件");
        }
    }
}
