//! 停止信号
//!
//! 基于 `tokio::sync::watch`，用于中断退避等待。

use std::time::Duration;
use tokio::sync::watch;

/// 触发端，由进程入口持有（例如监听 Ctrl-C）
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// 接收端，可廉价克隆并传入运行过程
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// 创建一对停止信号
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    /// 发出停止信号
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Shutdown {
    /// 永远不会触发的信号
    pub fn never() -> Self {
        let (_trigger, shutdown) = channel();
        shutdown
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// 等待指定时长
    ///
    /// # 返回
    /// 完整等待结束返回 `true`；期间收到停止信号返回 `false`
    pub async fn sleep(&self, duration: Duration) -> bool {
        if self.is_triggered() {
            return false;
        }

        let mut rx = self.rx.clone();
        let stopped = async move {
            // 触发端被丢弃后信号永远不会到来
            if rx.wait_for(|stop| *stop).await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = stopped => false,
        }
    }
}
