//! 指数退避重试

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::shutdown::Shutdown;

/// 重试策略：固定最大尝试次数，等待时间从 `base_delay` 开始每次翻倍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` 至少为 1
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 第 `attempt` 次（从 1 开始）失败后的等待时间
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// 重试失败的原因
#[derive(Debug)]
pub enum RetryError<E> {
    /// 所有尝试均失败
    Exhausted { attempts: u32, last_error: E },
    /// 等待期间收到停止信号
    Cancelled { attempts: u32 },
}

/// 按策略执行 `operation`，失败时退避重试
///
/// # 参数
/// - `policy`: 重试策略
/// - `shutdown`: 停止信号，可中断退避等待
/// - `label`: 日志中显示的操作名称
/// - `operation`: 接收当前尝试序号（从 1 开始）的异步操作
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    shutdown: &Shutdown,
    label: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts() => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    "{} 失败 (尝试 {}/{}): {}，{} 毫秒后重试...",
                    label,
                    attempt,
                    policy.max_attempts(),
                    e,
                    delay.as_millis()
                );
                if !shutdown.sleep(delay).await {
                    return Err(RetryError::Cancelled { attempts: attempt });
                }
                attempt += 1;
            }
        }
    }
}
