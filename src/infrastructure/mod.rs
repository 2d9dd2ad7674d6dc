//! 基础设施层（Infrastructure）
//!
//! 只暴露能力，不认识论文或统计：
//! - `retry` - 指数退避重试
//! - `shutdown` - 可中断等待的停止信号
//! - `store` - 进度文档的持久化边界

pub mod retry;
pub mod shutdown;
pub mod store;

pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use shutdown::{Shutdown, ShutdownTrigger};
pub use store::{CachedProgress, JsonFileStore, MemoryStore, ProgressStore};
