//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理客户端、存储等资源的生命周期
//! - 运行结束后发布统计
//!
//! ### `statistics_run` - 单次统计运行
//! - 解析目标、制定续跑计划
//! - 顺序处理每篇论文并持久化进度
//! - 生成全局统计
//!
//! ### `observer` - 进度观察者
//!
//! ## 层次关系
//!
//! ```text
//! app (资源与发布)
//!     ↓
//! statistics_run (处理 Vec<PaperId>)
//!     ↓
//! workflow::PaperFlow (处理单篇论文)
//!     ↓
//! services (能力层：analyze / aggregate / resume)
//!     ↓
//! clients + infrastructure (HTTP、重试、存储)
//! ```

pub mod app;
pub mod observer;
pub mod statistics_run;

pub use app::App;
pub use observer::{ChannelObserver, LoggingObserver, ProgressObserver};
pub use statistics_run::{RunOptions, RunReport, StatisticsRun};
