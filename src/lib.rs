//! # Paper Statistics
//!
//! 对知识图谱中的论文集合做可续跑的结构统计（资源 / 字面量 / 谓词计数），供看板使用
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不认识论文
//! - `RetryPolicy` / `retry_with_backoff` - 指数退避重试
//! - `Shutdown` - 可中断退避等待的停止信号
//! - `ProgressStore` - 进度文档的持久化边界（内存 / JSON 文件）
//!
//! ### ② 业务能力层（Clients + Services）
//! - `clients/` - `SparqlClient` 解析目标论文，`StatementClient` 获取语句包
//! - `services/` - `analyze` 分类计数，`GlobalAggregator` 去重聚合，`ResumeController` 续跑计划
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一篇论文"的处理流程（获取 → 分析 → 兜底）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/statistics_run` - 单次统计运行的状态机
//! - `orchestrator/app` - 资源管理与统计发布
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, FetchError, QueryError, StoreError};
pub use infrastructure::{JsonFileStore, MemoryStore, ProgressStore, RetryPolicy, Shutdown};
pub use models::{
    GlobalStatistics, PaperAnalysisResult, ProgressEvent, QueryTemplate, RunStatus, Statement,
    StatisticsProgress, TemplateRegistry,
};
pub use orchestrator::{App, ProgressObserver, RunOptions, RunReport, StatisticsRun};
pub use workflow::{PaperCtx, PaperFlow, PaperOutcome};
