//! 运行进度模型
//!
//! `StatisticsProgress` 是持久化的进度文档；`ProgressUpdate` 是对它的部分更新；
//! `ProgressEvent` 是推送给观察者的进度事件。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::analysis::GlobalStatistics;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 持久化的进度文档，键为 `{statisticId}-progress`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsProgress {
    pub template_key: String,
    pub status: RunStatus,
    pub total_papers: u64,
    pub processed_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_paper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_stats: Option<GlobalStatistics>,
    pub updated_at: DateTime<Utc>,
}

impl StatisticsProgress {
    /// 尚未运行过的模板
    pub fn idle(template_key: impl Into<String>) -> Self {
        Self {
            template_key: template_key.into(),
            status: RunStatus::Idle,
            total_papers: 0,
            processed_count: 0,
            current_paper: None,
            started_at: None,
            completed_at: None,
            error: None,
            global_stats: None,
            updated_at: Utc::now(),
        }
    }

    /// 合并部分更新，未给出的字段保持不变
    pub fn apply(&mut self, update: ProgressUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(total) = update.total_papers {
            self.total_papers = total;
        }
        if let Some(processed) = update.processed_count {
            self.processed_count = processed;
        }
        if let Some(current) = update.current_paper {
            self.current_paper = current;
        }
        if let Some(started) = update.started_at {
            self.started_at = started;
        }
        if let Some(completed) = update.completed_at {
            self.completed_at = completed;
        }
        if let Some(error) = update.error {
            self.error = error;
        }
        if let Some(stats) = update.global_stats {
            self.global_stats = stats;
        }
        self.updated_at = Utc::now();
    }

    /// 转换为进度事件
    pub fn to_event(&self) -> ProgressEvent {
        ProgressEvent {
            template_key: self.template_key.clone(),
            status: self.status,
            total_papers: self.total_papers,
            processed_count: self.processed_count,
            current_paper: self.current_paper.clone(),
            updated_at: self.updated_at,
            completed_at: self.completed_at,
            global_stats: self.global_stats,
        }
    }
}

/// 进度文档的部分更新
///
/// 外层 `None` 表示不修改该字段；可清空的字段使用 `Some(None)` 清空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    pub status: Option<RunStatus>,
    pub total_papers: Option<u64>,
    pub processed_count: Option<u64>,
    pub current_paper: Option<Option<String>>,
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub error: Option<Option<String>>,
    pub global_stats: Option<Option<GlobalStatistics>>,
}

impl ProgressUpdate {
    /// 运行开始：重置上一次运行留下的完成信息
    pub fn started(total_papers: u64, processed_count: u64) -> Self {
        Self {
            status: Some(RunStatus::Running),
            total_papers: Some(total_papers),
            processed_count: Some(processed_count),
            current_paper: Some(None),
            started_at: Some(Some(Utc::now())),
            completed_at: Some(None),
            error: Some(None),
            global_stats: Some(None),
        }
    }

    /// 一篇论文处理完成
    pub fn paper_done(processed_count: u64, paper_id: impl Into<String>) -> Self {
        Self {
            processed_count: Some(processed_count),
            current_paper: Some(Some(paper_id.into())),
            ..Self::default()
        }
    }

    /// 运行完成
    pub fn completed(processed_count: u64, stats: GlobalStatistics) -> Self {
        Self {
            status: Some(RunStatus::Completed),
            processed_count: Some(processed_count),
            current_paper: Some(None),
            completed_at: Some(Some(Utc::now())),
            global_stats: Some(Some(stats)),
            ..Self::default()
        }
    }
}

/// 推送给观察者的进度事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub template_key: String,
    pub status: RunStatus,
    pub total_papers: u64,
    pub processed_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_paper: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_stats: Option<GlobalStatistics>,
}

/// 面向看板的最终统计记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedStatistics {
    pub template_key: String,
    pub statistic_id: String,
    pub global_stats: GlobalStatistics,
    pub published_at: DateTime<Utc>,
}
