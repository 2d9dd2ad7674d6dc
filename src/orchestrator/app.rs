//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：构建 HTTP 客户端、查询与语句客户端、进度存储，加载模板
//! 2. **运行**：委托 [`StatisticsRun`] 执行一次统计运行
//! 3. **发布**：把完成的统计写入面向看板的记录，单独报告成功与否
//! 4. **运维操作**：查询进度、清空模板状态
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有客户端和存储的模块
//! - **向下委托**：不处理单篇论文的细节

use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{self, PaperIdSource, SparqlClient, StatementClient, StatementSource};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{JsonFileStore, ProgressStore, Shutdown};
use crate::models::{
    self, GlobalStatistics, PublishedStatistics, QueryTemplate, StatisticsProgress, TemplateRegistry,
};
use crate::orchestrator::statistics_run::{RunOptions, RunReport, StatisticsRun};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    templates: TemplateRegistry,
    store: Arc<dyn ProgressStore>,
    run: StatisticsRun,
}

impl App {
    /// 按配置初始化应用
    pub async fn initialize(config: Config, shutdown: Shutdown) -> Result<Self> {
        let templates = models::load_registry(config.templates_file.as_deref())
            .await
            .context("无法加载查询模板")?;

        let http = clients::build_http_client(config.http_timeout()).context("无法创建 HTTP 客户端")?;
        let resolver = Arc::new(SparqlClient::new(config.sparql_endpoint.clone(), http.clone()));
        let source = Arc::new(StatementClient::new(
            config.api_base_url.clone(),
            http,
            config.retry_policy(),
            shutdown.clone(),
        ));
        let store = Arc::new(JsonFileStore::new(config.store_dir.clone()));

        info!("📁 进度存储目录: {}", store.root().display());

        Ok(Self::with_components(
            config, templates, resolver, source, store, shutdown,
        ))
    }

    /// 使用给定的协作者构建应用
    pub fn with_components(
        config: Config,
        templates: TemplateRegistry,
        resolver: Arc<dyn PaperIdSource>,
        source: Arc<dyn StatementSource>,
        store: Arc<dyn ProgressStore>,
        shutdown: Shutdown,
    ) -> Self {
        let run = StatisticsRun::new(
            resolver,
            source,
            store.clone(),
            shutdown,
            config.verbose_logging,
        );
        Self {
            config,
            templates,
            store,
            run,
        }
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    fn template(&self, key: &str) -> AppResult<&QueryTemplate> {
        self.templates
            .get(key)
            .map_err(|_| AppError::unknown_template(key))
    }

    /// 运行一个模板的统计
    ///
    /// # 参数
    /// - `template_key`: 模板键
    /// - `options`: 运行参数
    /// - `publish`: 运行完成后是否发布统计
    ///
    /// # 返回
    /// 返回运行结果；只有未知模板会返回错误
    pub async fn run_template(
        &self,
        template_key: &str,
        options: RunOptions,
        publish: bool,
    ) -> Result<RunReport> {
        let template = self.template(template_key)?;
        logging::log_startup(&self.config, template_key);

        let report = self.run.run(template, options).await;

        if !report.is_success() {
            if let Some(error) = &report.error {
                warn!("❌ 模板 {} 运行失败: {}", template_key, error);
            }
            return Ok(report);
        }

        let published = if publish {
            Some(self.publish(template, report.global_stats).await)
        } else {
            None
        };
        logging::print_final_stats(template_key, &report.global_stats, published);

        Ok(report)
    }

    /// 发布最终统计，返回是否成功（与运行本身的成败无关）
    pub async fn publish(&self, template: &QueryTemplate, stats: GlobalStatistics) -> bool {
        let published = PublishedStatistics {
            template_key: template.key.clone(),
            statistic_id: template.statistic_id.clone(),
            global_stats: stats,
            published_at: Utc::now(),
        };

        match self.store.publish_statistics(&published).await {
            Ok(()) => {
                info!("📤 模板 {} 的统计已发布", template.key);
                true
            }
            Err(e) => {
                warn!("⚠️ 模板 {} 的统计发布失败: {}", template.key, e);
                false
            }
        }
    }

    /// 读取模板的进度文档
    pub async fn status(&self, template_key: &str) -> Result<Option<StatisticsProgress>> {
        let template = self.template(template_key)?;
        let progress = self
            .store
            .load_progress_summary(template)
            .await
            .with_context(|| format!("无法读取模板 {} 的进度", template_key))?;
        Ok(progress)
    }

    /// 读取模板已发布的统计
    pub async fn published(&self, template_key: &str) -> Result<Option<PublishedStatistics>> {
        let template = self.template(template_key)?;
        let published = self
            .store
            .load_published(template)
            .await
            .with_context(|| format!("无法读取模板 {} 的发布记录", template_key))?;
        Ok(published)
    }

    /// 清空模板的全部单篇结果和进度文档
    pub async fn purge(&self, template_key: &str) -> Result<()> {
        let template = self.template(template_key)?;
        self.store
            .purge(template)
            .await
            .with_context(|| format!("无法清空模板 {} 的状态", template_key))?;
        info!("🗑️ 模板 {} 的状态已清空", template_key);
        Ok(())
    }
}
