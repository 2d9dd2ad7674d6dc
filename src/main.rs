use anyhow::Result;
use clap::{Parser, Subcommand};
use paper_statistics::infrastructure::shutdown;
use paper_statistics::orchestrator::LoggingObserver;
use paper_statistics::utils::logging;
use paper_statistics::{App, Config, RunOptions};
use std::sync::Arc;
use tracing::warn;

/// 论文结构统计
#[derive(Debug, Parser)]
#[command(name = "paper-stats", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 运行一个模板的统计
    Run {
        /// 模板键，例如 empire
        template: String,
        /// 只处理前 N 篇论文
        #[arg(long)]
        limit: Option<usize>,
        /// 不复用缓存，清空后全量刷新
        #[arg(long)]
        fresh: bool,
        /// 完成后不发布统计
        #[arg(long)]
        no_publish: bool,
    },
    /// 显示模板的运行进度
    Status { template: String },
    /// 清空模板的全部缓存和进度
    Purge { template: String },
    /// 列出可用模板
    Templates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // Ctrl-C 中断退避等待，当前论文之后停止
    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⏹️ 收到中断信号，正在停止...");
            trigger.trigger();
        }
    });

    let app = App::initialize(config, shutdown).await?;

    match cli.command {
        Command::Run {
            template,
            limit,
            fresh,
            no_publish,
        } => {
            let mut options = RunOptions::default()
                .with_resume(!fresh)
                .with_observer(Arc::new(LoggingObserver));
            options.limit = limit;

            let report = app.run_template(&template, options, !no_publish).await?;
            if let Some(error) = report.error {
                anyhow::bail!("模板 {} 运行失败: {}", template, error);
            }
            if report.interrupted {
                warn!("运行已中断，使用相同命令即可续跑");
            }
        }
        Command::Status { template } => {
            match app.status(&template).await? {
                Some(progress) => println!("{}", serde_json::to_string_pretty(&progress)?),
                None => println!("模板 {} 尚未运行", template),
            }
            if let Some(published) = app.published(&template).await? {
                println!("{}", serde_json::to_string_pretty(&published)?);
            }
        }
        Command::Purge { template } => app.purge(&template).await?,
        Command::Templates => {
            for template in app.templates().iter() {
                println!("{:<12} {:<24} {}", template.key, template.statistic_id, template.description);
            }
        }
    }

    Ok(())
}
