/// 日志工具模块
///
/// 初始化 tracing 订阅器，并提供启动和结束时的日志格式化
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::GlobalStatistics;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时按 `verbose` 选择 `debug` 或 `info`。
/// 重复调用不会报错（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, template_key: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 统计运行启动 - 模板 {}", template_key);
    info!("🔗 查询端点: {}", config.sparql_endpoint);
    info!("🔗 语句接口: {}", config.api_base_url);
    info!(
        "🔁 重试: 最多 {} 次，初始等待 {} 毫秒",
        config.fetch_max_attempts, config.fetch_base_delay_ms
    );
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(template_key: &str, stats: &GlobalStatistics, published: Option<bool>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 模板 {} 统计完成", template_key);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 论文: {}", stats.paper_count);
    info!("🧾 语句: {}", stats.total_statements);
    info!(
        "🔗 资源: {} / 去重 {}",
        stats.total_resources, stats.global_distinct_resources
    );
    info!(
        "🔤 字面量: {} / 去重 {}",
        stats.total_literals, stats.global_distinct_literals
    );
    info!(
        "➡️ 谓词: {} / 去重 {}",
        stats.total_predicates, stats.global_distinct_predicates
    );
    match published {
        Some(true) => info!("✅ 统计已发布"),
        Some(false) => info!("❌ 统计发布失败"),
        None => {}
    }
    info!("{}", "=".repeat(60));
}
