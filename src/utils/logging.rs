//! 日志工具模块
//!
//! 控制台与运行日志文件同时输出，日志文件以追加方式写入

use crate::config::Config;
use crate::orchestrator::RunReport;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 初始化日志
///
/// # 参数
/// - `config`: 配置（日志文件路径、是否详细日志）
///
/// # 返回
/// 返回文件写入线程的 guard，需在整个运行期间持有
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let file = open_log_file(&config.log_file)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_timer(ChronoLocal::new(TIME_FORMAT.to_string())))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()
        .context("日志系统初始化失败")?;

    Ok(guard)
}

/// 以追加方式打开运行日志，历次运行的记录都保留
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("无法创建日志目录: {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("无法打开日志文件: {}", path.display()))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("===== 开始处理 =====");
    info!("📁 输入目录: {}", config.input_dir.display());
    info!("📄 文档输出: {}", config.output_doc_dir.display());
    info!("🖼️ 图片输出: {}", config.output_img_dir.display());
    info!("⚠️ 错误目录: {}", config.error_dir.display());
}

/// 打印最终统计信息
///
/// # 参数
/// - `report`: 本次运行统计
/// - `config`: 配置（汇总表与日志路径）
pub fn print_final_stats(report: &RunReport, config: &Config) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("完成时间: {}", chrono::Local::now().format(TIME_FORMAT));
    info!("{}", "=".repeat(60));
    info!("✅ 成功归档: {}/{}", report.classified, report.total);
    info!("📝 其中有备注: {}", report.with_remarks);
    info!("❌ 移入错误目录: {}", report.routed);
    info!("{}", "=".repeat(60));
    info!(
        "汇总完成，共计：{} 人，已保存至 {}",
        report.classified,
        config.summary_file.display()
    );
    info!("日志已保存至: {}", config.log_file.display());
    info!("===== 处理结束 =====");
}
