//! 批量压缩包处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责输入队列的遍历和汇总表的输出。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建所需目录、记录启动信息
//! 2. **加载队列**：扫描输入目录下的 .zip / .rar / .7z（不递归）
//! 3. **顺序处理**：逐个交给 `ItemFlow`，上一个完全结束才开始下一个
//! 4. **汇总输出**：收集汇总行，结束时一次性写出汇总表
//! 5. **全局统计**：成功、带备注、移入错误目录的数量
//!
//! ## 设计特点
//!
//! - 临时目录全程共用，因此不做并发
//! - 单个压缩包的失败不会中断批处理；汇总表无论如何都会写出

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{ensure_directories, write_summary, ArchiveFormat};
use crate::models::SummaryRow;
use crate::utils::logging;
use crate::workflow::{ItemCtx, ItemFlow, ItemOutcome};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: ItemFlow,
}

/// 一次运行的统计
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// 队列中的压缩包数量
    pub total: usize,
    /// 成功归档数量（= 汇总行数）
    pub classified: usize,
    /// 其中带备注的数量
    pub with_remarks: usize,
    /// 移入错误目录的数量
    pub routed: usize,
    /// 汇总行（与汇总表内容一致）
    pub rows: Vec<SummaryRow>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        ensure_directories(&config).await?;
        logging::log_startup(&config);

        let flow = ItemFlow::new(&config);
        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunReport> {
        let archives = self.load_archives().await?;

        if archives.is_empty() {
            warn!("⚠️ 输入目录中没有待处理的压缩包");
        } else {
            info!("✓ 找到 {} 个待处理的压缩包", archives.len());
        }

        let report = self.process_all(archives).await;

        self.save_summary(&report.rows).await?;
        logging::print_final_stats(&report, &self.config);

        Ok(report)
    }

    /// 扫描输入目录（只看直接子项，按文件名排序）
    async fn load_archives(&self) -> AppResult<Vec<PathBuf>> {
        let input_dir = &self.config.input_dir;
        let io_err = |source: std::io::Error| AppError::InputDir {
            path: input_dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(input_dir).await.map_err(io_err)?;
        let mut archives = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && ArchiveFormat::from_path(&path).is_some() {
                archives.push(path);
            }
        }

        archives.sort();
        Ok(archives)
    }

    /// 逐个处理压缩包
    async fn process_all(&self, archives: Vec<PathBuf>) -> RunReport {
        let total = archives.len();
        let mut report = RunReport {
            total,
            ..Default::default()
        };

        for (idx, archive) in archives.into_iter().enumerate() {
            let ctx = ItemCtx::new(archive, idx + 1, total);
            info!("{}", "─".repeat(60));
            info!("{} 处理压缩包：{}", ctx, ctx.archive_name());

            match self.flow.run(&ctx).await {
                ItemOutcome::Classified { row, .. } => {
                    report.classified += 1;
                    if !row.remarks.is_empty() {
                        report.with_remarks += 1;
                    }
                    report.rows.push(row);
                }
                ItemOutcome::Routed { .. } => {
                    report.routed += 1;
                }
            }
        }

        report
    }

    /// 写出汇总表（整次运行只写一次）
    async fn save_summary(&self, rows: &[SummaryRow]) -> AppResult<()> {
        let path = self.config.summary_file.clone();
        let rows = rows.to_vec();
        tokio::task::spawn_blocking(move || write_summary(&path, &rows))
            .await
            .map_err(|e| AppError::summary(&self.config.summary_file, e))?
    }
}
