//! 压缩包处理流程 - 流程层
//!
//! 核心职责：定义"一个压缩包"的完整处理流程
//!
//! 流程顺序：
//! 1. 重置临时目录 → 解压
//! 2. 查找表格 → 读取七个字段
//! 3. 复制文档（缺失记备注）
//! 4. 复制图片（缺失记备注）
//! 5. 产出汇总行
//!
//! 第 1、2 步任一失败，原压缩包移入错误目录，不产出汇总行；
//! 第 3、4 步互不影响，缺失只记备注。

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{ExtractError, ItemFailure, MetadataError};
use crate::infrastructure::{read_fields, ArchiveExtractor, Extractor, Workspace};
use crate::models::{Remark, RemarkSet, SubmissionRecord, SummaryRow};
use crate::services::file_locator::{
    find_first, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, SPREADSHEET_EXTENSIONS,
};
use crate::services::{output_base_name, OutputStore};
use crate::workflow::item_ctx::ItemCtx;

/// 单个压缩包的处理结果
#[derive(Debug)]
pub enum ItemOutcome {
    /// 成功归档（可能带备注）
    Classified {
        row: SummaryRow,
        base_name: String,
        document: Option<PathBuf>,
        image: Option<PathBuf>,
    },
    /// 移入错误目录
    Routed {
        failure: ItemFailure,
        /// 移入后的路径；移动本身失败时为 None
        error_path: Option<PathBuf>,
    },
}

impl ItemOutcome {
    pub fn into_row(self) -> Option<SummaryRow> {
        match self {
            ItemOutcome::Classified { row, .. } => Some(row),
            ItemOutcome::Routed { .. } => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, ItemOutcome::Classified { .. })
    }
}

/// 压缩包处理流程
///
/// - 一次只处理一个压缩包，临时目录在每次开始时重置
/// - 所有失败在这里分类，不向上抛出
pub struct ItemFlow {
    extractor: Arc<dyn Extractor>,
    workspace: Workspace,
    store: OutputStore,
}

impl ItemFlow {
    /// 创建新的处理流程（默认解压实现）
    pub fn new(config: &Config) -> Self {
        Self::with_extractor(config, Arc::new(ArchiveExtractor))
    }

    /// 使用指定解压实现创建
    pub fn with_extractor(config: &Config, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            workspace: Workspace::new(config.temp_dir.clone()),
            store: OutputStore::from_config(config),
        }
    }

    pub async fn run(&self, ctx: &ItemCtx) -> ItemOutcome {
        match self.classify(ctx).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                self.log_failure(ctx, &failure);
                let error_path = self.route_to_error(ctx).await;
                ItemOutcome::Routed {
                    failure,
                    error_path,
                }
            }
        }
    }

    async fn classify(&self, ctx: &ItemCtx) -> Result<ItemOutcome, ItemFailure> {
        // ========== 解压 ==========
        self.workspace
            .reset()
            .await
            .map_err(|e| ExtractError::io(self.workspace.path(), e))?;

        let extracted = self.extract(ctx).await?;
        info!("{} 解压完成，共 {} 个文件", ctx, extracted);

        // ========== 读取表格 ==========
        let sheet = find_first(self.workspace.path(), SPREADSHEET_EXTENSIONS)
            .ok_or(ItemFailure::SpreadsheetNotFound)?;
        let record = self.read_record(sheet).await?;

        let base_name = output_base_name(&record);
        let mut remarks = RemarkSet::new();

        // ========== 文档与图片（互不影响） ==========
        let document = self.save_document(ctx, &base_name, &mut remarks).await;
        let image = self.save_image(ctx, &base_name, &mut remarks).await;

        info!("{} ✓ 成功处理：{} - {}", ctx, ctx.archive_name(), base_name);

        Ok(ItemOutcome::Classified {
            row: SummaryRow::new(record, remarks),
            base_name,
            document,
            image,
        })
    }

    async fn extract(&self, ctx: &ItemCtx) -> Result<usize, ItemFailure> {
        let extractor = Arc::clone(&self.extractor);
        let archive = ctx.archive.clone();
        let dest = self.workspace.path().to_path_buf();

        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&archive, &dest))
            .await
            .map_err(|e| ExtractError::Interrupted {
                path: ctx.archive.clone(),
                message: e.to_string(),
            })??;
        Ok(extracted)
    }

    async fn read_record(&self, sheet: PathBuf) -> Result<SubmissionRecord, ItemFailure> {
        let record = tokio::task::spawn_blocking(move || read_fields(&sheet))
            .await
            .map_err(|e| MetadataError::Interrupted {
                message: e.to_string(),
            })??;
        Ok(record)
    }

    async fn save_document(
        &self,
        ctx: &ItemCtx,
        base_name: &str,
        remarks: &mut RemarkSet,
    ) -> Option<PathBuf> {
        let Some(source) = find_first(self.workspace.path(), DOCUMENT_EXTENSIONS) else {
            warn!("{} ⚠️ 缺少文档", ctx);
            remarks.push(Remark::MissingDocument);
            return None;
        };

        match self.store.place_document(&source, base_name).await {
            Ok(target) => {
                info!("{} 📄 文档已保存: {}", ctx, target.display());
                Some(target)
            }
            Err(e) => {
                error!("{} 文档复制失败 ({}): {}", ctx, source.display(), e);
                remarks.push(Remark::MissingDocument);
                None
            }
        }
    }

    async fn save_image(
        &self,
        ctx: &ItemCtx,
        base_name: &str,
        remarks: &mut RemarkSet,
    ) -> Option<PathBuf> {
        let Some(source) = find_first(self.workspace.path(), IMAGE_EXTENSIONS) else {
            warn!("{} ⚠️ 缺少图片", ctx);
            remarks.push(Remark::MissingImage);
            return None;
        };

        match self.store.place_image(&source, base_name).await {
            Ok(target) => {
                info!("{} 🖼️ 图片已保存: {}", ctx, target.display());
                Some(target)
            }
            Err(e) => {
                error!("{} 图片复制失败 ({}): {}", ctx, source.display(), e);
                remarks.push(Remark::MissingImage);
                None
            }
        }
    }

    /// 原压缩包移入错误目录；移动失败只记录，不中断批处理
    async fn route_to_error(&self, ctx: &ItemCtx) -> Option<PathBuf> {
        match self.store.route_to_error(ctx.archive()).await {
            Ok(target) => {
                info!("{} 已移入错误目录: {}", ctx, target.display());
                Some(target)
            }
            Err(e) => {
                error!("{} ❌ 无法移入错误目录: {}", ctx, e);
                None
            }
        }
    }

    fn log_failure(&self, ctx: &ItemCtx, failure: &ItemFailure) {
        match failure {
            ItemFailure::ExtractFailed(e) => {
                error!("{} ❌ 解压失败：{} - {}", ctx, ctx.archive_name(), e)
            }
            ItemFailure::SpreadsheetNotFound => {
                warn!("{} ⚠️ 未找到Excel文件：{}", ctx, ctx.archive_name())
            }
            ItemFailure::SpreadsheetInvalid(e) => {
                warn!("{} ⚠️ Excel数据格式错误：{} - {}", ctx, ctx.archive_name(), e)
            }
        }
    }
}
