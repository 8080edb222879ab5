//! 输出存储服务 - 业务能力层
//!
//! 只负责"把文件放到哪里"：文档、图片复制到输出目录，失败的压缩包移入错误目录。
//! 所有落盘位置都经过 [`resolve_unique_path`]，已有文件永远不会被覆盖。

use crate::config::Config;
use crate::services::file_locator::lowercase_extension;
use crate::services::naming::resolve_unique_path;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// 文档统一使用的输出扩展名
pub const DOCUMENT_OUTPUT_EXTENSION: &str = ".docx";

/// 输出与错误目录
#[derive(Debug, Clone)]
pub struct OutputStore {
    doc_dir: PathBuf,
    img_dir: PathBuf,
    error_dir: PathBuf,
}

impl OutputStore {
    pub fn new(doc_dir: PathBuf, img_dir: PathBuf, error_dir: PathBuf) -> Self {
        Self {
            doc_dir,
            img_dir,
            error_dir,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output_doc_dir.clone(),
            config.output_img_dir.clone(),
            config.error_dir.clone(),
        )
    }

    /// 复制文档到 `doc_dir/<base_name>.docx`（扩展名固定为 .docx）
    pub async fn place_document(&self, source: &Path, base_name: &str) -> io::Result<PathBuf> {
        let candidate = self
            .doc_dir
            .join(format!("{base_name}{DOCUMENT_OUTPUT_EXTENSION}"));
        copy_unique(source, &candidate).await
    }

    /// 复制图片到 `img_dir/<base_name><原扩展名小写>`
    pub async fn place_image(&self, source: &Path, base_name: &str) -> io::Result<PathBuf> {
        let candidate = self
            .img_dir
            .join(format!("{base_name}{}", lowercase_extension(source)));
        copy_unique(source, &candidate).await
    }

    /// 把原压缩包移入错误目录，保留原文件名（同名已存在时追加数字后缀）
    pub async fn route_to_error(&self, archive: &Path) -> io::Result<PathBuf> {
        let file_name = archive.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("压缩包路径没有文件名: {}", archive.display()),
            )
        })?;
        let target = resolve_unique_path(&self.error_dir.join(file_name));

        if let Err(e) = fs::rename(archive, &target).await {
            // 跨设备时 rename 不可用，退回复制后删除
            debug!("rename 失败 ({}), 改为复制: {}", e, archive.display());
            fs::copy(archive, &target).await?;
            if let Err(e) = fs::remove_file(archive).await {
                // 原文件删不掉就撤回副本，压缩包只留在一处
                if let Err(cleanup) = fs::remove_file(&target).await {
                    warn!("无法撤回副本 {}: {}", target.display(), cleanup);
                }
                return Err(e);
            }
        }

        Ok(target)
    }

    pub fn doc_dir(&self) -> &Path {
        &self.doc_dir
    }

    pub fn img_dir(&self) -> &Path {
        &self.img_dir
    }

    pub fn error_dir(&self) -> &Path {
        &self.error_dir
    }
}

async fn copy_unique(source: &Path, candidate: &Path) -> io::Result<PathBuf> {
    let target = resolve_unique_path(candidate);
    fs::copy(source, &target).await?;
    Ok(target)
}
