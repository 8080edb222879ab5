//! 压缩包处理上下文
//!
//! 封装"我正在处理队列里第几个压缩包"这一信息

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 压缩包处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 压缩包路径
    pub archive: PathBuf,

    /// 在队列中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 队列总数
    pub total: usize,
}

impl ItemCtx {
    pub fn new(archive: PathBuf, index: usize, total: usize) -> Self {
        Self {
            archive,
            index,
            total,
        }
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// 压缩包原文件名
    pub fn archive_name(&self) -> String {
        self.archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.archive.display().to_string())
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{} {}]", self.index, self.total, self.archive_name())
    }
}
