//! 目录准备 - 基础设施层
//!
//! 启动时创建所需目录；解压临时目录在每个压缩包开始前清空重建。
//! 临时目录是全程共用的单一资源，只能顺序处理。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 创建配置中的全部目录（已存在则跳过）
pub async fn ensure_directories(config: &Config) -> AppResult<()> {
    for dir in config.required_dirs() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::bootstrap(dir, e))?;
    }
    Ok(())
}

/// 共用的解压临时目录
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// 删除（若存在）后重新创建
    pub async fn reset(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(&self.root).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_clears_previous_item() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().join("temp"));

        tokio_test::block_on(async {
            workspace.reset().await.unwrap();
            std::fs::write(workspace.path().join("left_over.xlsx"), b"x").unwrap();

            workspace.reset().await.unwrap();
        });

        assert!(workspace.path().is_dir());
        assert_eq!(std::fs::read_dir(workspace.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_directories() {
        let dir = TempDir::new().unwrap();
        let config = Config::rooted_at(dir.path());

        ensure_directories(&config).await.unwrap();
        ensure_directories(&config).await.unwrap();

        for path in config.required_dirs() {
            assert!(path.is_dir(), "{} missing", path.display());
        }
    }
}
