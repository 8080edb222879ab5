use std::path::{Path, PathBuf};
use thiserror::Error;

/// 应用程序错误类型（整次运行级别，单个压缩包的失败见 [`ItemFailure`]）
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置文件读取失败
    #[error("配置文件读取失败 ({path}): {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 目录创建失败
    #[error("无法创建目录 ({path}): {source}")]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 输入目录无法读取
    #[error("无法读取输入目录 ({path}): {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 汇总表写入失败
    #[error("汇总表写入失败 ({path}): {message}")]
    Summary { path: PathBuf, message: String },
}

/// 解压错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 不支持的压缩格式
    #[error("不支持的压缩格式: {path}")]
    UnsupportedFormat { path: PathBuf },
    /// 压缩包无法打开
    #[error("无法打开压缩包 ({path}): {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 压缩包损坏或解码失败
    #[error("压缩包损坏或无法解码 ({path}): {message}")]
    Corrupt { path: PathBuf, message: String },
    /// 条目路径越出解压目录
    #[error("压缩包含有越界路径 ({path}): {entry}")]
    UnsafeEntry { path: PathBuf, entry: String },
    /// 写出文件失败
    #[error("解压写入失败 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 后台解压任务异常退出
    #[error("解压任务中断 ({path}): {message}")]
    Interrupted { path: PathBuf, message: String },
}

impl ExtractError {
    pub fn corrupt(path: &Path, message: impl std::fmt::Display) -> Self {
        ExtractError::Corrupt {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// 表格元数据读取错误
#[derive(Debug, Error)]
pub enum MetadataError {
    /// 工作簿无法打开或解析
    #[error("无法打开表格 ({path}): {message}")]
    Open { path: PathBuf, message: String },
    /// 工作簿中没有工作表
    #[error("表格中没有工作表: {path}")]
    NoSheet { path: PathBuf },
    /// 必填单元格为空
    #[error("必填单元格 {cell} 为空")]
    MissingField { cell: String },
    /// 字段数量不符
    #[error("字段数量错误: 期望 {expected} 个，实际 {found} 个")]
    FieldCount { expected: usize, found: usize },
    /// 后台读取任务异常退出
    #[error("表格读取任务中断: {message}")]
    Interrupted { message: String },
}

/// 单个压缩包的失败分类
///
/// 任意一种都会把原压缩包移入错误目录，且不产生汇总行。
#[derive(Debug, Error)]
pub enum ItemFailure {
    /// 解压失败
    #[error("解压失败: {0}")]
    ExtractFailed(#[from] ExtractError),
    /// 压缩包内未找到表格
    #[error("未找到Excel文件")]
    SpreadsheetNotFound,
    /// 表格存在但无法读取或字段不完整
    #[error("Excel数据格式错误: {0}")]
    SpreadsheetInvalid(#[from] MetadataError),
}

impl ItemFailure {
    /// 失败类型简称（用于统计和日志）
    pub fn kind(&self) -> &'static str {
        match self {
            ItemFailure::ExtractFailed(_) => "extract_failed",
            ItemFailure::SpreadsheetNotFound => "spreadsheet_not_found",
            ItemFailure::SpreadsheetInvalid(_) => "spreadsheet_invalid",
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建配置读取错误
    pub fn config_read(path: &Path, source: std::io::Error) -> Self {
        AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        }
    }

    /// 创建配置解析错误
    pub fn config_parse(path: &Path, source: toml::de::Error) -> Self {
        AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    }

    /// 创建目录创建错误
    pub fn bootstrap(path: &Path, source: std::io::Error) -> Self {
        AppError::Bootstrap {
            path: path.to_path_buf(),
            source,
        }
    }

    /// 创建汇总表写入错误
    pub fn summary(path: &Path, message: impl std::fmt::Display) -> Self {
        AppError::Summary {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
