use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认配置文件名（位于工作目录）
const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待处理压缩包目录
    pub input_dir: PathBuf,
    /// 文档输出目录
    pub output_doc_dir: PathBuf,
    /// 图片输出目录
    pub output_img_dir: PathBuf,
    /// 失败压缩包存放目录
    pub error_dir: PathBuf,
    /// 解压临时目录（每个压缩包处理前重置）
    pub temp_dir: PathBuf,
    /// 运行日志文件（追加写入）
    pub log_file: PathBuf,
    /// 汇总表路径
    pub summary_file: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            output_doc_dir: PathBuf::from("./output/doc"),
            output_img_dir: PathBuf::from("./output/image"),
            error_dir: PathBuf::from("./error"),
            temp_dir: PathBuf::from("./temp"),
            log_file: PathBuf::from("./run_log.txt"),
            summary_file: PathBuf::from("./output/汇总表.xlsx"),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：配置文件（可选）→ 环境变量覆盖
    ///
    /// 配置文件路径优先取 `SORTER_CONFIG`，否则尝试工作目录下的 `config.toml`，
    /// 都不存在时使用默认值。
    pub fn load() -> AppResult<Self> {
        let file = std::env::var("SORTER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if file.exists() {
            Self::from_toml_file(&file)?
        } else {
            Self::default()
        };

        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config_read(path, e))?;
        Self::from_toml_str(&content).map_err(|e| AppError::config_parse(path, e))
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 仅使用环境变量覆盖默认配置
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        let path_var = |name: &str, fallback: PathBuf| {
            std::env::var(name).map(PathBuf::from).unwrap_or(fallback)
        };
        Self {
            input_dir: path_var("INPUT_DIR", self.input_dir),
            output_doc_dir: path_var("OUTPUT_DOC_DIR", self.output_doc_dir),
            output_img_dir: path_var("OUTPUT_IMG_DIR", self.output_img_dir),
            error_dir: path_var("ERROR_DIR", self.error_dir),
            temp_dir: path_var("TEMP_DIR", self.temp_dir),
            log_file: path_var("LOG_FILE", self.log_file),
            summary_file: path_var("SUMMARY_FILE", self.summary_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 启动时需要确保存在的目录
    pub fn required_dirs(&self) -> Vec<&Path> {
        let mut dirs = vec![
            self.input_dir.as_path(),
            self.output_doc_dir.as_path(),
            self.output_img_dir.as_path(),
            self.error_dir.as_path(),
            self.temp_dir.as_path(),
        ];
        if let Some(parent) = self.summary_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            dirs.push(parent);
        }
        dirs
    }

    /// 以指定根目录构建一套完整配置（测试与嵌入调用使用）
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            input_dir: root.join("input"),
            output_doc_dir: root.join("output").join("doc"),
            output_img_dir: root.join("output").join("image"),
            error_dir: root.join("error"),
            temp_dir: root.join("temp"),
            log_file: root.join("run_log.txt"),
            summary_file: root.join("output").join("汇总表.xlsx"),
            verbose_logging: false,
        }
    }
}
