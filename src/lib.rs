//! # Submission Sorter
//!
//! 批量整理报名材料压缩包：解压、读取报名表、按统一规则命名文档和图片、生成汇总表
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 包装外部能力，只暴露能力
//! - `ArchiveExtractor` - zip / 7z / rar 解压
//! - `read_fields` - 读取报名表第 8 行
//! - `write_summary` - 写出汇总表
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `file_locator` - 按扩展名查找文件
//! - `naming` - 文件名清理与防重名
//! - `OutputStore` - 输出目录与错误目录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个压缩包"的完整处理流程
//! - `ItemCtx` - 上下文封装（压缩包 + 队列位置）
//! - `ItemFlow` - 流程编排（解压 → 读表 → 文档 → 图片 → 汇总行）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 遍历输入目录，写出汇总表
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ItemFailure};
pub use models::{SubmissionRecord, SummaryRow};
pub use orchestrator::{App, RunReport};
pub use workflow::{ItemCtx, ItemFlow, ItemOutcome};
