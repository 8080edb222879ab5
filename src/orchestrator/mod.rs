//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责遍历输入队列和输出汇总，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理输入目录中的全部压缩包)
//!     ↓
//! workflow::ItemFlow (处理单个压缩包)
//!     ↓
//! services (能力层：查找 / 命名 / 存储)
//!     ↓
//! infrastructure (基础设施：解压 / 读表 / 写表 / 目录)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管队列和汇总，ItemFlow 管单个压缩包
//! 2. **顺序执行**：共用临时目录，上一个压缩包结束后才处理下一个
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod batch_processor;

pub use batch_processor::{App, RunReport};
