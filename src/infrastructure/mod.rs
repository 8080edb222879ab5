//! 基础设施层（Infrastructure）
//!
//! 包装外部能力（解压、读表、写表、目录），只暴露能力，不做流程判断。

pub mod archive;
pub mod spreadsheet;
pub mod summary_writer;
pub mod workspace;

pub use archive::{ArchiveExtractor, ArchiveFormat, Extractor};
pub use spreadsheet::read_fields;
pub use summary_writer::write_summary;
pub use workspace::{ensure_directories, Workspace};
