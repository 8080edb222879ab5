pub mod submission;
pub mod summary;

pub use submission::{SubmissionRecord, FIELD_COUNT};
pub use summary::{Remark, RemarkSet, SummaryRow, SUMMARY_HEADERS};
