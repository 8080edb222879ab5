//! 汇总表数据

use crate::models::submission::SubmissionRecord;
use std::fmt::Display;

/// 汇总表列名（顺序固定）
pub const SUMMARY_HEADERS: [&str; 8] = [
    "category",
    "name",
    "gender",
    "college",
    "class",
    "student ID",
    "phone",
    "remark",
];

/// 无备注时的备注列取值
pub const REMARK_NORMAL: &str = "normal";

/// 备注之间的分隔符（全角顿号）
pub const REMARK_SEPARATOR: &str = "、";

/// 非致命缺失项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remark {
    /// 缺少文档
    MissingDocument,
    /// 缺少图片
    MissingImage,
}

impl Remark {
    pub fn label(self) -> &'static str {
        match self {
            Remark::MissingDocument => "missing document",
            Remark::MissingImage => "missing image",
        }
    }
}

impl Display for Remark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 按收集顺序保存的备注
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemarkSet(Vec<Remark>);

impl RemarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, remark: Remark) {
        self.0.push(remark);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 备注列文本：为空时为 `normal`，否则按顺序用 `、` 连接
    pub fn render(&self) -> String {
        if self.0.is_empty() {
            return REMARK_NORMAL.to_string();
        }
        self.0
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(REMARK_SEPARATOR)
    }
}

/// 汇总表中的一行（只对成功归档的压缩包产生）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub record: SubmissionRecord,
    pub remarks: RemarkSet,
}

impl SummaryRow {
    pub fn new(record: SubmissionRecord, remarks: RemarkSet) -> Self {
        Self { record, remarks }
    }

    /// 按 [`SUMMARY_HEADERS`] 顺序给出的单元格文本
    pub fn cells(&self) -> Vec<String> {
        let mut cells: Vec<String> = self.record.fields().iter().map(|f| f.to_string()).collect();
        cells.push(self.remarks.render());
        cells
    }

    pub fn remark(&self) -> String {
        self.remarks.render()
    }
}
