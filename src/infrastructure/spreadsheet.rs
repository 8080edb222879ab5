//! 表格读取能力 - 基础设施层
//!
//! 打开第一张工作表，读取第 8 行 A–G 列。打不开、没有工作表、字段缺失都返回错误，
//! 由调用方决定如何记录。

use crate::error::MetadataError;
use crate::models::submission::{SubmissionRecord, FIELD_COUNT};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// 元数据所在行（从 1 开始，与表格界面一致）
pub const METADATA_ROW: u32 = 8;

/// 日期单元格的文本格式
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 读取报名信息
pub fn read_fields(path: &Path) -> Result<SubmissionRecord, MetadataError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| MetadataError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MetadataError::NoSheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| MetadataError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let row = METADATA_ROW - 1;
    let cells = (0..FIELD_COUNT as u32)
        .map(|col| range.get_value((row, col)).and_then(cell_text))
        .collect();

    SubmissionRecord::from_cells(cells, METADATA_ROW)
}

/// 单元格转文本，空值返回 None
///
/// 整数值的浮点单元格（学号、电话常被存成数字）去掉小数部分；
/// 布尔写作 `True` / `False`，日期写作 `2021-09-01 00:00:00`。
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(value) if dt.is_datetime() => value.format(DATETIME_FORMAT).to_string(),
            _ => dt.to_string(),
        }),
        other => Some(other.to_string()),
    }
}
