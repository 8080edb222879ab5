//! 汇总表写入 - 基础设施层
//!
//! 一次性把整张汇总表写成 xlsx：第一行表头，之后每个成功归档的压缩包一行。
//! 没有数据时仍然写出只有表头的表。

use crate::error::{AppError, AppResult};
use crate::models::summary::{SummaryRow, SUMMARY_HEADERS};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

/// 汇总表工作表名
const SHEET_NAME: &str = "汇总";

/// 写入汇总表
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> AppResult<()> {
    build_workbook(path, rows).map_err(|e| AppError::summary(path, e))
}

fn build_workbook(path: &Path, rows: &[SummaryRow]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, value) in row.cells().iter().enumerate() {
            sheet.write_string(row_num, col as u16, value)?;
        }
    }

    workbook.save(path)
}
