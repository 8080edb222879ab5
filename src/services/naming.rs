//! 命名服务 - 业务能力层
//!
//! 负责两件事：把自由文本清理成可用的文件名，以及在目标已存在时追加数字后缀。

use crate::models::SubmissionRecord;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// 替换非法字符后使用的字符
const REPLACEMENT: &str = "_";

fn forbidden_chars() -> &'static Regex {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    FORBIDDEN.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|\n\r\t]"#).unwrap_or_else(|e| unreachable!("固定正则无效: {e}"))
    })
}

/// 清理文件名中的非法字符
///
/// `\ / : * ? " < > |` 以及换行、回车、制表符替换为 `_`，其余字符（包括中文）原样保留。
pub fn sanitize(text: &str) -> String {
    forbidden_chars().replace_all(text, REPLACEMENT).into_owned()
}

/// 输出文件基础名：`姓名-学号-类别`，已清理非法字符
pub fn output_base_name(record: &SubmissionRecord) -> String {
    sanitize(&format!(
        "{}-{}-{}",
        record.name, record.student_id, record.category
    ))
}

/// 返回一个当前不存在的路径
///
/// 候选路径不存在时原样返回；否则依次尝试 `stem_1.ext`、`stem_2.ext`……
/// 直到找到空位。没有上限：目录中的文件总是有限的，递增下去总能找到空位。
pub fn resolve_unique_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: u64 = 1;
    loop {
        let next = candidate.with_file_name(format!("{stem}_{counter}{suffix}"));
        if !next.exists() {
            return next;
        }
        counter += 1;
    }
}
