//! 文件查找服务 - 业务能力层
//!
//! 在解压出的目录树中按扩展名查找文件。

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// 表格扩展名
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];
/// 文档扩展名
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".docx", ".doc"];
/// 图片扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// 递归查找匹配扩展名的文件
///
/// 扩展名不区分大小写。结果按 `extensions` 的顺序分组：先列出第一个扩展名的
/// 全部匹配，再列第二个，依此类推；同一扩展名内按文件名排序遍历。
/// 没有匹配时返回空列表。
pub fn find_by_extensions(root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    let mut matches = Vec::new();
    for ext in extensions {
        let wanted = ext.trim_start_matches('.');
        matches.extend(
            files
                .iter()
                .filter(|path| has_extension(path, wanted))
                .cloned(),
        );
    }

    debug!(
        "在 {} 中按 {:?} 找到 {} 个文件",
        root.display(),
        extensions,
        matches.len()
    );
    matches
}

/// 查找第一个匹配文件
pub fn find_first(root: &Path, extensions: &[&str]) -> Option<PathBuf> {
    find_by_extensions(root, extensions).into_iter().next()
}

/// 文件扩展名是否等于 `wanted`（不区分大小写，`wanted` 不带点）
pub fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
}

/// 小写扩展名（带点），没有扩展名时为空字符串
pub fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
