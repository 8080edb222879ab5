//! 解压能力 - 基础设施层
//!
//! 对外只暴露"给一个压缩包和目标目录，解出来或者失败"。
//! 目标目录由调用方事先清空。

use crate::error::ExtractError;
use std::fs;
use std::io;
use std::path::{Component, Path};
use tracing::warn;
use walkdir::WalkDir;

/// 支持的压缩格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZ,
    Rar,
}

impl ArchiveFormat {
    /// 根据扩展名识别格式（不区分大小写）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            "7z" => Some(Self::SevenZ),
            "rar" => Some(Self::Rar),
            _ => None,
        }
    }
}

/// 解压能力
///
/// 返回写出的文件数量，底层错误统一转换为 [`ExtractError`]。
pub trait Extractor: Send + Sync {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<usize, ExtractError>;
}

/// 默认实现：zip / 7z / rar
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<usize, ExtractError> {
        let format = ArchiveFormat::from_path(archive).ok_or_else(|| {
            ExtractError::UnsupportedFormat {
                path: archive.to_path_buf(),
            }
        })?;

        fs::create_dir_all(dest).map_err(|e| ExtractError::io(dest, e))?;

        match format {
            ArchiveFormat::Zip => extract_zip(archive, dest),
            ArchiveFormat::SevenZ => extract_7z(archive, dest),
            ArchiveFormat::Rar => extract_rar(archive, dest),
        }
    }
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize, ExtractError> {
    let file = fs::File::open(archive_path).map_err(|e| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::corrupt(archive_path, e))?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ExtractError::corrupt(archive_path, e))?;

        // 跳过越界路径（../ 或绝对路径）
        let Some(entry_path) = entry.enclosed_name() else {
            continue;
        };
        let output_path = dest.join(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|e| ExtractError::io(&output_path, e))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
        }
        let mut outfile =
            fs::File::create(&output_path).map_err(|e| ExtractError::io(&output_path, e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => ExtractError::corrupt(archive_path, e),
            _ => ExtractError::io(&output_path, e),
        })?;
        count += 1;
    }

    Ok(count)
}

fn extract_7z(archive_path: &Path, dest: &Path) -> Result<usize, ExtractError> {
    let mut count = 0;
    sevenz_rust::decompress_file_with_extract_fn(archive_path, dest, |entry, reader, target| {
        if !is_enclosed(entry.name()) {
            warn!("跳过越界条目: {} ({})", entry.name(), archive_path.display());
            // 固实压缩的条目共用一个数据流，跳过的条目也要读完
            io::copy(reader, &mut io::sink()).map_err(sevenz_rust::Error::io)?;
            return Ok(true);
        }
        let keep_going = sevenz_rust::default_entry_extract_fn(entry, reader, target)?;
        if !entry.is_directory() {
            count += 1;
        }
        Ok(keep_going)
    })
    .map_err(|e| ExtractError::corrupt(archive_path, e))?;
    Ok(count)
}

/// rar 库只能整体解压，因此先扫描文件头，有越界条目就整个拒绝
fn extract_rar(archive_path: &Path, dest: &Path) -> Result<usize, ExtractError> {
    let names = rar_entry_names(archive_path)?;
    if let Some(entry) = names.into_iter().find(|name| !is_enclosed(name)) {
        return Err(ExtractError::UnsafeEntry {
            path: archive_path.to_path_buf(),
            entry,
        });
    }

    let path_str = archive_path
        .to_str()
        .ok_or_else(|| ExtractError::corrupt(archive_path, "RAR 路径不是有效的 UTF-8"))?;
    let dest_str = dest
        .to_str()
        .ok_or_else(|| ExtractError::corrupt(archive_path, "解压目录不是有效的 UTF-8"))?;

    rar::Archive::extract_all(path_str, dest_str, "")
        .map_err(|e| ExtractError::corrupt(archive_path, format!("{e:?}")))?;
    Ok(count_files(dest))
}

/// 条目是否落在解压目录内：不允许 `..`、根路径或盘符（与 zip 的 `enclosed_name` 同规则）
fn is_enclosed(name: &str) -> bool {
    let normalized = name.replace('\\', "/");
    Path::new(&normalized)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

const RAR5_SIGNATURE: &[u8] = b"Rar!\x1a\x07\x01\x00";
const RAR_BLOCK_FILE: u64 = 2;
const RAR_BLOCK_ENCRYPTION: u64 = 4;
const RAR_BLOCK_END: u64 = 5;
const RAR_FLAG_EXTRA: u64 = 0x1;
const RAR_FLAG_DATA: u64 = 0x2;
const RAR_FILE_FLAG_TIME: u64 = 0x2;
const RAR_FILE_FLAG_CRC: u64 = 0x4;

/// 读取 RAR5 文件头中的全部条目名（不解压数据）
fn rar_entry_names(archive_path: &Path) -> Result<Vec<String>, ExtractError> {
    let bytes = fs::read(archive_path).map_err(|e| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    if !bytes.starts_with(RAR5_SIGNATURE) {
        return Err(ExtractError::corrupt(archive_path, "不是 RAR5 压缩包"));
    }

    let truncated = || ExtractError::corrupt(archive_path, "RAR 文件头不完整");
    let mut names = Vec::new();
    let mut pos = RAR5_SIGNATURE.len();

    while pos < bytes.len() {
        // 每个块以 4 字节 CRC32 开头
        let mut cursor = HeaderCursor {
            bytes: &bytes,
            pos: pos.checked_add(4).ok_or_else(truncated)?,
        };
        let header_size = cursor.vint_usize().ok_or_else(truncated)?;
        let header_start = cursor.pos;

        let block_type = cursor.vint().ok_or_else(truncated)?;
        let flags = cursor.vint().ok_or_else(truncated)?;
        if flags & RAR_FLAG_EXTRA != 0 {
            cursor.vint().ok_or_else(truncated)?;
        }
        let data_size = if flags & RAR_FLAG_DATA != 0 {
            cursor.vint_usize().ok_or_else(truncated)?
        } else {
            0
        };

        match block_type {
            RAR_BLOCK_FILE => names.push(cursor.file_name().ok_or_else(truncated)?),
            RAR_BLOCK_ENCRYPTION => {
                return Err(ExtractError::corrupt(archive_path, "不支持文件头加密的 RAR"))
            }
            RAR_BLOCK_END => break,
            _ => {}
        }

        pos = header_start
            .checked_add(header_size)
            .and_then(|p| p.checked_add(data_size))
            .ok_or_else(truncated)?;
    }

    Ok(names)
}

struct HeaderCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    /// 变长整数：每字节低 7 位，小端，最高位表示后面还有
    fn vint(&mut self) -> Option<u64> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = *self.bytes.get(self.pos)?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Some(value);
            }
        }
        None
    }

    fn vint_usize(&mut self) -> Option<usize> {
        usize::try_from(self.vint()?).ok()
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn file_name(&mut self) -> Option<String> {
        let file_flags = self.vint()?;
        self.vint()?; // 解压后大小
        self.vint()?; // 属性
        if file_flags & RAR_FILE_FLAG_TIME != 0 {
            self.take(4)?;
        }
        if file_flags & RAR_FILE_FLAG_CRC != 0 {
            self.take(4)?;
        }
        self.vint()?; // 压缩信息
        self.vint()?; // 主机系统
        let name_len = self.vint_usize()?;
        let name = self.take(name_len)?;
        Some(String::from_utf8_lossy(name).into_owned())
    }
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let zip_path = dir.join(name);
        let file = fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);

        for (entry_name, content) in files {
            writer.start_file(entry_name.to_string(), options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
        zip_path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ArchiveFormat::from_path(Path::new("a.zip")), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_path(Path::new("a.ZIP")), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_path(Path::new("c.7z")), Some(ArchiveFormat::SevenZ));
        assert_eq!(ArchiveFormat::from_path(Path::new("b.Rar")), Some(ArchiveFormat::Rar));
        assert_eq!(ArchiveFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(ArchiveFormat::from_path(Path::new("zip")), None);
    }

    #[test]
    fn test_extract_zip_nested() {
        let dir = TempDir::new().unwrap();
        let zip_path = create_test_zip(
            dir.path(),
            "a.zip",
            &[("材料/报名表.xlsx", b"sheet"), ("材料/照片.jpg", b"img")],
        );
        let dest = dir.path().join("out");

        let count = ArchiveExtractor.extract(&zip_path, &dest).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read(dest.join("材料/照片.jpg")).unwrap(), b"img");
    }

    #[test]
    fn test_extract_7z() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("readme.txt"), b"hello").unwrap();
        let archive = dir.path().join("c.7z");
        sevenz_rust::compress_to_path(&src, &archive).unwrap();
        let dest = dir.path().join("out");

        let count = ArchiveExtractor.extract(&archive, &dest).unwrap();

        assert_eq!(count, 1);
    }

    fn create_raw_7z(path: &Path, files: &[(&str, &[u8])]) {
        let mut writer = sevenz_rust::SevenZWriter::create(path).unwrap();
        for (name, content) in files {
            let mut entry = sevenz_rust::SevenZArchiveEntry::new();
            entry.name = name.to_string();
            writer.push_archive_entry(entry, Some(*content)).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_7z_skips_entries_outside_dest() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("evil.7z");
        create_raw_7z(
            &archive,
            &[("../escaped.txt", b"escaped"), ("材料/报名表.xlsx", b"sheet")],
        );
        let dest = dir.path().join("work").join("temp");

        let count = ArchiveExtractor.extract(&archive, &dest).unwrap();

        assert_eq!(count, 1);
        assert!(!dir.path().join("work").join("escaped.txt").exists());
        assert_eq!(fs::read(dest.join("材料/报名表.xlsx")).unwrap(), b"sheet");
    }

    /// 手工拼一个只有文件头的 RAR5：主头 + 每个条目一个文件头 + 结束头
    fn create_rar5_headers(path: &Path, names: &[&str]) {
        let mut bytes = RAR5_SIGNATURE.to_vec();
        let mut push_block = |body: &[u8], data: &[u8]| {
            bytes.extend_from_slice(&[0, 0, 0, 0]);
            bytes.push(body.len() as u8);
            bytes.extend_from_slice(body);
            bytes.extend_from_slice(data);
        };

        push_block(&[1, 0, 0], &[]);
        for name in names {
            let data = b"hello";
            let mut body = vec![2, RAR_FLAG_DATA as u8, data.len() as u8];
            body.extend_from_slice(&[0, data.len() as u8, 0, 0, 0, name.len() as u8]);
            body.extend_from_slice(name.as_bytes());
            push_block(&body, data);
        }
        push_block(&[5, 0, 0], &[]);

        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_rar_entry_names_reads_file_headers() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("a.rar");
        create_rar5_headers(&archive, &["材料/报名表.xlsx", "照片.jpg"]);

        let names = rar_entry_names(&archive).unwrap();

        assert_eq!(names, vec!["材料/报名表.xlsx", "照片.jpg"]);
    }

    #[test]
    fn test_rar_with_parent_dir_entry_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("evil.rar");
        create_rar5_headers(&archive, &["ok.txt", "../escaped.txt"]);
        let dest = dir.path().join("work").join("temp");

        let err = ArchiveExtractor.extract(&archive, &dest).unwrap_err();

        match err {
            ExtractError::UnsafeEntry { entry, .. } => assert_eq!(entry, "../escaped.txt"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("work").join("escaped.txt").exists());
        assert!(!dest.join("ok.txt").exists());
    }

    #[test]
    fn test_is_enclosed() {
        assert!(is_enclosed("材料/报名表.xlsx"));
        assert!(is_enclosed("./a.txt"));
        assert!(!is_enclosed("../a.txt"));
        assert!(!is_enclosed("材料/../../a.txt"));
        assert!(!is_enclosed("..\\a.txt"));
        assert!(!is_enclosed("/etc/passwd"));
    }

    #[test]
    fn test_corrupt_archives_fail() {
        let dir = TempDir::new().unwrap();
        for name in ["broken.zip", "broken.7z"] {
            let path = dir.path().join(name);
            fs::write(&path, b"this is not an archive").unwrap();

            let result = ArchiveExtractor.extract(&path, &dir.path().join("out"));
            assert!(result.is_err(), "{name} should fail");
        }
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.tar");
        fs::write(&path, b"data").unwrap();

        let err = ArchiveExtractor.extract(&path, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_archive_is_open_error() {
        let dir = TempDir::new().unwrap();
        let err = ArchiveExtractor
            .extract(&dir.path().join("gone.zip"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Open { .. }));
    }
}
