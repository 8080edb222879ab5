#![allow(dead_code)]

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use submission_sorter::Config;

pub const ZHANG: [&str; 7] = ["类别A", "张三", "男", "工学院", "1班", "2021001", "13800000000"];
pub const LI: [&str; 7] = ["类别B", "李四", "女", "理学院", "2班", "2021002", "13900000000"];

/// 在 `root` 下准备一套目录并返回配置
pub fn setup(root: &Path) -> Config {
    let config = Config::rooted_at(root);
    fs::create_dir_all(&config.input_dir).unwrap();
    config
}

/// 生成报名表（第 8 行 A–G）
pub fn sheet_bytes(values: [&str; 7]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "报名信息表").unwrap();
    for (col, value) in values.iter().enumerate() {
        if !value.is_empty() {
            sheet.write_string(7, col as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn build_zip(path: &Path, files: &[(&str, Vec<u8>)]) -> PathBuf {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    for (name, content) in files {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

pub fn build_7z(path: &Path, files: &[(&str, Vec<u8>)]) -> PathBuf {
    let staging = path.with_extension("staging");
    for (name, content) in files {
        let file_path = staging.join(name);
        fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        fs::write(file_path, content).unwrap();
    }
    sevenz_rust::compress_to_path(&staging, path).unwrap();
    fs::remove_dir_all(&staging).unwrap();
    path.to_path_buf()
}

/// 按原样写入条目名（可以含 `../`），不经过文件系统
pub fn build_7z_entries(path: &Path, files: &[(&str, Vec<u8>)]) -> PathBuf {
    let mut writer = sevenz_rust::SevenZWriter::create(path).unwrap();
    for (name, content) in files {
        let mut entry = sevenz_rust::SevenZArchiveEntry::new();
        entry.name = name.to_string();
        writer.push_archive_entry(entry, Some(content.as_slice())).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

/// 标准材料包：报名表 + 文档 + 图片
pub fn full_bundle(values: [&str; 7]) -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("材料/报名表.xlsx", sheet_bytes(values)),
        ("材料/个人陈述.docx", b"docx-content".to_vec()),
        ("材料/照片.jpg", b"jpg-content".to_vec()),
    ]
}

/// 读取汇总表全部行（含表头）
pub fn read_summary(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

/// 目录下的文件名（排序）
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
