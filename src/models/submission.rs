//! 报名信息记录
//!
//! 表格第 8 行 A–G 列按固定顺序给出七个字段，全部存在才能构成一条记录。

use crate::error::MetadataError;

/// 必填字段数量
pub const FIELD_COUNT: usize = 7;

/// 字段所在列（与字段顺序一一对应）
pub const FIELD_COLUMNS: [char; FIELD_COUNT] = ['A', 'B', 'C', 'D', 'E', 'F', 'G'];

/// 报名信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    /// 类别
    pub category: String,
    /// 姓名
    pub name: String,
    /// 性别
    pub gender: String,
    /// 学院
    pub college: String,
    /// 班级
    pub class_name: String,
    /// 学号
    pub student_id: String,
    /// 联系电话
    pub phone: String,
}

impl SubmissionRecord {
    /// 由按列顺序读出的单元格值构建记录
    ///
    /// 数量不是 7 个或任意一个为空都会失败。
    pub fn from_cells(cells: Vec<Option<String>>, row: u32) -> Result<Self, MetadataError> {
        if cells.len() != FIELD_COUNT {
            return Err(MetadataError::FieldCount {
                expected: FIELD_COUNT,
                found: cells.len(),
            });
        }

        let values = FIELD_COLUMNS
            .iter()
            .zip(cells)
            .map(|(column, cell)| {
                cell.ok_or_else(|| MetadataError::MissingField {
                    cell: format!("{}{}", column, row),
                })
            })
            .collect::<Result<Vec<String>, _>>()?;

        let [category, name, gender, college, class_name, student_id, phone]: [String; FIELD_COUNT] =
            values.try_into().map_err(|v: Vec<String>| MetadataError::FieldCount {
                expected: FIELD_COUNT,
                found: v.len(),
            })?;

        Ok(Self {
            category,
            name,
            gender,
            college,
            class_name,
            student_id,
            phone,
        })
    }

    /// 按汇总表列顺序返回字段
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            self.category.as_str(),
            self.name.as_str(),
            self.gender.as_str(),
            self.college.as_str(),
            self.class_name.as_str(),
            self.student_id.as_str(),
            self.phone.as_str(),
        ]
    }
}
