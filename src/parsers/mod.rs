//! # 解析器模块
//!
//! 提供系数表与层序列的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: table, layers

pub mod layers;
pub mod table;

use crate::error::Result;
use crate::models::MaterialTable;
use std::path::Path;

/// 加载系数表：给定路径则读取 CSV，否则使用内置表
pub fn load_table(path: Option<&Path>) -> Result<MaterialTable> {
    match path {
        Some(p) => table::parse_table_file(p),
        None => MaterialTable::builtin(),
    }
}
