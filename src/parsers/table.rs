//! # 系数表 CSV 解析器
//!
//! 从 CSV 文件读取材料质量衰减系数表。
//!
//! ## 格式说明
//! ```text
//! material,density,energy_mev,mass_attenuation
//! bone,1.92,0.01,28.51
//! bone,1.92,0.1,0.1855
//! soft_tissue,1.03,0.01,4.937
//! ...
//! ```
//! 同一材料的行可以乱序，读入后按能量排序；同一材料的密度必须一致。
//!
//! ## 依赖关系
//! - 被 `commands/common.rs` 调用
//! - 使用 `models/material.rs`
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{Result, XattenError};
use crate::models::{Material, MaterialTable};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// CSV 行
#[derive(Debug, Deserialize)]
struct TableRow {
    material: String,
    density: f64,
    energy_mev: f64,
    mass_attenuation: f64,
}

/// 解析系数表文件
pub fn parse_table_file(path: &Path) -> Result<MaterialTable> {
    if !path.is_file() {
        return Err(XattenError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| XattenError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_table_content(&content)
}

/// 从字符串内容解析系数表
pub fn parse_table_content(content: &str) -> Result<MaterialTable> {
    parse_table_reader(csv::Reader::from_reader(content.as_bytes()))
}

fn parse_table_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<MaterialTable> {
    // material -> (density, [(energy, mac)])
    let mut grouped: BTreeMap<String, (f64, Vec<(f64, f64)>)> = BTreeMap::new();

    for row in reader.deserialize() {
        let row: TableRow = row?;
        let name = row.material.trim().to_string();

        if name.is_empty() {
            return Err(XattenError::InvalidTable("empty material name".to_string()));
        }

        let entry = grouped
            .entry(name.clone())
            .or_insert_with(|| (row.density, Vec::new()));

        if entry.0 != row.density {
            return Err(XattenError::InvalidTable(format!(
                "material '{}' has conflicting densities {} and {}",
                name, entry.0, row.density
            )));
        }

        entry.1.push((row.energy_mev, row.mass_attenuation));
    }

    let mut table = MaterialTable::new();
    for (name, (density, mut points)) in grouped {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(XattenError::InvalidTable(format!(
                "material '{}' lists energy {} MeV twice",
                name, w[0].0
            )));
        }

        let (energies, coefficients): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        table.insert(Material::new(name, density, energies, coefficients)?)?;
    }

    if table.is_empty() {
        return Err(XattenError::InvalidTable("table has no rows".to_string()));
    }

    Ok(table)
}
