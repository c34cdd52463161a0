//! # materials 子命令实现
//!
//! 列出当前系数表；指定能量时同时给出插值后的 μ/ρ 与 μ。
//!
//! ## 依赖关系
//! - 使用 `cli/attenuation.rs` 定义的 MaterialsArgs
//! - 使用 `models/material.rs`、`attenuation/calculator.rs`

use crate::attenuation::calculator;
use crate::cli::attenuation::MaterialsArgs;
use crate::commands::common::{self, fmt_number, format_energy};
use crate::error::Result;
use crate::models::{Material, MaterialTable};
use crate::utils::output;

use tabled::Tabled;

#[derive(Tabled)]
struct MaterialRow {
    #[tabled(rename = "Material")]
    name: String,
    #[tabled(rename = "Density (g/cm³)")]
    density: String,
    #[tabled(rename = "Energy range (MeV)")]
    range: String,
    #[tabled(rename = "Points")]
    points: usize,
}

#[derive(Tabled)]
struct CoefficientRow {
    #[tabled(rename = "Material")]
    name: String,
    #[tabled(rename = "μ/ρ (cm²/g)")]
    mass_attenuation: String,
    #[tabled(rename = "μ (1/cm)")]
    mu: String,
}

/// 执行 materials 命令
pub fn execute(args: MaterialsArgs) -> Result<()> {
    let table = common::load_table(&args.table)?;
    output::print_table("Mass Attenuation Coefficient Table", &material_rows(&table));

    for material in table.iter() {
        print_material_points(material);
    }

    if let Some(input) = &args.energy {
        let energy = common::energy(input)?;
        output::print_table(
            &format!("Coefficients at {}", format_energy(energy)),
            &coefficient_rows(&table, energy)?,
        );
    }

    Ok(())
}

fn material_rows(table: &MaterialTable) -> Vec<MaterialRow> {
    table
        .iter()
        .map(|m| {
            let (min, max) = m.energy_domain();
            MaterialRow {
                name: m.name().to_string(),
                density: fmt_number(m.density()),
                range: format!("{} - {}", fmt_number(min), fmt_number(max)),
                points: m.energies().len(),
            }
        })
        .collect()
}

fn print_material_points(material: &Material) {
    output::print_separator();
    println!("  {}", material.name());
    for (e, v) in material
        .energies()
        .iter()
        .zip(material.mass_attenuation_points())
    {
        println!("    {:>10}  {:>10.5} cm²/g", format_energy(*e), v);
    }
}

/// 每种材料在给定能量下的 μ/ρ 与 μ；任一材料超出范围即报错
fn coefficient_rows(table: &MaterialTable, energy: f64) -> Result<Vec<CoefficientRow>> {
    table
        .iter()
        .map(|m| {
            Ok(CoefficientRow {
                name: m.name().to_string(),
                mass_attenuation: format!("{:.5}", m.mass_attenuation(energy)?),
                mu: format!("{:.5}", calculator::linear_attenuation_coefficient(m, energy)?),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_rows_cover_builtin_table() {
        let table = MaterialTable::builtin().unwrap();
        let rows = material_rows(&table);
        assert_eq!(rows.len(), 3);
        let bone = rows.iter().find(|r| r.name == "bone").unwrap();
        assert_eq!(bone.density, "1.92");
        assert_eq!(bone.range, "0.01 - 20");
        assert_eq!(bone.points, 5);
    }

    #[test]
    fn test_coefficient_rows() {
        let table = MaterialTable::builtin().unwrap();
        let rows = coefficient_rows(&table, 1.0).unwrap();
        let air = rows.iter().find(|r| r.name == "air").unwrap();
        assert_eq!(air.mass_attenuation, "0.06358");
        assert!(coefficient_rows(&table, 25.0).is_err());
    }
}
