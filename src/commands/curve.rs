//! # curve 子命令实现
//!
//! 为每种材料生成不同能量下的透射强度-厚度曲线（一个材料一个输出文件）。
//!
//! ## 依赖关系
//! - 使用 `cli/attenuation.rs` 定义的 CurveArgs
//! - 使用 `attenuation/calculator.rs`、`plot.rs`、`export.rs`
//! - 使用 `utils/progress.rs` 显示渲染进度

use crate::attenuation::plot::Series;
use crate::attenuation::{calculator, export, plot};
use crate::cli::attenuation::{CurveArgs, OutputFormat};
use crate::commands::common::{self, fmt_number, format_energy};
use crate::error::{Result, XattenError};
use crate::models::Material;
use crate::utils::{output, progress};

use std::fs;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Tabled)]
struct MuRow {
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "μ (1/cm)")]
    mu: String,
    #[tabled(rename = "Half-value layer (cm)")]
    hvl: String,
}

/// 执行 curve 命令
pub fn execute(args: CurveArgs) -> Result<()> {
    output::print_header("Attenuation vs Thickness");

    let table = common::load_table(&args.table)?;
    let energies = common::energies(&args.energies)?;
    let (min, max) = common::parse_range(&args.range)?;
    let thicknesses = common::linspace(min, max, args.points)?;

    let materials = args
        .materials
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| table.get(name))
        .collect::<Result<Vec<_>>>()?;

    if materials.is_empty() {
        return Err(XattenError::InvalidArgument(
            "at least one material is required".to_string(),
        ));
    }

    fs::create_dir_all(&args.output).map_err(|e| XattenError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let format = args.plot.format.unwrap_or(OutputFormat::Png);
    output::print_info(&format!(
        "{} materials × {} energies, thickness {}-{} cm, output format: {:?}",
        materials.len(),
        energies.len(),
        fmt_number(min),
        fmt_number(max),
        format
    ));

    let pb = progress::create_progress_bar(materials.len() as u64, "Rendering curves");
    let mut mu_rows = Vec::new();
    let mut written = Vec::new();
    for material in &materials {
        let series = material_curves(material, &energies, &thicknesses, args.intensity)?;

        for &energy in &energies {
            let mu = calculator::linear_attenuation_coefficient(material, energy)?;
            mu_rows.push(MuRow {
                material: material.name().to_string(),
                energy: format_energy(energy),
                mu: format!("{:.5}", mu),
                hvl: if mu > 0.0 {
                    format!("{:.4}", std::f64::consts::LN_2 / mu)
                } else {
                    "∞".to_string()
                },
            });
        }

        written.extend(write_material_output(&args, material, &series, format)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    for path in &written {
        output::print_success(&format!("Wrote {}", path.display()));
    }

    output::print_table("Linear Attenuation Coefficients", &mu_rows);

    output::print_info(&format!(
        "{} file(s) saved to '{}'",
        written.len(),
        args.output.display()
    ));
    Ok(())
}

/// 单一材料在每个能量下的归一化曲线
fn material_curves(
    material: &Material,
    energies: &[f64],
    thicknesses: &[f64],
    intensity: f64,
) -> Result<Vec<Series>> {
    energies
        .iter()
        .map(|&energy| {
            let points = calculator::thickness_curve(intensity, material, energy, thicknesses)?
                .into_iter()
                .map(|(x, i)| (x, i / intensity))
                .collect();
            Ok(Series {
                label: format_energy(energy),
                points,
            })
        })
        .collect()
}

fn write_material_output(
    args: &CurveArgs,
    material: &Material,
    series: &[Series],
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let stem = format!("{}_attenuation", material.name());

    match format {
        OutputFormat::Png | OutputFormat::Svg => {
            let path = args.output.join(format!("{}.{}", stem, format.extension()));
            let title = args.plot.title.clone().unwrap_or_else(|| {
                format!("X-ray Attenuation through {}", plot::display_name(material.name()))
            });
            plot::generate_curve_plot(
                series,
                material.name(),
                &title,
                &path,
                common::plot_options(&args.plot, format),
            )?;
            Ok(vec![path])
        }
        OutputFormat::Csv => {
            let path = args.output.join(format!("{}.csv", stem));
            export::curves_to_csv(series, &path)?;
            Ok(vec![path])
        }
        OutputFormat::Xy => {
            // XY 只容纳一条曲线：每个能量一个文件
            let mut paths = Vec::with_capacity(series.len());
            for s in series {
                let label = s.label.replace(' ', "");
                let path = args.output.join(format!("{}_{}.xy", stem, label));
                let header = vec![
                    format!("Attenuation through {} at {}", material.name(), s.label),
                    "Columns: thickness (cm), normalized intensity".to_string(),
                ];
                export::to_xy(&header, &s.points, &path)?;
                paths.push(path);
            }
            Ok(paths)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaterialTable;

    #[test]
    fn test_material_curves_are_normalized() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();
        let grid = common::linspace(0.0, 10.0, 11).unwrap();

        let series = material_curves(bone, &[0.1, 1.0], &grid, 500.0).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "100 keV");
        assert_eq!(series[0].points[0], (0.0, 1.0));

        // 高能量曲线处处不低于低能量曲线
        for (lo, hi) in series[0].points.iter().zip(&series[1].points) {
            assert!(hi.1 >= lo.1);
        }
    }
}
