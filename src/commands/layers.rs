//! # layers 子命令实现
//!
//! 计算射线穿过分层组织的强度剖面。
//!
//! ## 功能
//! - 每层之后的强度表
//! - 层内连续剖面曲线（每层着色）
//! - 导出 CSV（每层一行）或 XY（连续剖面）
//!
//! ## 依赖关系
//! - 使用 `cli/attenuation.rs` 定义的 LayersArgs
//! - 使用 `attenuation/` 计算、绘图与导出

use crate::attenuation::plot::{LayerBand, ProfileChart};
use crate::attenuation::{calculator, export, plot};
use crate::cli::attenuation::{LayersArgs, OutputFormat};
use crate::commands::common::{self, fmt_number, format_energy};
use crate::error::Result;
use crate::models::{total_thickness, Beam, Layer};
use crate::utils::output;

use std::path::{Path, PathBuf};
use tabled::Tabled;

/// 剖面表格行
#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "Thickness (cm)")]
    thickness: String,
    #[tabled(rename = "Depth (cm)")]
    depth: String,
    #[tabled(rename = "μ (1/cm)")]
    mu: String,
    #[tabled(rename = "Intensity")]
    intensity: String,
    #[tabled(rename = "I/I0")]
    fraction: String,
}

/// 执行 layers 命令
pub fn execute(args: LayersArgs) -> Result<()> {
    output::print_header("Layered Tissue Attenuation");

    let table = common::load_table(&args.table)?;
    let specs = common::load_layer_specs(&args.path)?;
    let layers = table.resolve(&specs)?;
    let energy = common::energy(&args.energy)?;

    output::print_info(&format!(
        "Beam path: {} (total {} cm)",
        common::describe_layers(&layers),
        fmt_number(total_thickness(&layers))
    ));
    output::print_info(&format!(
        "Beam energy: {} ({} MeV), I0 = {}",
        format_energy(energy),
        energy,
        args.intensity
    ));

    let beam = Beam::new(args.intensity, energy);
    let transmission = beam.transmit(&layers)?;

    print_layer_table(&layers, &transmission, energy)?;

    output::print_separator();
    output::print_result("Transmitted intensity", &format!("{:.6e}", transmission.final_intensity));
    output::print_result("Transmitted fraction", &format!("{:.6e}", transmission.fraction()));
    output::print_result("Optical depth", &format!("{:.4}", transmission.optical_depth()));
    output::print_separator();

    let profile =
        calculator::continuous_profile(beam.intensity, &layers, energy, args.points_per_layer)?;

    let format = common::resolve_format(&args.plot, &args.output);
    match format {
        OutputFormat::Png | OutputFormat::Svg => {
            let boundaries = calculator::layer_boundaries(beam.intensity, &layers, energy)?;
            let bands = layer_bands(&layers);
            let title = args.plot.title.clone().unwrap_or_else(|| {
                format!(
                    "X-ray Attenuation Through Layered Tissues ({})",
                    format_energy(energy)
                )
            });

            plot::generate_profile_plot(
                &ProfileChart {
                    title: &title,
                    initial: beam.intensity,
                    profile: &profile,
                    boundaries: &boundaries,
                    bands: &bands,
                },
                &args.output,
                common::plot_options(&args.plot, format),
            )?;
        }
        OutputFormat::Csv => {
            export::rows_to_csv(&common::profile_rows(&layers, &transmission), &args.output)?;

            // 连续剖面另存为 <stem>_continuous.csv
            let continuous = continuous_path(&args.output);
            export::points_to_csv(["depth_cm", "intensity"], &profile, &continuous)?;
            output::print_success(&format!(
                "Continuous profile saved to '{}'",
                continuous.display()
            ));
        }
        OutputFormat::Xy => {
            let header = vec![
                format!("Layered attenuation: {}", common::describe_layers(&layers)),
                format!("Energy: {} MeV, I0: {}", energy, beam.intensity),
                "Columns: depth (cm), intensity".to_string(),
            ];
            export::to_xy(&header, &profile, &args.output)?;
        }
    }

    output::print_success(&format!("Profile saved to '{}'", args.output.display()));
    Ok(())
}

fn continuous_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("layered_attenuation");
    output.with_file_name(format!("{}_continuous.csv", stem))
}

fn layer_bands(layers: &[Layer<'_>]) -> Vec<LayerBand> {
    let mut start = 0.0;
    layers
        .iter()
        .map(|layer| {
            let band = LayerBand {
                material: layer.material.name().to_string(),
                start,
                end: start + layer.thickness,
            };
            start = band.end;
            band
        })
        .collect()
}

/// 打印每层强度表格
fn print_layer_table(
    layers: &[Layer<'_>],
    transmission: &calculator::Transmission,
    energy: f64,
) -> Result<()> {
    let rows = common::profile_rows(layers, transmission)
        .into_iter()
        .zip(layers)
        .map(|(row, layer)| {
            Ok(LayerRow {
                index: row.layer,
                material: row.material,
                thickness: fmt_number(row.thickness_cm),
                depth: fmt_number(row.depth_cm),
                mu: format!(
                    "{:.5}",
                    calculator::linear_attenuation_coefficient(layer.material, energy)?
                ),
                intensity: format!("{:.6e}", row.intensity),
                fraction: format!("{:.6e}", row.fraction),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    output::print_table("Intensity After Each Layer", &rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaterialTable;
    use crate::parsers::layers::parse_layer_spec;

    #[test]
    fn test_continuous_path() {
        assert_eq!(
            continuous_path(Path::new("out/profile.csv")),
            PathBuf::from("out/profile_continuous.csv")
        );
    }

    #[test]
    fn test_layer_bands_are_contiguous() {
        let table = MaterialTable::builtin().unwrap();
        let layers = table
            .resolve(&parse_layer_spec("air:5,soft_tissue:10,bone:2").unwrap())
            .unwrap();
        let bands = layer_bands(&layers);
        assert_eq!(bands.len(), 3);
        assert_eq!((bands[0].start, bands[0].end), (0.0, 5.0));
        assert_eq!((bands[1].start, bands[1].end), (5.0, 15.0));
        assert_eq!(bands[2].end, 17.0);
        assert_eq!(bands[2].material, "bone");
    }
}
