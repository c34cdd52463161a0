//! # contrast 子命令实现
//!
//! 背景路径与特征路径（如含骨组织）在各能量下的对比度
//! C = (I_background - I_feature) / I_background。
//!
//! ## 依赖关系
//! - 使用 `cli/attenuation.rs` 定义的 ContrastArgs
//! - 使用 `parsers/layers.rs` 解析两条路径
//! - 使用 `attenuation/calculator.rs`、`plot.rs`、`export.rs`

use crate::attenuation::export::ContrastRow;
use crate::attenuation::plot::Series;
use crate::attenuation::{calculator, export, plot};
use crate::cli::attenuation::{ContrastArgs, OutputFormat};
use crate::commands::common::{self, format_energy};
use crate::error::Result;
use crate::models::{Beam, Layer};
use crate::parsers::layers::parse_layer_spec;
use crate::utils::output;

use tabled::Tabled;

#[derive(Tabled)]
struct ContrastTableRow {
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "Background I/I0")]
    background: String,
    #[tabled(rename = "Feature I/I0")]
    feature: String,
    #[tabled(rename = "Contrast")]
    contrast: String,
}

/// 执行 contrast 命令
pub fn execute(args: ContrastArgs) -> Result<()> {
    output::print_header("Subject Contrast");

    let table = common::load_table(&args.table)?;
    let background = table.resolve(&parse_layer_spec(&args.background)?)?;
    let feature = table.resolve(&parse_layer_spec(&args.feature)?)?;
    let energies = common::energies(&args.energies)?;

    output::print_info(&format!("Background: {}", common::describe_layers(&background)));
    output::print_info(&format!("Feature:    {}", common::describe_layers(&feature)));

    let rows = contrast_rows(&background, &feature, &energies)?;

    let table_rows: Vec<ContrastTableRow> = rows
        .iter()
        .map(|r| ContrastTableRow {
            energy: format_energy(r.energy_mev),
            background: format!("{:.6e}", r.background),
            feature: format!("{:.6e}", r.feature),
            contrast: format!("{:.4}", r.contrast),
        })
        .collect();
    output::print_table("Contrast per Energy", &table_rows);

    if let Some(best) = rows
        .iter()
        .filter(|r| r.contrast.is_finite())
        .max_by(|a, b| a.contrast.total_cmp(&b.contrast))
    {
        output::print_result(
            "Highest contrast",
            &format!("{:.4} at {}", best.contrast, format_energy(best.energy_mev)),
        );
    }

    let format = common::resolve_format(&args.plot, &args.output);
    match format {
        OutputFormat::Png | OutputFormat::Svg => {
            let mut sorted = rows.clone();
            sorted.sort_by(|a, b| a.energy_mev.total_cmp(&b.energy_mev));
            let column = |f: fn(&ContrastRow) -> f64| -> Vec<(f64, f64)> {
                sorted.iter().map(|r| (r.energy_mev, f(r))).collect()
            };
            let series = vec![
                Series {
                    label: "Background I/I0".to_string(),
                    points: column(|r| r.background),
                },
                Series {
                    label: "Feature I/I0".to_string(),
                    points: column(|r| r.feature),
                },
                Series {
                    label: "Contrast".to_string(),
                    points: column(|r| r.contrast),
                },
            ];
            let title = args
                .plot
                .title
                .clone()
                .unwrap_or_else(|| "Subject Contrast vs Beam Energy".to_string());
            plot::generate_energy_plot(
                &series,
                &title,
                "Fraction",
                &args.output,
                common::plot_options(&args.plot, format),
            )?;
        }
        OutputFormat::Csv => export::rows_to_csv(&rows, &args.output)?,
        OutputFormat::Xy => {
            let header = vec![
                format!("Background: {}", common::describe_layers(&background)),
                format!("Feature: {}", common::describe_layers(&feature)),
                "Columns: energy (MeV), contrast".to_string(),
            ];
            let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.energy_mev, r.contrast)).collect();
            export::to_xy(&header, &points, &args.output)?;
        }
    }

    output::print_success(&format!("Contrast saved to '{}'", args.output.display()));
    Ok(())
}

/// 每个能量一行（保持输入顺序）
fn contrast_rows(
    background: &[Layer<'_>],
    feature: &[Layer<'_>],
    energies: &[f64],
) -> Result<Vec<ContrastRow>> {
    energies
        .iter()
        .map(|&energy| {
            let beam = Beam::new(1.0, energy);
            let bg = beam.transmit(background)?;
            let ft = beam.transmit(feature)?;
            Ok(ContrastRow {
                energy_mev: energy,
                background: bg.fraction(),
                feature: ft.fraction(),
                contrast: calculator::contrast(&bg, &ft),
            })
        })
        .collect()
}
