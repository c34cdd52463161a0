//! # sweep 子命令实现
//!
//! 同一层序列在多个能量下的最终透射强度。
//!
//! ## 依赖关系
//! - 使用 `cli/attenuation.rs` 定义的 SweepArgs
//! - 使用 `batch/runner.rs` 控制 rayon 线程数
//! - 使用 `attenuation/calculator.rs`、`plot.rs`、`export.rs`

use crate::attenuation::plot::Series;
use crate::attenuation::{calculator, export, plot, Sweep};
use crate::batch::BatchRunner;
use crate::cli::attenuation::{OutputFormat, SweepArgs};
use crate::commands::common::{self, format_energy};
use crate::error::Result;
use crate::utils::output;

use tabled::Tabled;

#[derive(Tabled)]
struct SweepRow {
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "Final intensity")]
    intensity: String,
    #[tabled(rename = "I/I0")]
    fraction: String,
    #[tabled(rename = "Optical depth")]
    optical_depth: String,
}

/// 执行 sweep 命令
pub fn execute(args: SweepArgs) -> Result<()> {
    output::print_header("Energy Sweep");

    let table = common::load_table(&args.table)?;
    let specs = common::load_layer_specs(&args.path)?;
    let layers = table.resolve(&specs)?;
    let energies = common::energies(&args.energies)?;

    output::print_info(&format!("Beam path: {}", common::describe_layers(&layers)));

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Evaluating {} energies with {} threads",
        energies.len(),
        runner.jobs()
    ));

    let sweep = runner.install(|| {
        calculator::attenuation_sweep(args.intensity, &layers, &energies)
    })??;

    print_sweep_table(&sweep);

    let format = common::resolve_format(&args.plot, &args.output);
    match format {
        OutputFormat::Png | OutputFormat::Svg => {
            let series = vec![Series {
                label: common::describe_layers(&layers),
                points: fraction_points(&sweep),
            }];
            let title = args
                .plot
                .title
                .clone()
                .unwrap_or_else(|| "Transmitted Fraction vs Beam Energy".to_string());
            plot::generate_energy_plot(
                &series,
                &title,
                "Transmitted fraction (I/I0)",
                &args.output,
                common::plot_options(&args.plot, format),
            )?;
        }
        OutputFormat::Csv => export::sweep_to_csv(&sweep, &args.output)?,
        OutputFormat::Xy => {
            let header = vec![
                format!("Energy sweep: {}", common::describe_layers(&layers)),
                format!("I0: {}", sweep.initial),
                "Columns: energy (MeV), transmitted fraction".to_string(),
            ];
            export::to_xy(&header, &fraction_points(&sweep), &args.output)?;
        }
    }

    output::print_success(&format!("Sweep saved to '{}'", args.output.display()));
    Ok(())
}

/// (能量, I/I0)，按能量升序
fn fraction_points(sweep: &Sweep) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = sweep
        .points
        .iter()
        .map(|(e, i)| (*e, i / sweep.initial))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

fn print_sweep_table(sweep: &Sweep) {
    let rows: Vec<SweepRow> = sweep
        .points
        .iter()
        .map(|(energy, intensity)| {
            let fraction = intensity / sweep.initial;
            SweepRow {
                energy: format_energy(*energy),
                intensity: format!("{:.6e}", intensity),
                fraction: format!("{:.6e}", fraction),
                optical_depth: if fraction > 0.0 {
                    format!("{:.4}", -fraction.ln())
                } else {
                    "∞".to_string()
                },
            }
        })
        .collect();

    output::print_table("Transmission per Energy", &rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_points_sorted_by_energy() {
        let sweep = Sweep {
            initial: 10.0,
            points: vec![(1.0, 5.0), (0.1, 1.0), (10.0, 8.0)],
        };
        let points = fraction_points(&sweep);
        assert_eq!(points, vec![(0.1, 0.1), (1.0, 0.5), (10.0, 0.8)]);
    }
}
