//! # 命令共享逻辑
//!
//! 系数表加载、层序列读取、输出格式推断与数值格式化。
//!
//! ## 依赖关系
//! - 被 `commands/` 下各子命令使用
//! - 使用 `parsers/`、`attenuation/`

use crate::attenuation::export::ProfileRow;
use crate::attenuation::plot::PlotOptions;
use crate::attenuation::Transmission;
use crate::cli::attenuation::{
    parse_energy, parse_energy_list, OutputFormat, PathArgs, PlotArgs, TableArgs,
};
use crate::error::{Result, XattenError};
use crate::models::{Layer, LayerSpec, MaterialTable};
use crate::parsers;
use crate::utils::output;

use std::path::Path;

/// 加载系数表并报告来源
pub fn load_table(args: &TableArgs) -> Result<MaterialTable> {
    let table = parsers::load_table(args.table.as_deref())?;
    match &args.table {
        Some(path) => output::print_info(&format!(
            "Loaded coefficient table '{}' ({} materials)",
            path.display(),
            table.len()
        )),
        None => output::print_info("Using built-in coefficient table (bone, soft_tissue, air)"),
    }
    Ok(table)
}

/// 读取层描述（命令行或场景文件）
pub fn load_layer_specs(args: &PathArgs) -> Result<Vec<LayerSpec>> {
    match (&args.layers, &args.scenario) {
        (Some(spec), _) => parsers::layers::parse_layer_spec(spec),
        (None, Some(path)) => parsers::layers::parse_scenario_file(path),
        (None, None) => Err(XattenError::InvalidArgument(
            "either --layers or --scenario is required".to_string(),
        )),
    }
}

pub fn energy(input: &str) -> Result<f64> {
    parse_energy(input).map_err(|_| XattenError::InvalidEnergy(input.to_string()))
}

pub fn energies(input: &str) -> Result<Vec<f64>> {
    parse_energy_list(input).map_err(XattenError::InvalidArgument)
}

/// 从文件扩展名推断输出格式
pub fn guess_format_from_extension(path: &Path) -> OutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => OutputFormat::Svg,
        Some("csv") => OutputFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => OutputFormat::Xy,
        _ => OutputFormat::Png,
    }
}

pub fn resolve_format(args: &PlotArgs, output: &Path) -> OutputFormat {
    args.format.unwrap_or_else(|| guess_format_from_extension(output))
}

pub fn plot_options(args: &PlotArgs, format: OutputFormat) -> PlotOptions {
    PlotOptions {
        width: args.width,
        height: args.height,
        svg: format == OutputFormat::Svg,
    }
}

/// 解析厚度范围 (e.g., "0-10")
pub fn parse_range(range: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = range.split('-').collect();
    if parts.len() != 2 {
        return Err(XattenError::InvalidRange(range.to_string()));
    }

    let min: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| XattenError::InvalidRange(range.to_string()))?;
    let max: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| XattenError::InvalidRange(range.to_string()))?;

    if min < 0.0 || max <= min {
        return Err(XattenError::InvalidRange(format!(
            "{} (must be 0 <= min < max)",
            range
        )));
    }

    Ok((min, max))
}

/// 等距网格（含两端）
pub fn linspace(min: f64, max: f64, points: usize) -> Result<Vec<f64>> {
    if points < 2 {
        return Err(XattenError::InvalidArgument(format!(
            "at least 2 sample points are required, got {}",
            points
        )));
    }
    let step = (max - min) / (points - 1) as f64;
    Ok((0..points)
        .map(|i| if i == points - 1 { max } else { min + i as f64 * step })
        .collect())
}

/// 去掉多余小数位的数值格式
pub fn fmt_number(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// 能量显示：< 1 MeV 用 keV
pub fn format_energy(energy_mev: f64) -> String {
    if energy_mev < 1.0 {
        format!("{} keV", fmt_number(energy_mev * 1000.0))
    } else {
        format!("{} MeV", fmt_number(energy_mev))
    }
}

/// 层序列的一行描述
pub fn describe_layers(layers: &[Layer<'_>]) -> String {
    layers
        .iter()
        .map(|l| format!("{} {} cm", l.material.name(), fmt_number(l.thickness)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// 每层之后的剖面行
pub fn profile_rows(layers: &[Layer<'_>], transmission: &Transmission) -> Vec<ProfileRow> {
    let mut depth = 0.0;
    layers
        .iter()
        .zip(&transmission.after_layer)
        .enumerate()
        .map(|(i, (layer, intensity))| {
            depth += layer.thickness;
            ProfileRow {
                layer: i + 1,
                material: layer.material.name().to_string(),
                thickness_cm: layer.thickness,
                depth_cm: depth,
                intensity: *intensity,
                fraction: intensity / transmission.initial,
            }
        })
        .collect()
}
