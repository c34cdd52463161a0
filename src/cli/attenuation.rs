//! # 衰减计算子命令 CLI 定义
//!
//! `curve`、`layers`、`sweep`、`contrast`、`materials` 的参数，
//! 以及共享的系数表、绘图参数与能量解析。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/` 相应模块

use clap::{Args, ValueEnum};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 系数表来源
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Coefficient table CSV (material,density,energy_mev,mass_attenuation).
    /// The built-in table is used if omitted
    #[arg(long, env = "XATTEN_TABLE")]
    pub table: Option<PathBuf>,
}

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file
    Csv,
    /// XY data file (tab separated, '#' header)
    Xy,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Csv => "csv",
            OutputFormat::Xy => "xy",
        }
    }
}

/// 图像尺寸与格式
#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Title for the plot
    #[arg(long)]
    pub title: Option<String>,
}

/// 层序列来源（二选一）
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PathArgs {
    /// Layer stack, e.g. "air:5,soft_tissue:10,bone:2" (thickness in cm)
    #[arg(short, long)]
    pub layers: Option<String>,

    /// Scenario CSV file with columns material,thickness_cm
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
}

/// 解析能量（带单位 keV/MeV，纯数字按 MeV），返回 MeV
pub fn parse_energy(input: &str) -> Result<f64, String> {
    let text = input.trim().to_lowercase();
    let (number, per_mev) = if let Some(v) = text.strip_suffix("kev") {
        (v, 1000.0)
    } else if let Some(v) = text.strip_suffix("mev") {
        (v, 1.0)
    } else {
        (text.as_str(), 1.0)
    };

    let value: f64 = number.trim().parse().map_err(|_| {
        format!(
            "Invalid energy '{}'. Use a number in MeV (e.g., 0.1) or a value with unit (e.g., 100keV, 0.1MeV)",
            input
        )
    })?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("Energy must be > 0, got '{}'", input));
    }

    Ok(value / per_mev)
}

/// 解析逗号分隔的能量列表
pub fn parse_energy_list(input: &str) -> Result<Vec<f64>, String> {
    let energies = input
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_energy)
        .collect::<Result<Vec<_>, _>>()?;

    if energies.is_empty() {
        return Err("At least one energy is required".to_string());
    }
    Ok(energies)
}

// ─────────────────────────────────────────────────────────────
// curve 子命令
// ─────────────────────────────────────────────────────────────

/// curve 子命令参数
#[derive(Args, Debug)]
pub struct CurveArgs {
    /// Materials to plot (comma separated)
    #[arg(short, long, default_value = "bone,soft_tissue,air")]
    pub materials: String,

    /// Beam energies (comma separated, MeV or with keV/MeV unit)
    #[arg(short, long, default_value = "0.1,1,10,20")]
    pub energies: String,

    /// Thickness range in cm (e.g., "0-10")
    #[arg(short, long, default_value = "0-10")]
    pub range: String,

    /// Number of thickness samples
    #[arg(long, default_value_t = 200)]
    pub points: usize,

    /// Initial beam intensity I0
    #[arg(long, default_value_t = 1.0)]
    pub intensity: f64,

    /// Output directory (one file per material)
    #[arg(short, long, default_value = "curves")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,

    #[command(flatten)]
    pub table: TableArgs,
}

// ─────────────────────────────────────────────────────────────
// layers 子命令
// ─────────────────────────────────────────────────────────────

/// layers 子命令参数
#[derive(Args, Debug)]
pub struct LayersArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// Beam energy (MeV or with keV/MeV unit)
    #[arg(short, long, default_value = "0.1")]
    pub energy: String,

    /// Initial beam intensity I0
    #[arg(long, default_value_t = 1000.0)]
    pub intensity: f64,

    /// Samples per layer for the continuous profile
    #[arg(long, default_value_t = 50)]
    pub points_per_layer: usize,

    /// Output file (chart or data)
    #[arg(short, long, default_value = "layered_attenuation.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,

    #[command(flatten)]
    pub table: TableArgs,
}

// ─────────────────────────────────────────────────────────────
// sweep 子命令
// ─────────────────────────────────────────────────────────────

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// Beam energies (comma separated, MeV or with keV/MeV unit)
    #[arg(short, long, default_value = "30keV,50keV,80keV,100keV,150keV,0.5,1,10")]
    pub energies: String,

    /// Initial beam intensity I0
    #[arg(long, default_value_t = 1.0)]
    pub intensity: f64,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Output file (chart or data)
    #[arg(short, long, default_value = "energy_sweep.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,

    #[command(flatten)]
    pub table: TableArgs,
}

// ─────────────────────────────────────────────────────────────
// contrast 子命令
// ─────────────────────────────────────────────────────────────

/// contrast 子命令参数
#[derive(Args, Debug)]
pub struct ContrastArgs {
    /// Background path, e.g. "soft_tissue:10"
    #[arg(long)]
    pub background: String,

    /// Feature path, e.g. "soft_tissue:8,bone:2"
    #[arg(long)]
    pub feature: String,

    /// Beam energies (comma separated, MeV or with keV/MeV unit)
    #[arg(short, long, default_value = "30keV,50keV,80keV,100keV,150keV,0.5,1,10")]
    pub energies: String,

    /// Output file (chart or data)
    #[arg(short, long, default_value = "contrast.png")]
    pub output: PathBuf,

    #[command(flatten)]
    pub plot: PlotArgs,

    #[command(flatten)]
    pub table: TableArgs,
}

// ─────────────────────────────────────────────────────────────
// materials 子命令
// ─────────────────────────────────────────────────────────────

/// materials 子命令参数
#[derive(Args, Debug)]
pub struct MaterialsArgs {
    /// Also show interpolated coefficients at this energy
    #[arg(short, long)]
    pub energy: Option<String>,

    #[command(flatten)]
    pub table: TableArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_energy_units() {
        assert_eq!(parse_energy("0.1").unwrap(), 0.1);
        assert_eq!(parse_energy("0.1MeV").unwrap(), 0.1);
        assert_eq!(parse_energy(" 2 mev ").unwrap(), 2.0);
        assert_eq!(parse_energy("100keV").unwrap(), 0.1);
        assert!((parse_energy("30 KeV").unwrap() - 0.03).abs() < 1e-15);
    }

    #[test]
    fn test_parse_energy_errors() {
        assert!(parse_energy("abc").is_err());
        assert!(parse_energy("0").is_err());
        assert!(parse_energy("-5keV").is_err());
        assert!(parse_energy("keV").is_err());
    }

    #[test]
    fn test_parse_energy_list() {
        let list = parse_energy_list("0.1, 1,80keV").unwrap();
        assert_eq!(list.len(), 3);
        assert!((list[2] - 0.08).abs() < 1e-15);
        assert!(parse_energy_list(" , ").is_err());
        assert!(parse_energy_list("0.1,x").is_err());
    }
}
