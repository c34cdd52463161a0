//! # setup 子命令 CLI 定义
//!
//! 生成交给外部射线成像渲染器的场景参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/setup.rs`

use crate::cli::attenuation::TableArgs;
use crate::radiograph::setup::DEFAULT_TUBE_VOLTAGE_KEV;
use crate::radiograph::ModelSize;

use clap::Args;
use std::path::PathBuf;

fn parse_model_size(input: &str) -> Result<ModelSize, String> {
    input.parse::<ModelSize>().map_err(|e| e.to_string())
}

/// 管电压（keV）：纯数字按 keV 解析，也接受 keV/MeV 后缀
fn parse_tube_voltage(input: &str) -> Result<f64, String> {
    let text = input.trim().to_lowercase();
    let (number, kev_per_unit) = if let Some(v) = text.strip_suffix("kev") {
        (v, 1.0)
    } else if let Some(v) = text.strip_suffix("mev") {
        (v, 1000.0)
    } else {
        (text.as_str(), 1.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("Invalid tube voltage '{}' (e.g., 80 or 80keV)", input))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("Tube voltage must be > 0, got '{}'", input));
    }
    Ok(value * kev_per_unit)
}

/// setup 子命令参数
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Anatomical model size preset: small or large
    #[arg(short, long, default_value = "small", value_parser = parse_model_size)]
    pub size: ModelSize,

    /// Tube voltage of the monochromatic beam (keV, or with keV/MeV unit)
    #[arg(
        short = 'v',
        long,
        default_value_t = DEFAULT_TUBE_VOLTAGE_KEV,
        value_parser = parse_tube_voltage
    )]
    pub tube_voltage: f64,

    /// Directory holding the STL meshes
    #[arg(long, default_value = "Data")]
    pub data_dir: PathBuf,

    /// Write the setup as JSON to this file (printed to stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub table: TableArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tube_voltage() {
        assert_eq!(parse_tube_voltage("80").unwrap(), 80.0);
        assert_eq!(parse_tube_voltage("120keV").unwrap(), 120.0);
        assert!((parse_tube_voltage("0.15MeV").unwrap() - 150.0).abs() < 1e-9);
        assert!(parse_tube_voltage("hot").is_err());
        assert!(parse_tube_voltage("-80").is_err());
    }

    #[test]
    fn test_parse_model_size() {
        assert_eq!(parse_model_size("large").unwrap(), ModelSize::Large);
        assert!(parse_model_size("huge").is_err());
    }
}
