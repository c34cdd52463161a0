//! # batch 子命令 CLI 定义
//!
//! 批量计算目录中的场景文件，每个场景输出一个剖面 CSV。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use crate::cli::attenuation::TableArgs;

use clap::Args;
use std::path::PathBuf;

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input directory containing scenario CSV files
    pub input: PathBuf,

    /// Output directory for per-scenario profile CSV files
    #[arg(short, long, default_value = "profiles")]
    pub output: PathBuf,

    /// Beam energy (MeV or with keV/MeV unit)
    #[arg(short, long, default_value = "0.1")]
    pub energy: String,

    /// Initial beam intensity I0
    #[arg(long, default_value_t = 1000.0)]
    pub intensity: f64,

    /// Glob pattern for scenario files (comma separated)
    #[arg(short, long, default_value = "*.csv")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    #[command(flatten)]
    pub table: TableArgs,
}
