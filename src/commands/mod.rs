//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `attenuation/`, `utils/`
//! - 子模块: curve, layers, sweep, contrast, materials, setup, batch

pub mod batch;
pub mod common;
pub mod contrast;
pub mod curve;
pub mod layers;
pub mod materials;
pub mod setup;
pub mod sweep;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Curve(args) => curve::execute(args),
        Commands::Layers(args) => layers::execute(args),
        Commands::Sweep(args) => sweep::execute(args),
        Commands::Contrast(args) => contrast::execute(args),
        Commands::Materials(args) => materials::execute(args),
        Commands::Setup(args) => setup::execute(args),
        Commands::Batch(args) => batch::execute(args),
    }
}
