//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `curve`: 单一材料透射强度-厚度曲线
//! - `layers`: 分层组织深度剖面
//! - `sweep`: 能量扫描
//! - `contrast`: 背景/特征路径对比度
//! - `materials`: 查看系数表
//! - `setup`: 射线成像场景参数
//! - `batch`: 批量计算场景文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: attenuation, batch, setup

pub mod attenuation;
pub mod batch;
pub mod setup;

use clap::{Parser, Subcommand};

/// xatten - 分层组织 X 射线衰减工具
#[derive(Parser)]
#[command(name = "xatten")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Layered X-ray attenuation through tissue (Beer-Lambert)", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Plot transmitted intensity vs thickness for single materials
    Curve(attenuation::CurveArgs),

    /// Compute the intensity profile through a stack of tissue layers
    Layers(attenuation::LayersArgs),

    /// Compare final transmitted intensity across beam energies
    Sweep(attenuation::SweepArgs),

    /// Compute subject contrast between a background and a feature path
    Contrast(attenuation::ContrastArgs),

    /// Show the mass attenuation coefficient table in use
    Materials(attenuation::MaterialsArgs),

    /// Emit the radiograph simulation setup (source, detector, meshes)
    Setup(setup::SetupArgs),

    /// Evaluate a directory of scenario files in parallel
    Batch(batch::BatchArgs),
}
