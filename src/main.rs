//! # xatten - 分层组织 X 射线衰减工具
//!
//! 按 Beer-Lambert 定律计算单能 X 射线穿过分层组织后的强度，
//! 并生成曲线图、数据文件与射线成像场景参数。
//!
//! ## 子命令
//! - `curve`     - 单一材料透射强度随厚度变化
//! - `layers`    - 分层路径的深度剖面
//! - `sweep`     - 同一路径在多个能量下的透射
//! - `contrast`  - 背景/特征路径的对比度
//! - `materials` - 查看系数表
//! - `setup`     - 射线成像场景参数
//! - `batch`     - 批量计算场景文件
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/         (命令行参数定义)
//!   ├── commands/    (命令执行逻辑)
//!   │     ├── attenuation/ (衰减计算、绘图、导出)
//!   │     ├── parsers/     (系数表与层序列解析)
//!   │     ├── radiograph/  (成像场景预设)
//!   │     ├── batch/       (并行批处理)
//!   │     └── models/      (材料与层模型)
//!   ├── utils/       (工具函数)
//!   └── error.rs     (错误处理)
//! ```

mod attenuation;
mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod radiograph;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
