//! # 衰减计算模块
//!
//! 提供分层组织 X 射线衰减的计算、绘图与导出功能。
//!
//! ## 子模块
//! - `coefficients`: 内置质量衰减系数表
//! - `calculator`: Beer-Lambert 分层衰减计算
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `radiograph/` 使用
//! - 使用 `models/` 的 Material, Layer

pub mod calculator;
pub mod coefficients;
pub mod export;
pub mod plot;

pub use calculator::{Sweep, Transmission};
