//! # 数据模型模块
//!
//! 定义材料、材料系数表、组织层与射线束。
//!
//! ## 依赖关系
//! - 被 `attenuation/`、`parsers/` 和 `commands/` 使用
//! - 子模块: material, layer

pub mod layer;
pub mod material;

pub use layer::{total_thickness, Beam, Layer, LayerSpec};
pub use material::{Material, MaterialTable};
