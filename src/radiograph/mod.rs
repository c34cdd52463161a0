//! # 射线成像场景模块
//!
//! 为外部射线成像渲染器准备场景参数。
//!
//! ## 依赖关系
//! - 被 `commands/setup.rs` 使用
//! - 子模块: setup

pub mod setup;

pub use setup::{ModelSize, RadiographSetup};
