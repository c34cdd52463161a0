//! # 组织层与射线束模型
//!
//! 一条射线路径由有序的组织层组成，每层引用一种材料并给出厚度（cm）。
//!
//! ## 依赖关系
//! - 被 `attenuation/calculator.rs` 使用
//! - 使用 `models/material.rs` 的 Material

use crate::attenuation::calculator::{self, Transmission};
use crate::error::Result;
use crate::models::Material;

use serde::{Deserialize, Serialize};

/// 组织层：材料引用 + 厚度（cm）
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    pub material: &'a Material,
    pub thickness: f64,
}

impl<'a> Layer<'a> {
    pub fn new(material: &'a Material, thickness: f64) -> Self {
        Self {
            material,
            thickness,
        }
    }
}

/// 尚未解析到材料表的层描述（材料名 + 厚度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub material: String,
    #[serde(rename = "thickness_cm")]
    pub thickness: f64,
}

impl LayerSpec {
    pub fn new(material: impl Into<String>, thickness: f64) -> Self {
        Self {
            material: material.into(),
            thickness,
        }
    }
}

/// 单能射线束
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    /// 初始强度 I0（任意正单位）
    pub intensity: f64,
    /// 能量（MeV）
    pub energy: f64,
}

impl Beam {
    pub fn new(intensity: f64, energy: f64) -> Self {
        Self { intensity, energy }
    }

    /// 射线束穿过层序列后的透射结果
    pub fn transmit(&self, layers: &[Layer<'_>]) -> Result<Transmission> {
        calculator::transmitted_intensity(self.intensity, layers, self.energy)
    }
}

/// 层序列总厚度（cm）
pub fn total_thickness(layers: &[Layer<'_>]) -> f64 {
    layers.iter().map(|l| l.thickness).sum()
}
