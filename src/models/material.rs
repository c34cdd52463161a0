//! # 材料参考数据模型
//!
//! 定义组织材料（骨、软组织、空气等）及其质量衰减系数表。
//!
//! ## 约定
//! - 能量单位：MeV
//! - 质量衰减系数 μ/ρ：cm²/g
//! - 密度 ρ：g/cm³
//! - 线性衰减系数 μ：cm⁻¹
//!
//! ## 插值策略
//! 在相邻表格能量点之间线性插值；不外推，超出表格范围直接报错。
//!
//! ## 依赖关系
//! - 被 `attenuation/`、`parsers/`、`radiograph/` 使用
//! - 材料表在加载后只读，显式传递，不作为全局状态

use crate::error::{Result, XattenError};
use crate::models::layer::{Layer, LayerSpec};

use std::collections::BTreeMap;

/// 单一材料
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// 材料标识（如 "bone"）
    name: String,
    /// 密度（g/cm³）
    density: f64,
    /// 表格能量点（MeV，严格递增）
    energies: Vec<f64>,
    /// 各能量点的质量衰减系数（cm²/g）
    mass_attenuation: Vec<f64>,
}

impl Material {
    /// 创建并校验材料
    pub fn new(
        name: impl Into<String>,
        density: f64,
        energies: Vec<f64>,
        mass_attenuation: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();

        if !density.is_finite() || density <= 0.0 {
            return Err(XattenError::InvalidDensity {
                material: name,
                density,
            });
        }

        if energies.is_empty() {
            return Err(XattenError::InvalidTable(format!(
                "material '{}' has no tabulated energies",
                name
            )));
        }

        if energies.len() != mass_attenuation.len() {
            return Err(XattenError::InvalidTable(format!(
                "material '{}' has {} energies but {} coefficients",
                name,
                energies.len(),
                mass_attenuation.len()
            )));
        }

        if energies.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(XattenError::InvalidTable(format!(
                "material '{}' has a non-positive or non-finite energy",
                name
            )));
        }

        if energies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(XattenError::InvalidTable(format!(
                "energies of material '{}' must be strictly increasing",
                name
            )));
        }

        for (&energy, &value) in energies.iter().zip(&mass_attenuation) {
            if !value.is_finite() || value < 0.0 {
                return Err(XattenError::InvalidCoefficient {
                    material: name,
                    energy,
                    value,
                });
            }
        }

        Ok(Self {
            name,
            density,
            energies,
            mass_attenuation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn mass_attenuation_points(&self) -> &[f64] {
        &self.mass_attenuation
    }

    /// 表格能量范围 (min, max)
    pub fn energy_domain(&self) -> (f64, f64) {
        // new() 保证至少一个能量点
        (self.energies[0], self.energies[self.energies.len() - 1])
    }

    /// 指定能量下的质量衰减系数 μ/ρ（线性插值，禁止外推）
    pub fn mass_attenuation(&self, energy: f64) -> Result<f64> {
        let (min, max) = self.energy_domain();

        if !energy.is_finite() || energy < min || energy > max {
            return Err(XattenError::UnknownEnergy {
                material: self.name.clone(),
                energy,
                min,
                max,
            });
        }

        // 第一个 >= energy 的表格点
        let upper = self.energies.partition_point(|&e| e < energy);
        if self.energies[upper] == energy || upper == 0 {
            return Ok(self.mass_attenuation[upper]);
        }

        let lower = upper - 1;
        let (e0, e1) = (self.energies[lower], self.energies[upper]);
        let (m0, m1) = (self.mass_attenuation[lower], self.mass_attenuation[upper]);
        let t = (energy - e0) / (e1 - e0);

        Ok(m0 + t * (m1 - m0))
    }
}

/// 材料系数表
///
/// 按标识索引的一组材料，显式传给每个需要它的计算。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    materials: BTreeMap<String, Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入材料；同名材料已存在时报错
    pub fn insert(&mut self, material: Material) -> Result<()> {
        if self.materials.contains_key(material.name()) {
            return Err(XattenError::InvalidTable(format!(
                "duplicate material '{}'",
                material.name()
            )));
        }
        self.materials.insert(material.name().to_string(), material);
        Ok(())
    }

    /// 按标识查找材料
    pub fn get(&self, name: &str) -> Result<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| XattenError::UnknownMaterial(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// 将解析得到的层描述解析为引用本表材料的层序列
    pub fn resolve(&self, specs: &[LayerSpec]) -> Result<Vec<Layer<'_>>> {
        specs
            .iter()
            .map(|spec| Ok(Layer::new(self.get(&spec.material)?, spec.thickness)))
            .collect()
    }
}
