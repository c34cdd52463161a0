//! # 分层衰减计算器
//!
//! 用 Beer-Lambert 定律计算单能 X 射线穿过有序组织层后的透射强度。
//!
//! ## 算法概述
//! 1. 校验初始强度 I0 与每层厚度（在任何指数运算之前）
//! 2. 求每层材料在给定能量下的线性衰减系数 μ = (μ/ρ) × ρ
//! 3. 对层序列做一次左折叠：I_i = I_(i-1) · exp(-μ_i · t_i)
//!
//! 所有函数都是输入的纯函数，可并发调用；能量扫描用 rayon 并行求值。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/` 调用
//! - 使用 `models/` 的 Material, Layer

use crate::error::{Result, XattenError};
use crate::models::{Layer, Material};

use rayon::prelude::*;

/// 透射结果
#[derive(Debug, Clone, PartialEq)]
pub struct Transmission {
    /// 初始强度 I0
    pub initial: f64,
    /// 穿过最后一层后的强度
    pub final_intensity: f64,
    /// 每层之后的强度（与输入层顺序一致）
    pub after_layer: Vec<f64>,
}

impl Transmission {
    /// 透射分数 I / I0
    pub fn fraction(&self) -> f64 {
        self.final_intensity / self.initial
    }

    /// 光学深度 Σ μ_i t_i = -ln(I / I0)
    pub fn optical_depth(&self) -> f64 {
        -self.fraction().ln()
    }
}

/// 线性衰减系数 μ（cm⁻¹）
pub fn linear_attenuation_coefficient(material: &Material, energy: f64) -> Result<f64> {
    Ok(material.mass_attenuation(energy)? * material.density())
}

/// 计算穿过层序列后的透射强度及每层之后的强度
pub fn transmitted_intensity(
    initial: f64,
    layers: &[Layer<'_>],
    energy: f64,
) -> Result<Transmission> {
    let mus = prepare(initial, layers, energy)?;

    let mut after_layer = Vec::with_capacity(layers.len());
    let final_intensity = layers
        .iter()
        .zip(&mus)
        .fold(initial, |intensity, (layer, mu)| {
            let next = attenuate(intensity, *mu, layer.thickness);
            after_layer.push(next);
            next
        });

    Ok(Transmission {
        initial,
        final_intensity,
        after_layer,
    })
}

/// 能量扫描结果：按输入顺序排列的 (能量, 最终强度)
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub initial: f64,
    pub points: Vec<(f64, f64)>,
}

/// 对多个能量分别计算透射强度（并行，结果保持输入顺序）
pub fn attenuation_sweep(initial: f64, layers: &[Layer<'_>], energies: &[f64]) -> Result<Sweep> {
    validate(initial, layers)?;

    let points = energies
        .par_iter()
        .map(|&energy| {
            transmitted_intensity(initial, layers, energy).map(|t| (energy, t.final_intensity))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Sweep { initial, points })
}

/// 各层边界处的强度：[(深度 cm, 强度)]，第一个点为 (0, I0)
pub fn layer_boundaries(
    initial: f64,
    layers: &[Layer<'_>],
    energy: f64,
) -> Result<Vec<(f64, f64)>> {
    let transmission = transmitted_intensity(initial, layers, energy)?;

    let mut depth = 0.0;
    let mut points = Vec::with_capacity(layers.len() + 1);
    points.push((0.0, initial));
    for (layer, intensity) in layers.iter().zip(&transmission.after_layer) {
        depth += layer.thickness;
        points.push((depth, *intensity));
    }

    Ok(points)
}

/// 层内连续强度曲线：每层取 points_per_layer 个等距深度（含两端）
pub fn continuous_profile(
    initial: f64,
    layers: &[Layer<'_>],
    energy: f64,
    points_per_layer: usize,
) -> Result<Vec<(f64, f64)>> {
    if points_per_layer < 2 {
        return Err(XattenError::InvalidArgument(format!(
            "points per layer must be >= 2, got {}",
            points_per_layer
        )));
    }

    let mus = prepare(initial, layers, energy)?;
    let steps = (points_per_layer - 1) as f64;

    let mut profile = Vec::with_capacity(layers.len() * points_per_layer);
    let mut depth = 0.0;
    let mut intensity = initial;

    for (layer, mu) in layers.iter().zip(&mus) {
        for i in 0..points_per_layer {
            let x = layer.thickness * i as f64 / steps;
            profile.push((depth + x, attenuate(intensity, *mu, x)));
        }
        intensity = attenuate(intensity, *mu, layer.thickness);
        depth += layer.thickness;
    }

    Ok(profile)
}

/// 单一材料在不同厚度下的透射强度
pub fn thickness_curve(
    initial: f64,
    material: &Material,
    energy: f64,
    thicknesses: &[f64],
) -> Result<Vec<(f64, f64)>> {
    check_intensity(initial)?;
    for (index, &x) in thicknesses.iter().enumerate() {
        check_thickness(index, material, x)?;
    }
    let mu = linear_attenuation_coefficient(material, energy)?;

    Ok(thicknesses
        .iter()
        .map(|&x| (x, attenuate(initial, mu, x)))
        .collect())
}

/// 对比度：(I_background - I_feature) / I_background
pub fn contrast(background: &Transmission, feature: &Transmission) -> f64 {
    (background.final_intensity - feature.final_intensity) / background.final_intensity
}

#[inline]
fn attenuate(intensity: f64, mu: f64, thickness: f64) -> f64 {
    intensity * (-mu * thickness).exp()
}

/// 校验输入并求出每层 μ；任何错误都在指数运算之前返回
fn prepare(initial: f64, layers: &[Layer<'_>], energy: f64) -> Result<Vec<f64>> {
    validate(initial, layers)?;
    layers
        .iter()
        .map(|layer| linear_attenuation_coefficient(layer.material, energy))
        .collect()
}

fn validate(initial: f64, layers: &[Layer<'_>]) -> Result<()> {
    check_intensity(initial)?;
    for (index, layer) in layers.iter().enumerate() {
        check_thickness(index, layer.material, layer.thickness)?;
    }
    Ok(())
}

fn check_intensity(initial: f64) -> Result<()> {
    if !initial.is_finite() || initial <= 0.0 {
        return Err(XattenError::InvalidIntensity(initial));
    }
    Ok(())
}

fn check_thickness(index: usize, material: &Material, thickness: f64) -> Result<()> {
    if !thickness.is_finite() || thickness < 0.0 {
        return Err(XattenError::InvalidThickness {
            index,
            material: material.name().to_string(),
            thickness,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaterialTable;

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    #[test]
    fn test_linear_attenuation_coefficient() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();
        let mu = linear_attenuation_coefficient(bone, 0.1).unwrap();
        assert!((mu - 0.1855 * 1.92).abs() < 1e-12);
    }

    #[test]
    fn test_single_layer_closed_form() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();
        let layers = [Layer::new(bone, 1.0)];

        let t = transmitted_intensity(1.0, &layers, 0.1).unwrap();
        let expected = (-0.1855 * 1.92 * 1.0_f64).exp();
        assert!(rel_close(t.final_intensity, expected, 1e-12));
        assert_eq!(t.after_layer, vec![t.final_intensity]);
    }

    #[test]
    fn test_three_layer_scenario() {
        let table = MaterialTable::builtin().unwrap();
        let air = table.get("air").unwrap();
        let soft = table.get("soft_tissue").unwrap();
        let bone = table.get("bone").unwrap();
        let layers = [
            Layer::new(air, 5.0),
            Layer::new(soft, 10.0),
            Layer::new(bone, 2.0),
        ];

        let t = transmitted_intensity(1.0, &layers, 0.1).unwrap();

        let expected = (-0.1541 * 0.001225 * 5.0_f64).exp()
            * (-0.1688 * 1.03 * 10.0_f64).exp()
            * (-0.1855 * 1.92 * 2.0_f64).exp();
        assert!(rel_close(t.final_intensity, expected, 1e-9));
        assert_eq!(t.after_layer.len(), 3);
        assert!((t.optical_depth() - (-expected.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let table = MaterialTable::builtin().unwrap();
        let soft = table.get("soft_tissue").unwrap();
        let bone = table.get("bone").unwrap();
        let layers = [
            Layer::new(soft, 3.0),
            Layer::new(bone, 0.0),
            Layer::new(bone, 1.5),
            Layer::new(soft, 4.0),
        ];

        for energy in [0.01, 0.05, 0.1, 0.8, 5.0, 20.0] {
            let t = transmitted_intensity(250.0, &layers, energy).unwrap();
            assert!(t.final_intensity > 0.0);
            assert!(t.final_intensity <= 250.0);
            assert!(t.after_layer[0] <= 250.0);
            for w in t.after_layer.windows(2) {
                assert!(w[0] >= w[1]);
            }
            // 零厚度层不改变强度
            assert_eq!(t.after_layer[1], t.after_layer[0]);
        }
    }

    #[test]
    fn test_layer_additivity() {
        let table = MaterialTable::builtin().unwrap();
        let soft = table.get("soft_tissue").unwrap();

        let split = [Layer::new(soft, 1.25), Layer::new(soft, 2.75)];
        let merged = [Layer::new(soft, 4.0)];

        let a = transmitted_intensity(1.0, &split, 0.3).unwrap();
        let b = transmitted_intensity(1.0, &merged, 0.3).unwrap();
        assert!(rel_close(a.final_intensity, b.final_intensity, 1e-12));
    }

    #[test]
    fn test_empty_path_is_identity() {
        let t = transmitted_intensity(42.0, &[], 0.1).unwrap();
        assert_eq!(t.final_intensity, 42.0);
        assert!(t.after_layer.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();

        assert!(matches!(
            transmitted_intensity(0.0, &[Layer::new(bone, 1.0)], 0.1),
            Err(XattenError::InvalidIntensity(_))
        ));
        assert!(matches!(
            transmitted_intensity(-3.0, &[], 0.1),
            Err(XattenError::InvalidIntensity(_))
        ));

        let layers = [Layer::new(bone, 1.0), Layer::new(bone, -1.0)];
        match transmitted_intensity(1.0, &layers, 0.1) {
            Err(XattenError::InvalidThickness {
                index, thickness, ..
            }) => {
                assert_eq!(index, 1);
                assert_eq!(thickness, -1.0);
            }
            other => panic!("expected InvalidThickness, got {:?}", other),
        }

        // 厚度校验先于能量校验
        assert!(matches!(
            transmitted_intensity(1.0, &layers, 100.0),
            Err(XattenError::InvalidThickness { .. })
        ));
    }

    #[test]
    fn test_energy_out_of_domain() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();
        let layers = [Layer::new(bone, 1.0)];

        assert!(matches!(
            transmitted_intensity(1.0, &layers, 0.005),
            Err(XattenError::UnknownEnergy { .. })
        ));
        assert!(matches!(
            transmitted_intensity(1.0, &layers, 25.0),
            Err(XattenError::UnknownEnergy { .. })
        ));
    }

    #[test]
    fn test_sweep_preserves_order() {
        let table = MaterialTable::builtin().unwrap();
        let soft = table.get("soft_tissue").unwrap();
        let layers = [Layer::new(soft, 10.0)];
        let energies = [1.0, 0.03, 0.15, 10.0];

        let sweep = attenuation_sweep(1.0, &layers, &energies).unwrap();
        assert_eq!(sweep.points.len(), 4);
        for (i, &(e, intensity)) in sweep.points.iter().enumerate() {
            assert_eq!(e, energies[i]);
            let single = transmitted_intensity(1.0, &layers, e).unwrap();
            assert_eq!(intensity, single.final_intensity);
        }

        // 高能量穿透更强
        assert!(sweep.points[3].1 > sweep.points[1].1);
    }

    #[test]
    fn test_sweep_fails_on_any_bad_energy() {
        let table = MaterialTable::builtin().unwrap();
        let soft = table.get("soft_tissue").unwrap();
        let layers = [Layer::new(soft, 1.0)];
        assert!(matches!(
            attenuation_sweep(1.0, &layers, &[0.1, 30.0]),
            Err(XattenError::UnknownEnergy { .. })
        ));
    }

    #[test]
    fn test_boundaries_and_profile_agree() {
        let table = MaterialTable::builtin().unwrap();
        let air = table.get("air").unwrap();
        let soft = table.get("soft_tissue").unwrap();
        let bone = table.get("bone").unwrap();
        let layers = [
            Layer::new(air, 5.0),
            Layer::new(soft, 10.0),
            Layer::new(bone, 2.0),
        ];

        let t = transmitted_intensity(1000.0, &layers, 0.1).unwrap();

        let boundaries = layer_boundaries(1000.0, &layers, 0.1).unwrap();
        assert_eq!(boundaries.len(), 4);
        assert_eq!(boundaries[0], (0.0, 1000.0));
        assert!((boundaries[3].0 - 17.0).abs() < 1e-12);
        assert_eq!(boundaries[3].1, t.final_intensity);

        let profile = continuous_profile(1000.0, &layers, 0.1, 50).unwrap();
        assert_eq!(profile.len(), 150);
        assert_eq!(profile[0], (0.0, 1000.0));
        let (depth, intensity) = profile[profile.len() - 1];
        assert!((depth - 17.0).abs() < 1e-9);
        assert!(rel_close(intensity, t.final_intensity, 1e-12));

        assert!(continuous_profile(1000.0, &layers, 0.1, 1).is_err());
    }

    #[test]
    fn test_thickness_curve() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();
        let mu = linear_attenuation_coefficient(bone, 1.0).unwrap();

        let curve = thickness_curve(1.0, bone, 1.0, &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(curve[0], (0.0, 1.0));
        assert!(rel_close(curve[2].1, (-2.0 * mu).exp(), 1e-12));

        assert!(matches!(
            thickness_curve(1.0, bone, 1.0, &[1.0, -0.5]),
            Err(XattenError::InvalidThickness { index: 1, .. })
        ));
    }

    #[test]
    fn test_contrast() {
        let table = MaterialTable::builtin().unwrap();
        let soft = table.get("soft_tissue").unwrap();
        let bone = table.get("bone").unwrap();

        let background = [Layer::new(soft, 10.0)];
        let feature = [Layer::new(soft, 8.0), Layer::new(bone, 2.0)];

        let bg = transmitted_intensity(1.0, &background, 0.1).unwrap();
        let ft = transmitted_intensity(1.0, &feature, 0.1).unwrap();
        assert_eq!(contrast(&bg, &bg), 0.0);
        assert!(contrast(&bg, &ft) > 0.0);

        // 低能量对比度更高
        let bg_hi = transmitted_intensity(1.0, &background, 10.0).unwrap();
        let ft_hi = transmitted_intensity(1.0, &feature, 10.0).unwrap();
        assert!(contrast(&bg, &ft) > contrast(&bg_hi, &ft_hi));
    }
}
