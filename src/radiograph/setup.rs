//! # 模拟 X 射线成像场景参数
//!
//! 描述交给外部射线成像渲染器的场景：点源、单能射线束、探测器与解剖模型网格。
//! 本模块不做任何渲染，只生成参数并用衰减表检查管电压是否在数据范围内。
//!
//! ## 预设
//! - small: 源 (-5, 0, 0) cm，探测器 (10, 0, 0) cm，500×430 像素
//! - large: 源 (-20, 1.7, 0) cm，探测器 (20, 0, 0) cm，1200×1200 像素
//!
//! ## 依赖关系
//! - 被 `commands/setup.rs` 调用
//! - 使用 `attenuation/calculator.rs` 计算各物体材料的 μ
//! - 使用 `serde` 序列化为 JSON

use crate::attenuation::calculator;
use crate::error::{Result, XattenError};
use crate::models::MaterialTable;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 默认管电压（keV）
pub const DEFAULT_TUBE_VOLTAGE_KEV: f64 = 80.0;

/// 单能射线束光子数
pub const PHOTON_COUNT: u32 = 1000;

/// 模型尺寸预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Small,
    Large,
}

impl FromStr for ModelSize {
    type Err = XattenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(ModelSize::Small),
            "large" => Ok(ModelSize::Large),
            _ => Err(XattenError::InvalidArgument(format!(
                "model size must be 'small' or 'large', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSize::Small => write!(f, "small"),
            ModelSize::Large => write!(f, "large"),
        }
    }
}

/// 点源
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub position_cm: [f64; 3],
    pub point_source: bool,
}

/// 单能射线束
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonoBeam {
    pub energy_kev: f64,
    pub photons: u32,
}

impl MonoBeam {
    pub fn energy_mev(&self) -> f64 {
        self.energy_kev / 1000.0
    }
}

/// 平板探测器
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detector {
    pub position_cm: [f64; 3],
    pub pixels: [u32; 2],
    pub up_vector: [f64; 3],
    pub pixel_size_mm: [f64; 2],
}

/// 场景中的网格物体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneObject {
    pub name: String,
    pub mesh_path: PathBuf,
    pub mesh_unit: &'static str,
    /// 渲染器使用的化学式
    pub compound: &'static str,
    pub density_g_cm3: f64,
    /// 衰减表中对应的材料
    pub material: &'static str,
    pub translation_mm: [f64; 3],
    /// (角度°, 转轴)
    pub rotation: (f64, [f64; 3]),
}

/// 完整成像场景
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiographSetup {
    pub model_size: ModelSize,
    pub source: Source,
    pub beam: MonoBeam,
    pub detector: Detector,
    pub objects: Vec<SceneObject>,
}

/// 某物体材料在射线能量下的衰减系数
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectAttenuation {
    pub object: String,
    pub material: String,
    pub mu: f64,
    /// 平均自由程 1/μ（cm）
    pub mean_free_path: f64,
}

impl RadiographSetup {
    /// 按预设构造场景
    pub fn preset(size: ModelSize, tube_voltage_kev: f64, data_dir: PathBuf) -> Result<Self> {
        if !tube_voltage_kev.is_finite() || tube_voltage_kev <= 0.0 {
            return Err(XattenError::InvalidArgument(format!(
                "tube voltage must be > 0 keV, got {}",
                tube_voltage_kev
            )));
        }

        let (source, detector_position, pixels) = match size {
            ModelSize::Small => ([-5.0, 0.0, 0.0], [10.0, 0.0, 0.0], [500, 430]),
            ModelSize::Large => ([-20.0, 1.7, 0.0], [20.0, 0.0, 0.0], [1200, 1200]),
        };

        let (torso_name, pelvis_name, torso_shift, pelvis_shift) = match size {
            ModelSize::Small => (
                "TORSO_Small",
                "PELVIS_Small",
                [0.0, 0.0, -10.0],
                [0.0, 1.3, -10.0],
            ),
            ModelSize::Large => (
                "TORSO_Large",
                "PELVIS_Large",
                [-40.0, 0.0, -40.0],
                [-40.0, 3.0, -40.0],
            ),
        };

        let rotation = (-90.0, [0.0, 0.0, 1.0]);
        let objects = vec![
            SceneObject {
                name: torso_name.to_string(),
                mesh_path: data_dir.join(format!("{}.stl", torso_name)),
                mesh_unit: "mm",
                compound: "H2O",
                density_g_cm3: 1.03,
                material: "soft_tissue",
                translation_mm: torso_shift,
                rotation,
            },
            SceneObject {
                name: pelvis_name.to_string(),
                mesh_path: data_dir.join(format!("{}.stl", pelvis_name)),
                mesh_unit: "mm",
                compound: "Ca10(PO4)6(OH)2",
                density_g_cm3: 1.92,
                material: "bone",
                translation_mm: pelvis_shift,
                rotation,
            },
        ];

        Ok(Self {
            model_size: size,
            source: Source {
                position_cm: source,
                point_source: true,
            },
            beam: MonoBeam {
                energy_kev: tube_voltage_kev,
                photons: PHOTON_COUNT,
            },
            detector: Detector {
                position_cm: detector_position,
                pixels,
                up_vector: [0.0, 0.0, -1.0],
                pixel_size_mm: [0.5, 0.5],
            },
            objects,
        })
    }

    /// 源到探测器距离（cm）
    pub fn source_detector_distance(&self) -> f64 {
        self.source
            .position_cm
            .iter()
            .zip(&self.detector.position_cm)
            .map(|(s, d)| (d - s).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// 各物体材料在射线能量下的 μ；能量超出表格范围时报错
    pub fn object_attenuation(&self, table: &MaterialTable) -> Result<Vec<ObjectAttenuation>> {
        let energy = self.beam.energy_mev();
        self.objects
            .iter()
            .map(|obj| {
                let material = table.get(obj.material)?;
                let mu = calculator::linear_attenuation_coefficient(material, energy)?;
                Ok(ObjectAttenuation {
                    object: obj.name.clone(),
                    material: obj.material.to_string(),
                    mu,
                    mean_free_path: if mu > 0.0 { 1.0 / mu } else { f64::INFINITY },
                })
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_size_parse() {
        assert_eq!("Small".parse::<ModelSize>().unwrap(), ModelSize::Small);
        assert_eq!(" LARGE ".parse::<ModelSize>().unwrap(), ModelSize::Large);
        assert!("medium".parse::<ModelSize>().is_err());
    }

    #[test]
    fn test_small_preset_geometry() {
        let setup = RadiographSetup::preset(ModelSize::Small, 80.0, PathBuf::from("Data")).unwrap();
        assert_eq!(setup.source.position_cm, [-5.0, 0.0, 0.0]);
        assert_eq!(setup.detector.position_cm, [10.0, 0.0, 0.0]);
        assert_eq!(setup.detector.pixels, [500, 430]);
        assert_eq!(setup.objects[0].mesh_path, PathBuf::from("Data").join("TORSO_Small.stl"));
        assert_eq!(setup.objects[1].translation_mm, [0.0, 1.3, -10.0]);
        assert!((setup.source_detector_distance() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_preset_geometry() {
        let setup =
            RadiographSetup::preset(ModelSize::Large, 150.0, PathBuf::from("Data")).unwrap();
        assert_eq!(setup.source.position_cm, [-20.0, 1.7, 0.0]);
        assert_eq!(setup.detector.pixels, [1200, 1200]);
        assert_eq!(setup.objects[1].name, "PELVIS_Large");
        assert_eq!(setup.objects[1].translation_mm, [-40.0, 3.0, -40.0]);
        assert_eq!(setup.beam.energy_mev(), 0.15);
    }

    #[test]
    fn test_invalid_tube_voltage() {
        assert!(RadiographSetup::preset(ModelSize::Small, 0.0, PathBuf::from("Data")).is_err());
    }

    #[test]
    fn test_object_attenuation() {
        let table = MaterialTable::builtin().unwrap();
        let setup =
            RadiographSetup::preset(ModelSize::Small, 100.0, PathBuf::from("Data")).unwrap();
        let mus = setup.object_attenuation(&table).unwrap();
        assert_eq!(mus.len(), 2);
        assert!((mus[0].mu - 0.1688 * 1.03).abs() < 1e-12);
        assert!((mus[1].mu - 0.1855 * 1.92).abs() < 1e-12);

        // 5 keV 低于表格下限
        let low = RadiographSetup::preset(ModelSize::Small, 5.0, PathBuf::from("Data")).unwrap();
        assert!(matches!(
            low.object_attenuation(&table),
            Err(XattenError::UnknownEnergy { .. })
        ));
    }

    #[test]
    fn test_json_output() {
        let setup = RadiographSetup::preset(ModelSize::Small, 80.0, PathBuf::from("Data")).unwrap();
        let json = setup.to_json().unwrap();
        assert!(json.contains("\"model_size\": \"small\""));
        assert!(json.contains("Ca10(PO4)6(OH)2"));
        assert!(json.contains("\"photons\": 1000"));
    }
}
