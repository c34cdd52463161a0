//! # 内置质量衰减系数数据
//!
//! 提供骨、软组织、空气三种材料在 0.01–20 MeV 的质量衰减系数表。
//!
//! ## 数据
//! | 能量 (MeV) | 骨      | 软组织   | 空气     |
//! |-----------|---------|---------|---------|
//! | 0.01      | 28.51   | 4.937   | 5.120   |
//! | 0.1       | 0.1855  | 0.1688  | 0.1541  |
//! | 1         | 0.0656  | 0.07003 | 0.06358 |
//! | 10        | 0.02314 | 0.02191 | 0.02045 |
//! | 20        | 0.02068 | 0.01785 | 0.01705 |
//!
//! 单位 cm²/g。密度（g/cm³）：骨 1.92，软组织 1.03，空气 0.001225。
//!
//! ## 依赖关系
//! - 被 `commands/` 在未指定外部表时使用
//! - 纯静态数据，构造出的 MaterialTable 由调用方持有并显式传递

use crate::error::Result;
use crate::models::{Material, MaterialTable};

/// 表格能量点（MeV）
pub const ENERGIES_MEV: [f64; 5] = [0.01, 0.1, 1.0, 10.0, 20.0];

/// 内置材料：(标识, 密度, 质量衰减系数)
pub const BUILTIN_MATERIALS: [(&str, f64, [f64; 5]); 3] = [
    ("bone", 1.92, [28.51, 0.1855, 0.0656, 0.02314, 0.02068]),
    (
        "soft_tissue",
        1.03,
        [4.937, 0.1688, 0.07003, 0.02191, 0.01785],
    ),
    ("air", 0.001225, [5.120, 0.1541, 0.06358, 0.02045, 0.01705]),
];

impl MaterialTable {
    /// 内置系数表
    pub fn builtin() -> Result<Self> {
        let mut table = MaterialTable::new();
        for (name, density, mac) in BUILTIN_MATERIALS {
            table.insert(Material::new(
                name,
                density,
                ENERGIES_MEV.to_vec(),
                mac.to_vec(),
            )?)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = MaterialTable::builtin().unwrap();
        assert_eq!(table.len(), 3);

        let bone = table.get("bone").unwrap();
        assert_eq!(bone.density(), 1.92);
        assert_eq!(bone.energy_domain(), (0.01, 20.0));
        assert_eq!(bone.mass_attenuation(0.1).unwrap(), 0.1855);

        let air = table.get("air").unwrap();
        assert_eq!(air.density(), 0.001225);
    }

    #[test]
    fn test_bone_attenuates_more_than_soft_tissue() {
        let table = MaterialTable::builtin().unwrap();
        let bone = table.get("bone").unwrap();
        let soft = table.get("soft_tissue").unwrap();
        for &e in &ENERGIES_MEV {
            let mu_bone = bone.mass_attenuation(e).unwrap() * bone.density();
            let mu_soft = soft.mass_attenuation(e).unwrap() * soft.density();
            assert!(mu_bone > mu_soft, "bone should dominate at {} MeV", e);
        }
    }
}
