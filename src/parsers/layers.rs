//! # 层序列解析器
//!
//! 两种输入方式：
//! - 命令行紧凑格式：`air:5,soft_tissue:10,bone:2`（厚度单位 cm）
//! - 场景 CSV 文件：
//! ```text
//! material,thickness_cm
//! air,5
//! soft_tissue,10
//! bone,2
//! ```
//!
//! 这里只做语法解析，厚度的物理校验由计算器负责。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch` 处理流程调用
//! - 使用 `regex` 解析紧凑格式，`csv` 读取场景文件

use crate::error::{Result, XattenError};
use crate::models::LayerSpec;

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static LAYER_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_\-]*)\s*:\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*(?:cm)?\s*$")
        .expect("layer entry regex is valid")
});

/// 解析紧凑层描述
pub fn parse_layer_spec(spec: &str) -> Result<Vec<LayerSpec>> {
    if spec.trim().is_empty() {
        return Err(XattenError::InvalidLayerSpec(spec.to_string()));
    }

    spec.split(',')
        .map(|entry| {
            let caps = LAYER_ENTRY
                .captures(entry)
                .ok_or_else(|| XattenError::InvalidLayerSpec(entry.trim().to_string()))?;
            let thickness: f64 = caps[2]
                .parse()
                .map_err(|_| XattenError::InvalidLayerSpec(entry.trim().to_string()))?;
            Ok(LayerSpec::new(&caps[1], thickness))
        })
        .collect()
}

/// 解析场景 CSV 文件
pub fn parse_scenario_file(path: &Path) -> Result<Vec<LayerSpec>> {
    if !path.is_file() {
        return Err(XattenError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)?;

    let specs = reader
        .deserialize()
        .collect::<std::result::Result<Vec<LayerSpec>, csv::Error>>()?;

    if specs.is_empty() {
        return Err(XattenError::InvalidArgument(format!(
            "scenario '{}' contains no layers",
            path.display()
        )));
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_layer_spec() {
        let specs = parse_layer_spec("air:5, soft_tissue : 10,bone:2cm").unwrap();
        assert_eq!(
            specs,
            vec![
                LayerSpec::new("air", 5.0),
                LayerSpec::new("soft_tissue", 10.0),
                LayerSpec::new("bone", 2.0),
            ]
        );

        let specs = parse_layer_spec("bone:.5,bone:1e-1").unwrap();
        assert_eq!(specs[0].thickness, 0.5);
        assert_eq!(specs[1].thickness, 0.1);
    }

    #[test]
    fn test_negative_thickness_is_syntax_ok() {
        // 负厚度由计算器拒绝
        let specs = parse_layer_spec("bone:-1").unwrap();
        assert_eq!(specs[0].thickness, -1.0);
    }

    #[test]
    fn test_parse_layer_spec_errors() {
        for bad in ["", "bone", "bone:", ":2", "bone:2,", "bone:abc", "1bone:2"] {
            assert!(
                matches!(parse_layer_spec(bad), Err(XattenError::InvalidLayerSpec(_))),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_scenario_file() {
        let dir = std::env::temp_dir().join("xatten_scenario_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("chest.csv");
        fs::write(
            &path,
            "material,thickness_cm\n# entrance\nair, 5\nsoft_tissue,10\nbone,2\n",
        )
        .unwrap();

        let specs = parse_scenario_file(&path).unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1], LayerSpec::new("soft_tissue", 10.0));

        let empty = dir.join("empty.csv");
        fs::write(&empty, "material,thickness_cm\n").unwrap();
        assert!(parse_scenario_file(&empty).is_err());

        assert!(matches!(
            parse_scenario_file(&dir.join("nope.csv")),
            Err(XattenError::FileNotFound { .. })
        ));
    }
}
