//! # 衰减数据导出
//!
//! 导出衰减结果到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: 厚度曲线（每个能量一列）、分层剖面、连续剖面、能量扫描、对比度
//! - XY: `#` 注释头 + 制表符分隔的两列数据
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch` 处理流程调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::attenuation::calculator::Sweep;
use crate::attenuation::plot::Series;
use crate::error::{Result, XattenError};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 分层剖面的一行（每层之后的强度）
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRow {
    pub layer: usize,
    pub material: String,
    pub thickness_cm: f64,
    pub depth_cm: f64,
    pub intensity: f64,
    pub fraction: f64,
}

/// 对比度随能量变化的一行
#[derive(Debug, Clone, Serialize)]
pub struct ContrastRow {
    pub energy_mev: f64,
    pub background: f64,
    pub feature: f64,
    pub contrast: f64,
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> XattenError + '_ {
    move |source| XattenError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}

/// 导出厚度曲线：thickness_cm 列 + 每条曲线一列（所有曲线共用厚度网格）
pub fn curves_to_csv(series: &[Series], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let mut header = vec!["thickness_cm".to_string()];
    header.extend(series.iter().map(|s| s.label.clone()));
    wtr.write_record(&header)?;

    let rows = series.first().map(|s| s.points.len()).unwrap_or(0);
    for i in 0..rows {
        let mut record = vec![format!("{:.6}", series[0].points[i].0)];
        for s in series {
            let value = s.points.get(i).map(|(_, y)| *y).ok_or_else(|| {
                XattenError::InvalidArgument(format!(
                    "curve '{}' has {} points, expected {}",
                    s.label,
                    s.points.len(),
                    rows
                ))
            })?;
            record.push(format!("{:.8e}", value));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(write_err(output_path))?;
    Ok(())
}

/// 导出可序列化的行
pub fn rows_to_csv<T: Serialize>(rows: &[T], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(write_err(output_path))?;
    Ok(())
}

/// 导出两列数据（如连续剖面 depth_cm,intensity）
pub fn points_to_csv(columns: [&str; 2], points: &[(f64, f64)], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(columns)?;
    for (x, y) in points {
        wtr.write_record(&[format!("{:.6}", x), format!("{:.8e}", y)])?;
    }
    wtr.flush().map_err(write_err(output_path))?;
    Ok(())
}

/// 导出能量扫描结果
pub fn sweep_to_csv(sweep: &Sweep, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(["energy_mev", "intensity", "fraction"])?;
    for (energy, intensity) in &sweep.points {
        wtr.write_record(&[
            format!("{}", energy),
            format!("{:.8e}", intensity),
            format!("{:.8e}", intensity / sweep.initial),
        ])?;
    }
    wtr.flush().map_err(write_err(output_path))?;
    Ok(())
}

/// 导出 XY 格式
pub fn to_xy(header: &[String], points: &[(f64, f64)], output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(write_err(output_path))?;
    let mut out = BufWriter::new(file);

    for line in header {
        writeln!(out, "# {}", line).map_err(write_err(output_path))?;
    }
    writeln!(out, "#").map_err(write_err(output_path))?;

    for (x, y) in points {
        writeln!(out, "{:.6}\t{:.8e}", x, y).map_err(write_err(output_path))?;
    }

    out.flush().map_err(write_err(output_path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("xatten_export_test");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_curves_to_csv() {
        let series = vec![
            Series {
                label: "0.1 MeV".to_string(),
                points: vec![(0.0, 1.0), (1.0, 0.5)],
            },
            Series {
                label: "1 MeV".to_string(),
                points: vec![(0.0, 1.0), (1.0, 0.9)],
            },
        ];
        let path = temp_path("curves.csv");
        curves_to_csv(&series, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "thickness_cm,0.1 MeV,1 MeV");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("1.000000,5.00000000e-1,"));
    }

    #[test]
    fn test_ragged_curves_rejected() {
        let series = vec![
            Series {
                label: "a".to_string(),
                points: vec![(0.0, 1.0), (1.0, 0.5)],
            },
            Series {
                label: "b".to_string(),
                points: vec![(0.0, 1.0)],
            },
        ];
        assert!(curves_to_csv(&series, &temp_path("ragged.csv")).is_err());
    }

    #[test]
    fn test_rows_and_sweep_csv() {
        let rows = vec![ProfileRow {
            layer: 1,
            material: "bone".to_string(),
            thickness_cm: 2.0,
            depth_cm: 2.0,
            intensity: 0.49,
            fraction: 0.49,
        }];
        let path = temp_path("profile.csv");
        rows_to_csv(&rows, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("layer,material,thickness_cm,depth_cm,intensity,fraction\n"));
        assert!(content.contains("1,bone,2.0,2.0,0.49,0.49"));

        let sweep = Sweep {
            initial: 2.0,
            points: vec![(0.1, 1.0), (1.0, 1.5)],
        };
        let path = temp_path("sweep.csv");
        sweep_to_csv(&sweep, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "energy_mev,intensity,fraction");
        assert_eq!(lines[1], "0.1,1.00000000e0,5.00000000e-1");
    }

    #[test]
    fn test_to_xy() {
        let path = temp_path("profile.xy");
        to_xy(
            &["Layered profile".to_string()],
            &[(0.0, 1000.0), (5.0, 999.0)],
            &path,
        )
        .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# Layered profile");
        assert_eq!(lines[1], "#");
        assert_eq!(lines[2], "0.000000\t1.00000000e3");
    }
}
