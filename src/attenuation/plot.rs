//! # 衰减图表生成
//!
//! 使用 `plotters` 库生成衰减曲线图。
//!
//! ## 功能
//! - 单一材料在多个能量下的透射强度-厚度曲线
//! - 分层组织的深度-强度剖面（每层着色并标注）
//! - 透射分数/对比度随能量变化曲线（对数能量轴）
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, XattenError};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 曲线配色
const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 102, 204),
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(255, 127, 14),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// 图像输出参数
#[derive(Debug, Clone, Copy)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub svg: bool,
}

/// 一条带图例的曲线
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// 剖面图中的一层
#[derive(Debug, Clone)]
pub struct LayerBand {
    pub material: String,
    pub start: f64,
    pub end: f64,
}

/// 剖面图数据
#[derive(Debug, Clone)]
pub struct ProfileChart<'a> {
    pub title: &'a str,
    pub initial: f64,
    pub profile: &'a [(f64, f64)],
    pub boundaries: &'a [(f64, f64)],
    pub bands: &'a [LayerBand],
}

fn plot_err<E: std::fmt::Debug>(e: E) -> XattenError {
    XattenError::PlotError(format!("{:?}", e))
}

fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// 组织层底色
fn band_color(material: &str, index: usize) -> RGBColor {
    match material {
        "bone" => RGBColor(222, 205, 160),
        "soft_tissue" => RGBColor(240, 128, 128),
        "air" => RGBColor(135, 206, 235),
        _ => series_color(index + 3),
    }
}

/// "soft_tissue" -> "Soft Tissue"
pub fn display_name(material: &str) -> String {
    material
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─────────────────────────────────────────────────────────────
// 透射强度-厚度曲线
// ─────────────────────────────────────────────────────────────

/// 生成单一材料的衰减曲线图（y 为归一化强度）
pub fn generate_curve_plot(
    series: &[Series],
    material: &str,
    title: &str,
    output_path: &Path,
    options: PlotOptions,
) -> Result<()> {
    if options.svg {
        let root = SVGBackend::new(output_path, (options.width, options.height))
            .into_drawing_area();
        draw_curve_chart(&root, series, material, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (options.width, options.height))
            .into_drawing_area();
        draw_curve_chart(&root, series, material, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_curve_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[Series],
    material: &str,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(x, _)| *x))
        .fold(0.0_f64, f64::max);
    let x_max = if x_max > 0.0 { x_max } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, 0.0..1.05)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} Thickness (cm)", display_name(material)))
        .y_desc("Normalized Transmitted Intensity")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    for (i, s) in series.iter().enumerate() {
        let color = series_color(i);
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 分层深度剖面
// ─────────────────────────────────────────────────────────────

/// 生成分层组织深度-强度剖面图
pub fn generate_profile_plot(
    chart_data: &ProfileChart<'_>,
    output_path: &Path,
    options: PlotOptions,
) -> Result<()> {
    if options.svg {
        let root = SVGBackend::new(output_path, (options.width, options.height))
            .into_drawing_area();
        draw_profile_chart(&root, chart_data)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (options.width, options.height))
            .into_drawing_area();
        draw_profile_chart(&root, chart_data)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_profile_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &ProfileChart<'_>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let depth = data.bands.last().map(|b| b.end).unwrap_or(0.0);
    let depth = if depth > 0.0 { depth } else { 1.0 };
    let y_max = data.initial * 1.05;

    let mut chart = ChartBuilder::on(root)
        .caption(data.title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..depth, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Depth (cm)")
        .y_desc("Intensity")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    // 各层底色与标注
    for (i, band) in data.bands.iter().enumerate() {
        let color = band_color(&band.material, i);
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(band.start, 0.0), (band.end, data.initial)],
                color.mix(0.3).filled(),
            )))
            .map_err(plot_err)?;

        chart
            .draw_series(std::iter::once(Text::new(
                display_name(&band.material),
                ((band.start + band.end) / 2.0, data.initial * 0.5),
                ("sans-serif", 14).into_font().color(&BLACK),
            )))
            .map_err(plot_err)?;
    }

    let line_color = RGBColor(0, 0, 255);
    chart
        .draw_series(LineSeries::new(
            data.profile.iter().copied(),
            line_color.stroke_width(3),
        ))
        .map_err(plot_err)?
        .label("Continuous Attenuation")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(3))
        });

    chart
        .draw_series(
            data.boundaries
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, RED.filled())),
        )
        .map_err(plot_err)?
        .label("Layer Boundary")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 随能量变化曲线
// ─────────────────────────────────────────────────────────────

/// 生成随能量变化的曲线图（对数能量轴，y 范围 0-1.05）
pub fn generate_energy_plot(
    series: &[Series],
    title: &str,
    y_desc: &str,
    output_path: &Path,
    options: PlotOptions,
) -> Result<()> {
    if options.svg {
        let root = SVGBackend::new(output_path, (options.width, options.height))
            .into_drawing_area();
        draw_energy_chart(&root, series, title, y_desc)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, (options.width, options.height))
            .into_drawing_area();
        draw_energy_chart(&root, series, title, y_desc)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// y 轴范围：至少覆盖 0-1，按有限数据值扩展并留 5% 边距
fn value_range(series: &[Series]) -> std::ops::Range<f64> {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .filter(|y| y.is_finite())
        .fold((0.0_f64, 1.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let pad = (hi - lo) * 0.05;
    let lo = if lo < 0.0 { lo - pad } else { lo };
    lo..hi + pad
}

fn draw_energy_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[Series],
    title: &str,
    y_desc: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let energies = || series.iter().flat_map(|s| s.points.iter().map(|(e, _)| *e));
    let e_min = energies().fold(f64::INFINITY, f64::min);
    let e_max = energies().fold(f64::NEG_INFINITY, f64::max);
    let (e_min, e_max) = if e_min.is_finite() && e_max > e_min {
        (e_min, e_max)
    } else if e_min.is_finite() {
        (e_min * 0.5, e_min * 2.0)
    } else {
        (0.01, 20.0)
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((e_min..e_max).log_scale(), value_range(series))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Energy (MeV)")
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    for (i, s) in series.iter().enumerate() {
        let color = series_color(i);
        // 下溢得到的 NaN/∞ 点不绘制
        let finite: Vec<(f64, f64)> = s
            .points
            .iter()
            .copied()
            .filter(|(_, y)| y.is_finite())
            .collect();

        chart
            .draw_series(LineSeries::new(finite.iter().copied(), color.stroke_width(2)))
            .map_err(plot_err)?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        chart
            .draw_series(finite.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))
            .map_err(plot_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("soft_tissue"), "Soft Tissue");
        assert_eq!(display_name("bone"), "Bone");
        assert_eq!(display_name("cortical__bone"), "Cortical Bone");
    }

    #[test]
    fn test_value_range_covers_negative_contrast() {
        let series = vec![
            Series {
                label: "Feature I/I0".to_string(),
                points: vec![(0.1, 0.4), (1.0, 0.9)],
            },
            Series {
                label: "Contrast".to_string(),
                points: vec![(0.1, -0.5), (1.0, f64::NAN), (10.0, 0.2)],
            },
        ];
        let range = value_range(&series);
        assert!(range.start < -0.5);
        assert!((range.start - -0.575).abs() < 1e-12);
        assert!((range.end - 1.075).abs() < 1e-12);

        // 纯透射分数保持 0 起点
        let fractions = vec![Series {
            label: "path".to_string(),
            points: vec![(0.1, 0.2), (1.0, 0.7)],
        }];
        let range = value_range(&fractions);
        assert_eq!(range.start, 0.0);
        assert!((range.end - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(band_color("bone", 0).rgb(), (222, 205, 160));
        assert_eq!(band_color("lead", 0).rgb(), series_color(3).rgb());
    }
}
