//! # setup 子命令实现
//!
//! 生成射线成像场景参数（JSON），并检查各物体材料在射线能量下的衰减系数。
//!
//! ## 依赖关系
//! - 使用 `cli/setup.rs` 定义的 SetupArgs
//! - 使用 `radiograph/setup.rs`

use crate::cli::setup::SetupArgs;
use crate::commands::common::{self, fmt_number};
use crate::error::{Result, XattenError};
use crate::radiograph::RadiographSetup;
use crate::utils::output;

use std::fs;
use tabled::Tabled;

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "Mesh")]
    mesh: String,
    #[tabled(rename = "Material")]
    material: String,
    #[tabled(rename = "μ (1/cm)")]
    mu: String,
    #[tabled(rename = "Mean free path (cm)")]
    mean_free_path: String,
}

/// 执行 setup 命令
pub fn execute(args: SetupArgs) -> Result<()> {
    output::print_header(&format!("Radiograph Setup ({} model)", args.size));

    let table = common::load_table(&args.table)?;
    let setup = RadiographSetup::preset(args.size, args.tube_voltage, args.data_dir.clone())?;

    output::print_result(
        "Monochromatic beam",
        &format!("{} keV, {} photons", fmt_number(setup.beam.energy_kev), setup.beam.photons),
    );
    output::print_result(
        "Detector",
        &format!("{}×{} px", setup.detector.pixels[0], setup.detector.pixels[1]),
    );
    output::print_result(
        "Source-detector distance",
        &format!("{:.2} cm", setup.source_detector_distance()),
    );

    let attenuation = setup.object_attenuation(&table)?;
    let rows: Vec<ObjectRow> = setup
        .objects
        .iter()
        .zip(&attenuation)
        .map(|(obj, att)| ObjectRow {
            object: att.object.clone(),
            mesh: obj.mesh_path.display().to_string(),
            material: att.material.clone(),
            mu: format!("{:.5}", att.mu),
            mean_free_path: format!("{:.3}", att.mean_free_path),
        })
        .collect();
    output::print_table("Object Attenuation", &rows);

    for obj in setup.objects.iter().filter(|o| !o.mesh_path.exists()) {
        output::print_warning(&format!("Mesh not found: {}", obj.mesh_path.display()));
    }

    let json = setup.to_json()?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).map_err(|e| XattenError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_success(&format!("Setup written to '{}'", path.display()));
        }
        None => println!("{}", json),
    }

    Ok(())
}
