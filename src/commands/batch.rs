//! # batch 子命令实现
//!
//! 并行计算目录中的场景文件，每个场景写出一个剖面 CSV。
//!
//! ## 功能
//! - glob 模式收集场景文件（可递归）
//! - rayon 并行，进度条显示
//! - 已存在的输出默认跳过
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的 BatchArgs
//! - 使用 `batch/` 的 FileCollector 与 BatchRunner
//! - 使用 `attenuation/export.rs` 写出 CSV

use crate::attenuation::export;
use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::batch::BatchArgs;
use crate::commands::common::{self, format_energy};
use crate::error::{Result, XattenError};
use crate::models::{Beam, MaterialTable};
use crate::parsers::layers::parse_scenario_file;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 batch 命令
pub fn execute(args: BatchArgs) -> Result<()> {
    output::print_header("Batch Scenario Evaluation");

    if !args.input.exists() {
        return Err(XattenError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let table = common::load_table(&args.table)?;
    let beam = Beam::new(args.intensity, common::energy(&args.energy)?);

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No files matched '{}' under {}",
            args.pattern,
            args.input.display()
        ));
        return Ok(());
    }

    fs::create_dir_all(&args.output).map_err(|e| XattenError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Found {} scenarios, {} at I0 = {}, {} threads",
        files.len(),
        format_energy(beam.energy),
        beam.intensity,
        runner.jobs()
    ));

    let result = runner.run(files, |file| {
        let name = file.display().to_string();
        let out = output_path(file, &args.input, &args.output);
        match process_scenario(file, &table, beam, &out, args.overwrite) {
            Ok(true) => ProcessResult::Success,
            Ok(false) => ProcessResult::Skipped(name),
            Err(e) => ProcessResult::Failed(name, e.to_string()),
        }
    })?;

    for path in &result.skips {
        output::print_skip(&format!("{} (output exists, use --overwrite)", path));
    }
    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_separator();
    output::print_success(&format!(
        "Processed {} scenario(s) into '{}': {} written, {} skipped, {} failed",
        result.total(),
        args.output.display(),
        result.success,
        result.skipped,
        result.failed
    ));

    Ok(())
}

/// 场景文件对应的输出路径：保留相对输入根目录的子目录，文件名为 `<stem>_profile.csv`
///
/// 不同子目录下的同名场景因此落到不同的输出文件。
fn output_path(input: &Path, input_root: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scenario");
    let subdir = input
        .strip_prefix(input_root)
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    output_dir.join(subdir).join(format!("{}_profile.csv", stem))
}

/// 计算单个场景并写出剖面；输出已存在且不覆盖时返回 false
fn process_scenario(
    input: &Path,
    table: &MaterialTable,
    beam: Beam,
    out: &Path,
    overwrite: bool,
) -> Result<bool> {
    if out.exists() && !overwrite {
        return Ok(false);
    }

    let specs = parse_scenario_file(input)?;
    let layers = table.resolve(&specs)?;
    let transmission = beam.transmit(&layers)?;

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent).map_err(|e| XattenError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    export::rows_to_csv(&common::profile_rows(&layers, &transmission), out)?;
    Ok(true)
}
