//! # 统一错误处理模块
//!
//! 定义 xatten 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xatten 统一错误类型
#[derive(Error, Debug)]
pub enum XattenError {
    // ─────────────────────────────────────────────────────────────
    // 物理量校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid thickness {thickness} cm for layer #{index} ({material}): must be finite and >= 0")]
    InvalidThickness {
        index: usize,
        material: String,
        thickness: f64,
    },

    #[error("Invalid initial intensity {0}: must be finite and > 0")]
    InvalidIntensity(f64),

    #[error("Energy {energy} MeV is outside the tabulated domain of '{material}' ({min}-{max} MeV)")]
    UnknownEnergy {
        material: String,
        energy: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid density {density} g/cm3 for material '{material}': must be finite and > 0")]
    InvalidDensity { material: String, density: f64 },

    #[error("Invalid mass attenuation coefficient {value} cm2/g for '{material}' at {energy} MeV")]
    InvalidCoefficient {
        material: String,
        energy: f64,
        value: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // 数据表与输入解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown material: '{0}'")]
    UnknownMaterial(String),

    #[error("Invalid coefficient table: {0}")]
    InvalidTable(String),

    #[error("Invalid layer spec '{0}' (expected 'material:thickness', e.g. 'bone:2')")]
    InvalidLayerSpec(String),

    #[error("Invalid energy '{0}' (use e.g. 0.1, 0.1MeV or 100keV)")]
    InvalidEnergy(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化与绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XattenError>;
