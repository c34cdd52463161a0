//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 与 `commands/curve.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} {msg:<18} [{bar:36.cyan/blue}] {pos}/{len} [{elapsed}]";

/// 创建标准进度条；len 为 0 时隐藏
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    if len == 0 {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bar_is_hidden() {
        assert!(create_progress_bar(0, "idle").is_hidden());
        assert_eq!(create_progress_bar(5, "work").length(), Some(5));
    }
}
