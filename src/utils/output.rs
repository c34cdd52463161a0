//! # 美化输出工具
//!
//! 统一的终端输出样式：带颜色前缀的状态行、标题栏、结果表格。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` 着色，`tabled` 渲染表格

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const RULE_WIDTH: usize = 60;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息（stderr）
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印计算结果：标签左对齐，数值高亮
pub fn print_result(label: &str, value: &str) {
    println!("    {:<24} {}", format!("{}:", label).dimmed(), value.cyan().bold());
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(RULE_WIDTH);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

/// 带标题的结果表格；没有行时只给出提示
pub fn print_table<T: Tabled>(title: &str, rows: &[T]) {
    print_header(title);
    if rows.is_empty() {
        print_warning("No rows to display");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}
