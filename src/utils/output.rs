//! # 美化输出工具
//!
//! 提供统一的终端状态行样式。
//!
//! ## 依赖关系
//! - 被 `batch/report.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[+]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[x]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[!]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[i]".blue().bold(), msg);
}

/// 打印统计项
pub fn print_stat(label: &str, value: &str) {
    println!("  {} {}", label.dimmed(), value.bold());
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "═".repeat(64);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(64).dimmed());
}
