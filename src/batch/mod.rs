//! # 批量处理模块
//!
//! 提供整批网记录的并行重建与结果报告。
//!
//! ## 功能
//! - rayon 线程池并行重建
//! - 去增广补救失败的基网
//! - 终端汇总与 CSV 导出
//!
//! ## 依赖关系
//! - 使用 `reconstruct/`、`deaugment.rs`、`topology.rs`
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod report;
pub mod runner;

pub use report::{export_outcomes_csv, print_summary};
pub use runner::{BatchSummary, NetOutcome, ReconstructionRunner};
