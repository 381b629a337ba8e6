//! # 统一错误处理模块
//!
//! 定义 Topokit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Topokit 统一错误类型
#[derive(Error, Debug)]
pub enum TopokitError {
    // ─────────────────────────────────────────────────────────────
    // 数据不变量错误（硬失败）
    // ─────────────────────────────────────────────────────────────
    #[error("Net '{net}': {vertices} vertices but {sequences} coordination sequences")]
    VertexCountMismatch {
        net: String,
        vertices: usize,
        sequences: usize,
    },

    #[error("Net '{net}': vertices {first} and {second} coincide after rounding")]
    DuplicateVertex {
        net: String,
        first: usize,
        second: usize,
    },

    #[error("Net '{net}': {midpoints} edge midpoints, but coordination numbers imply {expected}")]
    EdgeCountMismatch {
        net: String,
        midpoints: usize,
        expected: usize,
    },

    #[error("Cell matrix is singular (volume {0:.3e})")]
    SingularLattice(f64),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TopokitError>;
