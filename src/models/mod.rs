//! # 数据模型模块
//!
//! 定义晶格、周期图与网记录数据模型。
//!
//! ## 依赖关系
//! - 被 `geometry/`、`reconstruct/`、`topology.rs` 和 `batch/` 使用
//! - 子模块: lattice, graph, net

pub mod graph;
pub mod lattice;
pub mod net;

pub use graph::{PeriodicEdge, PeriodicGraph};
pub use lattice::{Lattice, SymmetryOp};
pub use net::{CoordinationSequence, NetRecord, POSITION_DECIMALS, SHELL_DEPTH};

pub(crate) use graph::{offset_add, offset_neg, offset_sub};
pub(crate) use lattice::apply_row;
pub(crate) use net::position_key;
