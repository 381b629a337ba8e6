//! # Topokit - 晶体网拓扑重建工具库
//!
//! 从只给出顶点与边中点实空间坐标（不含键表）的结构数据库
//! 记录中，重建晶体网的周期图连接性。核心是几何/组合重建
//! 引擎：任意倾斜晶格下的最小镜像距离、三种独立的边推断
//! 策略、配位序列指纹校验，以及失败基网的环簇去增广补救。
//!
//! 数据库文本的抓取与解析、归档文件打包和第二数据库的交叉
//! 比对属于外部协作方：本库只消费现成的 [`NetRecord`]，产出
//! [`PeriodicGraph`] 与批量处理清单。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── models/     (晶格、周期图、网记录数据模型)
//!   ├── geometry/   (最小镜像度量、有界近邻搜索)
//!   ├── reconstruct/(三种边推断策略组成的策略链)
//!   ├── topology.rs (配位序列计算与指纹校验)
//!   ├── deaugment.rs(环簇坍缩)
//!   ├── batch/      (rayon 并行批量执行与报告)
//!   ├── utils/      (终端输出、进度条)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod deaugment;
pub mod error;
pub mod geometry;
pub mod models;
pub mod reconstruct;
pub mod topology;
pub mod utils;

pub use batch::{BatchSummary, NetOutcome, ReconstructionRunner};
pub use deaugment::deaugment;
pub use error::{Result, TopokitError};
pub use models::{
    CoordinationSequence, Lattice, NetRecord, PeriodicEdge, PeriodicGraph, SymmetryOp, SHELL_DEPTH,
};
pub use reconstruct::{reconstruct, reconstruct_with, ReconstructOptions};
pub use topology::{coordination_sequence, matches_targets};
