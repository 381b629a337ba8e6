//! # 周期几何模块
//!
//! 最小镜像度量与有界近邻搜索。
//!
//! ## 依赖关系
//! - 被 `reconstruct/` 使用
//! - 使用 `models/lattice.rs`
//! - 子模块: min_image, neighbors

pub mod min_image;
pub mod neighbors;

pub use min_image::{CellMetric, ImageCandidate};
pub use neighbors::{closest_sites, Neighbor};
