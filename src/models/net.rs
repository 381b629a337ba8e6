//! # 网记录数据模型
//!
//! 数据库中单个晶体网的输入记录：顶点与边中点的笛卡尔坐标、
//! 晶格及其对称操作、逐顶点的目标配位序列，以及解析器登记的
//! 空间群标签信息。
//!
//! ## 依赖关系
//! - 被 `reconstruct/` 和 `batch/` 使用
//! - 使用 `models/lattice.rs`

use crate::models::{Lattice, SymmetryOp};
use serde::{Deserialize, Serialize};

/// 配位序列深度（图距离 1..=10 的壳层）
pub const SHELL_DEPTH: usize = 10;

/// 配位序列：逐壳层顶点计数
pub type CoordinationSequence = [u32; SHELL_DEPTH];

/// 坐标判重 / 查表的小数位数
pub const POSITION_DECIMALS: u32 = 4;

/// 晶体网输入记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetRecord {
    /// 网名称（如 "dia"、"dia-a"）
    pub name: String,

    /// 顶点笛卡尔坐标
    pub vertices: Vec<[f64; 3]>,

    /// 边中点笛卡尔坐标（可为空）
    pub edge_midpoints: Vec<[f64; 3]>,

    /// 晶格
    pub lattice: Lattice,

    /// 晶格的对称操作列表（可为空）
    pub symmetry_ops: Vec<SymmetryOp>,

    /// 逐顶点目标配位序列
    pub targets: Vec<CoordinationSequence>,

    /// 声明的空间群符号
    pub space_group: Option<String>,

    /// 解析器登记：声明符号与空间群编号不一致
    pub symmetry_mismatch: bool,
}

impl NetRecord {
    pub fn new(
        name: impl Into<String>,
        lattice: Lattice,
        vertices: Vec<[f64; 3]>,
        targets: Vec<CoordinationSequence>,
    ) -> Self {
        NetRecord {
            name: name.into(),
            vertices,
            edge_midpoints: Vec::new(),
            lattice,
            symmetry_ops: Vec::new(),
            targets,
            space_group: None,
            symmetry_mismatch: false,
        }
    }

    pub fn with_midpoints(mut self, midpoints: Vec<[f64; 3]>) -> Self {
        self.edge_midpoints = midpoints;
        self
    }

    pub fn with_symmetry_ops(mut self, ops: Vec<SymmetryOp>) -> Self {
        self.symmetry_ops = ops;
        self
    }

    pub fn with_space_group(mut self, symbol: impl Into<String>) -> Self {
        self.space_group = Some(symbol.into());
        self
    }

    pub fn with_symmetry_mismatch(mut self, mismatch: bool) -> Self {
        self.symmetry_mismatch = mismatch;
        self
    }

    /// 配位数之和（每条键被两端各计一次）
    pub fn coordination_sum(&self) -> usize {
        self.targets.iter().map(|t| t[0] as usize).sum()
    }
}

/// 分数坐标折叠到 [0,1) 后按精度取整的查表键
pub(crate) fn position_key(frac: [f64; 3]) -> [i64; 3] {
    let scale = 10i64.pow(POSITION_DECIMALS);
    let mut key = [0i64; 3];
    for i in 0..3 {
        let wrapped = frac[i].rem_euclid(1.0);
        key[i] = ((wrapped * scale as f64).round() as i64) % scale;
    }
    key
}
