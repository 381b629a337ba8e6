//! # 最小镜像度量
//!
//! 在任意（可能倾斜的）晶格下计算最小镜像距离，以及保留简并
//! 镜像的最小镜像集合。
//!
//! ## 算法概述
//! 1. 逐分量折叠位移到半个晶胞内（round 折叠，奇函数，保证
//!    d(u) 与 d(-u) 严格相等）
//! 2. 折叠距离不超过对面安全半径（或晶格正交）时即为最小值
//! 3. 否则探测 6 个轴相邻平移（±1 每轴）取最小
//!
//! 6 探测回退是有界启发式而非穷举壳层搜索：对高度倾斜的晶格
//! 可能错过真实最小镜像，由下游配位序列校验兜底。
//!
//! ## 依赖关系
//! - 被 `geometry/neighbors.rs` 和 `reconstruct/` 使用
//! - 使用 `models/lattice.rs`

use crate::models::{apply_row, Lattice};

/// 一个镜像候选：目标点的整数平移及对应距离
#[derive(Debug, Clone, Copy)]
pub struct ImageCandidate {
    /// 镜像偏移：候选位置 = 目标点 + offset·晶胞
    pub offset: [i32; 3],
    /// 笛卡尔距离
    pub distance: f64,
}

/// 晶胞度量：晶格矩阵 + 正交标志 + 认证半径
#[derive(Debug, Clone)]
pub struct CellMetric {
    matrix: [[f64; 3]; 3],
    /// 三个晶格向量两两垂直
    pub orthogonal: bool,
    /// 不超过该距离的折叠结果必为最小镜像
    pub certified_radius: f64,
}

impl CellMetric {
    pub fn new(lattice: &Lattice) -> Self {
        CellMetric {
            matrix: lattice.matrix,
            orthogonal: lattice.is_orthogonal(),
            certified_radius: lattice.face_clearance(),
        }
    }

    /// 分数位移的笛卡尔模长
    fn cart_norm(&self, frac: [f64; 3]) -> f64 {
        let v = apply_row(&self.matrix, frac);
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    /// 最小镜像距离
    pub fn distance(&self, delta: [f64; 3]) -> f64 {
        let (folded, _) = fold(delta);
        let direct = self.cart_norm(folded);

        if self.orthogonal || direct <= self.certified_radius {
            return direct;
        }

        let mut best = direct;
        for axis in 0..3 {
            for sign in [1.0, -1.0] {
                let mut probe = folded;
                probe[axis] -= sign;
                best = best.min(self.cart_norm(probe));
            }
        }
        best
    }

    /// 最小镜像集合：保留所有与最小距离相差不超过 eps 的镜像偏移。
    ///
    /// 对称结构常有多条等长周期键，因此即使折叠结果已被认证，
    /// 仍要探测 6 个轴平移以收齐落在半晶胞边界上的简并镜像。
    /// 返回值按距离升序，首项即最小镜像。
    pub fn images(&self, delta: [f64; 3], eps: f64) -> Vec<ImageCandidate> {
        let (folded, base) = fold(delta);

        let mut candidates = Vec::with_capacity(7);
        candidates.push(ImageCandidate {
            offset: base,
            distance: self.cart_norm(folded),
        });

        for axis in 0..3 {
            for sign in [1i32, -1i32] {
                let mut probe = folded;
                probe[axis] -= sign as f64;
                let mut offset = base;
                offset[axis] += sign;
                candidates.push(ImageCandidate {
                    offset,
                    distance: self.cart_norm(probe),
                });
            }
        }

        let best = candidates
            .iter()
            .map(|c| c.distance)
            .fold(f64::INFINITY, f64::min);
        candidates.retain(|c| c.distance <= best + eps);
        // 稳定排序：等距镜像保持生成顺序
        candidates.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
        candidates
    }
}

/// 逐分量折叠到半个晶胞内。
///
/// round 取整为奇函数（半值远离零取整），因此 fold(-d) == -fold(d)
/// 在边界上也严格成立。返回 (折叠后位移, 镜像偏移)，满足
/// delta - offset == folded。
fn fold(delta: [f64; 3]) -> ([f64; 3], [i32; 3]) {
    let mut folded = [0.0; 3];
    let mut offset = [0i32; 3];
    for i in 0..3 {
        let r = delta[i].round();
        folded[i] = delta[i] - r;
        offset[i] = r as i32;
    }
    (folded, offset)
}
