//! # 晶格与对称操作数据模型
//!
//! 定义晶格矩阵表示及其派生量（参数、体积、逆矩阵、正交判定、
//! 面间安全半径），以及分数坐标空间中的对称操作。
//!
//! ## 依赖关系
//! - 被 `geometry/`、`reconstruct/` 和 `models/net.rs` 使用
//! - 使用 `error.rs`

use crate::error::{Result, TopokitError};
use serde::{Deserialize, Serialize};

/// 正交判定容差（归一化行向量点积）
const ORTHO_TOL: f64 = 1e-9;

/// 奇异矩阵判定容差（体积下限）
const VOLUME_TOL: f64 = 1e-12;

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let alpha_rad = alpha.to_radians();
        let beta_rad = beta.to_radians();
        let gamma_rad = gamma.to_radians();

        let cos_alpha = alpha_rad.cos();
        let cos_beta = beta_rad.cos();
        let cos_gamma = gamma_rad.cos();
        let sin_gamma = gamma_rad.sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();
        let c_vec = [c1, c2, c3];

        Lattice {
            matrix: [a_vec, b_vec, c_vec],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let a_vec = self.matrix[0];
        let b_vec = self.matrix[1];
        let c_vec = self.matrix[2];

        let a = norm(&a_vec);
        let b = norm(&b_vec);
        let c = norm(&c_vec);

        let alpha = (dot(&b_vec, &c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(&a_vec, &c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(&a_vec, &b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（有符号行列式）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(&a, &cross(&b, &c))
    }

    /// 判断晶格是否正交（三个晶格向量两两垂直）
    pub fn is_orthogonal(&self) -> bool {
        let [a, b, c] = self.matrix;
        let (na, nb, nc) = (norm(&a), norm(&b), norm(&c));

        (dot(&a, &b) / (na * nb)).abs() < ORTHO_TOL
            && (dot(&a, &c) / (na * nc)).abs() < ORTHO_TOL
            && (dot(&b, &c) / (nb * nc)).abs() < ORTHO_TOL
    }

    /// 对面安全半径：相对两个晶胞面之间距离的一半的最小值。
    /// 任何不超过该值的最小镜像距离都能仅靠坐标折叠找到。
    pub fn face_clearance(&self) -> f64 {
        let [a, b, c] = self.matrix;
        let volume = self.volume().abs();

        let d_a = volume / norm(&cross(&b, &c));
        let d_b = volume / norm(&cross(&a, &c));
        let d_c = volume / norm(&cross(&a, &b));

        0.5 * d_a.min(d_b).min(d_c)
    }

    /// 分数坐标转笛卡尔坐标（行向量左乘矩阵）
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        apply_row(&self.matrix, frac)
    }

    /// 计算逆矩阵（伴随矩阵法），用于笛卡尔坐标转分数坐标
    pub fn inverse(&self) -> Result<[[f64; 3]; 3]> {
        let m = self.matrix;
        let det = self.volume();
        if det.abs() < VOLUME_TOL {
            return Err(TopokitError::SingularLattice(det));
        }

        Ok([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ])
    }
}

/// 分数坐标空间的对称操作：p' = R·p + t
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymmetryOp {
    /// 旋转部分（3x3）
    pub rotation: [[f64; 3]; 3],
    /// 平移部分
    pub translation: [f64; 3],
}

impl SymmetryOp {
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        SymmetryOp {
            rotation,
            translation,
        }
    }

    /// 恒等操作 x,y,z
    pub fn identity() -> Self {
        SymmetryOp {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    /// 应用到分数坐标点
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let r = &self.rotation;
        [
            r[0][0] * p[0] + r[0][1] * p[1] + r[0][2] * p[2] + self.translation[0],
            r[1][0] * p[0] + r[1][1] * p[1] + r[1][2] * p[2] + self.translation[1],
            r[2][0] * p[0] + r[2][1] * p[1] + r[2][2] * p[2] + self.translation[2],
        ]
    }
}

/// 向量叉积
fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 向量点积
fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 向量模长
fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// 行向量左乘矩阵：out[j] = Σ_i v[i]·m[i][j]
pub(crate) fn apply_row(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        v[0] * m[0][0] + v[1] * m[1][0] + v[2] * m[2][0],
        v[0] * m[0][1] + v[1] * m[1][1] + v[2] * m[2][1],
        v[0] * m[0][2] + v[1] * m[1][2] + v[2] * m[2][2],
    ]
}
