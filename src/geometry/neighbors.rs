//! # 有界近邻搜索
//!
//! 在点集上搜索给定点的最近邻镜像：逐点收集最小镜像候选，
//! 用部分选择保留 max_count 个最近者，再按简并键长容差裁剪，
//! 保证三种重建策略共用同一并列判定。
//!
//! ## 依赖关系
//! - 被 `reconstruct/` 使用
//! - 使用 `geometry/min_image.rs`

use crate::geometry::CellMetric;

/// 重合点过滤阈值：距离低于该值视为查询点自身的零镜像
const COINCIDENT_TOL: f64 = 1e-8;

/// 一个近邻命中：点集下标、距离与镜像偏移
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f64,
    pub image: [i32; 3],
}

/// 搜索 point 在 sites 中的最近邻镜像。
///
/// - `eps = ∞` 时不裁剪并列，恰好保留 max_count 个；
/// - 有限 `eps` 时在保留集内再裁剪到与最近距离相差 eps 以内；
/// - 查询点自身的零距离镜像被剔除（非零镜像的自键保留）。
///
/// 返回值按距离升序。
pub fn closest_sites(
    point: [f64; 3],
    sites: &[[f64; 3]],
    metric: &CellMetric,
    eps: f64,
    max_count: usize,
) -> Vec<Neighbor> {
    if max_count == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<Neighbor> = Vec::new();
    for (id, site) in sites.iter().enumerate() {
        let delta = [point[0] - site[0], point[1] - site[1], point[2] - site[2]];
        for image in metric.images(delta, eps) {
            if image.distance < COINCIDENT_TOL {
                continue;
            }
            candidates.push(Neighbor {
                id,
                distance: image.distance,
                image: image.offset,
            });
        }
    }

    // 部分选择而非全排序：点集较大时只需最近的 max_count 个
    if candidates.len() > max_count {
        candidates
            .select_nth_unstable_by(max_count - 1, |a, b| {
                a.distance.partial_cmp(&b.distance).unwrap()
            });
        candidates.truncate(max_count);
    }
    candidates.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());

    if let Some(first) = candidates.first() {
        let cutoff = first.distance + eps;
        candidates.retain(|n| n.distance <= cutoff);
    }
    candidates
}
