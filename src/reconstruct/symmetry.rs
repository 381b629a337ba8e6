//! # 对称轨道重建策略
//!
//! 用记录的边中点播种：每个中点最近的两个顶点镜像构成一条
//! 种子边；再把晶格的全部对称操作施加到种子边两端，生成边的
//! 完整对称轨道。变换后的端点经取整分数坐标查表映射回规范
//! 顶点编号，查表冲突时回退到更细的逐顶点最近匹配。
//!
//! 失败条件：中点或操作缺失、种子边退化为零偏移自环、或某个
//! 变换端点无法匹配到已知顶点。
//!
//! ## 依赖关系
//! - 被 `reconstruct/mod.rs` 调用
//! - 使用 `geometry/neighbors.rs`、`models/`

use crate::geometry::closest_sites;
use crate::models::{offset_sub, position_key, PeriodicEdge, PeriodicGraph};
use crate::reconstruct::NetContext;
use std::collections::{BTreeSet, HashMap};

/// 细匹配容差（分数坐标，逐分量）
const FINE_TOL: f64 = 1e-3;

pub(crate) fn from_symmetry_orbit(context: &NetContext) -> Option<PeriodicGraph> {
    if context.midpoints.is_empty() || context.record.symmetry_ops.is_empty() {
        return None;
    }

    let table = PositionTable::new(&context.positions);
    let mut edges: BTreeSet<PeriodicEdge> = BTreeSet::new();

    for midpoint in &context.midpoints {
        let hits = closest_sites(
            *midpoint,
            &context.positions,
            &context.metric,
            context.seed_tolerance,
            2,
        );
        if hits.len() < 2 {
            return None;
        }
        let (a, b) = (&hits[0], &hits[1]);
        if a.id == b.id && a.image == b.image {
            return None;
        }
        edges.insert(PeriodicEdge::new(a.id, b.id, offset_sub(b.image, a.image))?);

        // 端点的覆盖图坐标
        let endpoint_a = cover_position(&context.positions[a.id], a.image);
        let endpoint_b = cover_position(&context.positions[b.id], b.image);

        for op in &context.record.symmetry_ops {
            let (va, oa) = table.resolve(op.apply(endpoint_a))?;
            let (vb, ob) = table.resolve(op.apply(endpoint_b))?;
            edges.insert(PeriodicEdge::new(va, vb, offset_sub(ob, oa))?);
        }
    }

    Some(PeriodicGraph::new(
        context.positions.len(),
        edges.into_iter().collect(),
    ))
}

fn cover_position(base: &[f64; 3], image: [i32; 3]) -> [f64; 3] {
    [
        base[0] + image[0] as f64,
        base[1] + image[1] as f64,
        base[2] + image[2] as f64,
    ]
}

/// 取整分数坐标 -> 顶点编号查表
struct PositionTable<'a> {
    positions: &'a [[f64; 3]],
    buckets: HashMap<[i64; 3], Vec<usize>>,
}

impl<'a> PositionTable<'a> {
    fn new(positions: &'a [[f64; 3]]) -> Self {
        let mut buckets: HashMap<[i64; 3], Vec<usize>> = HashMap::new();
        for (i, p) in positions.iter().enumerate() {
            buckets.entry(position_key(*p)).or_default().push(i);
        }
        PositionTable { positions, buckets }
    }

    /// 把任意分数坐标解析为 (顶点编号, 整数偏移)
    fn resolve(&self, p: [f64; 3]) -> Option<(usize, [i32; 3])> {
        let id = match self.buckets.get(&position_key(p)).map(Vec::as_slice) {
            Some([single]) => *single,
            // 桶冲突或落在取整边界外：更细的逐顶点匹配
            _ => self.nearest_wrapped(p)?,
        };

        let base = &self.positions[id];
        let mut offset = [0i32; 3];
        for i in 0..3 {
            let d = p[i] - base[i];
            let r = d.round();
            if (d - r).abs() > FINE_TOL {
                return None;
            }
            offset[i] = r as i32;
        }
        Some((id, offset))
    }

    /// 逐顶点找分数坐标周期意义下最接近者
    fn nearest_wrapped(&self, p: [f64; 3]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, base) in self.positions.iter().enumerate() {
            let mut residual = 0.0f64;
            for k in 0..3 {
                let d = p[k] - base[k];
                residual = residual.max((d - d.round()).abs());
            }
            if residual < FINE_TOL && best.map_or(true, |(_, r)| residual < r) {
                best = Some((i, residual));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoordinationSequence, Lattice, NetRecord, SymmetryOp};
    use crate::reconstruct::{build_context, ReconstructOptions};
    use crate::topology::matches_targets;

    fn pcu_targets() -> Vec<CoordinationSequence> {
        let mut seq = [0u32; crate::models::SHELL_DEPTH];
        for (i, shell) in seq.iter_mut().enumerate() {
            let n = (i + 1) as u32;
            *shell = 4 * n * n + 2;
        }
        vec![seq]
    }

    /// 三重轴 (x,y,z)->(y,z,x) 及其平方，加恒等操作
    fn cyclic_ops() -> Vec<SymmetryOp> {
        let c3 = SymmetryOp::new(
            [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
            [0.0, 0.0, 0.0],
        );
        let c3_sq = SymmetryOp::new(
            [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [0.0, 0.0, 0.0],
        );
        vec![SymmetryOp::identity(), c3, c3_sq]
    }

    #[test]
    fn test_pcu_from_all_midpoints_identity_only() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let record = NetRecord::new("pcu", lattice, vec![[0.0, 0.0, 0.0]], pcu_targets())
            .with_midpoints(vec![[2.5, 0.0, 0.0], [0.0, 2.5, 0.0], [0.0, 0.0, 2.5]])
            .with_symmetry_ops(vec![SymmetryOp::identity()]);

        let options = ReconstructOptions::default();
        let context = build_context(&record, &options).unwrap();
        let graph = from_symmetry_orbit(&context).expect("orbit strategy should succeed");

        assert_eq!(graph.edges().len(), 3);
        assert!(matches_targets(&graph, &record.targets));
    }

    #[test]
    fn test_pcu_orbit_from_single_midpoint() {
        // 只有一个中点：三重轴操作把 x 向自键扩展到 y、z 向
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let record = NetRecord::new("pcu", lattice, vec![[0.0, 0.0, 0.0]], pcu_targets())
            .with_midpoints(vec![[2.5, 0.0, 0.0]])
            .with_symmetry_ops(cyclic_ops());
        // 中点数与配位和不符，必须走白名单
        let options = ReconstructOptions {
            irregular: vec!["pcu".to_string()],
            ..Default::default()
        };
        let context = build_context(&record, &options).unwrap();
        let graph = from_symmetry_orbit(&context).expect("orbit strategy should succeed");

        assert_eq!(graph.edges().len(), 3);
        assert!(matches_targets(&graph, &record.targets));
    }

    #[test]
    fn test_declines_without_midpoints() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let record = NetRecord::new("pcu", lattice, vec![[0.0, 0.0, 0.0]], pcu_targets())
            .with_symmetry_ops(vec![SymmetryOp::identity()]);
        let options = ReconstructOptions::default();
        let context = build_context(&record, &options).unwrap();
        assert!(from_symmetry_orbit(&context).is_none());
    }

    #[test]
    fn test_position_table_resolves_images() {
        let positions = vec![[0.25, 0.25, 0.0], [0.75, 0.75, 0.5]];
        let table = PositionTable::new(&positions);

        assert_eq!(table.resolve([0.25, 0.25, 0.0]), Some((0, [0, 0, 0])));
        assert_eq!(table.resolve([1.25, 0.25, -1.0]), Some((0, [1, 0, -1])));
        // 取整噪声以内
        assert_eq!(table.resolve([0.75001, 0.74999, 1.5]), Some((1, [0, 0, 1])));
        // 不属于任何顶点
        assert_eq!(table.resolve([0.5, 0.1, 0.1]), None);
    }
}
