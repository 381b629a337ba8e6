//! # 最近邻重建策略
//!
//! 逐顶点请求恰好配位数个最近邻镜像（不做并列裁剪），直接由
//! 命中组装候选边集。每条键会从两端各被发现一次，规范化后
//! 合并为同一条边；某个顶点候选不足配位数时立即失败。
//!
//! ## 依赖关系
//! - 被 `reconstruct/mod.rs` 调用
//! - 使用 `geometry/neighbors.rs`

use crate::geometry::closest_sites;
use crate::models::{PeriodicEdge, PeriodicGraph};
use crate::reconstruct::NetContext;
use std::collections::BTreeSet;

pub(crate) fn from_nearest_neighbors(context: &NetContext) -> Option<PeriodicGraph> {
    let mut edges: BTreeSet<PeriodicEdge> = BTreeSet::new();

    for (i, position) in context.positions.iter().enumerate() {
        let wanted = context.coordination(i);
        let found = closest_sites(
            *position,
            &context.positions,
            &context.metric,
            f64::INFINITY,
            wanted,
        );
        if found.len() < wanted {
            return None;
        }
        for neighbor in &found {
            edges.insert(PeriodicEdge::new(i, neighbor.id, neighbor.image)?);
        }
    }

    Some(PeriodicGraph::new(
        context.positions.len(),
        edges.into_iter().collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoordinationSequence, Lattice, NetRecord};
    use crate::reconstruct::{build_context, ReconstructOptions};
    use crate::topology::{coordination_sequence, matches_targets};

    fn context_graph(record: &NetRecord) -> Option<PeriodicGraph> {
        let options = ReconstructOptions::default();
        let context = build_context(record, &options).unwrap();
        from_nearest_neighbors(&context)
    }

    fn reference_targets(graph: &PeriodicGraph) -> Vec<CoordinationSequence> {
        let adjacency = graph.adjacency();
        (0..graph.vertex_count())
            .map(|v| coordination_sequence(&adjacency, v))
            .collect()
    }

    #[test]
    fn test_diamond_from_body_centered_setting() {
        // 立方晶胞，顶点 (0,0,0) 与 (1/2,1/2,1/2)，目标配位 4：
        // 八个体对角接触并列，折叠+探测恰好给出彼此镜像一致的
        // 四个候选，组装出 dia 的 4 条规范边
        let reference = PeriodicGraph::new(
            2,
            vec![
                PeriodicEdge::new(0, 1, [0, 0, 0]).unwrap(),
                PeriodicEdge::new(0, 1, [1, 0, 0]).unwrap(),
                PeriodicEdge::new(0, 1, [0, 1, 0]).unwrap(),
                PeriodicEdge::new(0, 1, [0, 0, 1]).unwrap(),
            ],
        );
        let targets = reference_targets(&reference);
        assert_eq!(targets[0][0], 4);

        let lattice = Lattice::from_parameters(10.0, 10.0, 10.0, 90.0, 90.0, 90.0);
        let record = NetRecord::new(
            "dia",
            lattice,
            vec![[0.0, 0.0, 0.0], [5.0, 5.0, 5.0]],
            targets.clone(),
        );

        let graph = context_graph(&record).expect("diamond should reconstruct");
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.degrees(), vec![4, 4]);
        assert!(matches_targets(&graph, &targets));
    }

    #[test]
    fn test_honeycomb_in_hexagonal_cell() {
        // 非正交晶格（gamma = 120°）：石墨烯层，逐层沿 c 堆叠但
        // 层间无键。三条等长键都要靠探测平移收齐。
        let reference = PeriodicGraph::new(
            2,
            vec![
                PeriodicEdge::new(0, 1, [0, 0, 0]).unwrap(),
                PeriodicEdge::new(0, 1, [0, -1, 0]).unwrap(),
                PeriodicEdge::new(0, 1, [-1, -1, 0]).unwrap(),
            ],
        );
        let targets = reference_targets(&reference);
        assert_eq!(targets[0][0], 3);
        // 蜂窝网第 n 壳层 3n 个顶点
        assert_eq!(targets[0][1], 6);
        assert_eq!(targets[0][2], 9);

        let a = 2.46;
        let lattice = Lattice::from_parameters(a, a, 20.0, 90.0, 90.0, 120.0);
        let v0 = [0.0, 0.0, 0.0];
        let v1 = lattice.frac_to_cart([1.0 / 3.0, 2.0 / 3.0, 0.0]);
        let record = NetRecord::new("hcb", lattice, vec![v0, v1], targets.clone());

        let graph = context_graph(&record).expect("honeycomb should reconstruct");
        assert_eq!(graph.edges().len(), 3);
        assert!(matches_targets(&graph, &targets));
    }

    #[test]
    fn test_shortfall_fails_cleanly() {
        // 单顶点最多 6 个轴镜像候选，配位 8 无法满足
        let mut seq = [0u32; crate::models::SHELL_DEPTH];
        seq[0] = 8;
        let record = NetRecord::new(
            "short",
            Lattice::from_parameters(10.0, 10.0, 10.0, 90.0, 90.0, 90.0),
            vec![[0.0, 0.0, 0.0]],
            vec![seq],
        );
        assert!(context_graph(&record).is_none());
    }
}
