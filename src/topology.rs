//! # 拓扑指纹校验
//!
//! 在覆盖图上做广度优先搜索，计算逐顶点配位序列（图距离
//! 1..=10 的壳层顶点计数），并据此判定候选图是否符合记录
//! 给出的目标序列。该校验是三种重建策略与去增广共用的唯一
//! 接受判据：必要但不保证充分。
//!
//! ## 依赖关系
//! - 被 `reconstruct/`、`deaugment.rs` 和 `batch/` 使用
//! - 使用 `models/graph.rs`

use crate::models::{offset_add, CoordinationSequence, PeriodicGraph, SHELL_DEPTH};
use std::collections::HashSet;

/// 从 start 出发的配位序列。
///
/// 覆盖图节点是 (顶点, 偏移) 对：同一顶点经不同周期镜像可被
/// 多次到达，访问集必须以覆盖节点为单位。
pub fn coordination_sequence(
    adjacency: &[Vec<(usize, [i32; 3])>],
    start: usize,
) -> CoordinationSequence {
    let mut shells = [0u32; SHELL_DEPTH];
    let mut visited: HashSet<(usize, [i32; 3])> = HashSet::new();
    let origin = (start, [0i32; 3]);
    visited.insert(origin);

    let mut frontier = vec![origin];
    for shell in shells.iter_mut() {
        let mut next = Vec::new();
        for (vertex, offset) in &frontier {
            for (neighbor, step) in &adjacency[*vertex] {
                let node = (*neighbor, offset_add(*offset, *step));
                if visited.insert(node) {
                    next.push(node);
                }
            }
        }
        *shell = next.len() as u32;
        frontier = next;
    }
    shells
}

/// 候选图与目标序列的指纹校验。
///
/// 接受条件：
/// (a) 图的不同度数集合 == 目标序列首项的不同取值集合；
/// (b) 每个顶点的深度 10 配位序列都出现在目标序列集合中。
pub fn matches_targets(graph: &PeriodicGraph, targets: &[CoordinationSequence]) -> bool {
    if graph.vertex_count() != targets.len() {
        return false;
    }
    if targets.is_empty() {
        return true;
    }

    let mut degrees: Vec<usize> = graph.degrees();
    degrees.sort_unstable();
    degrees.dedup();

    let mut target_degrees: Vec<usize> = targets.iter().map(|t| t[0] as usize).collect();
    target_degrees.sort_unstable();
    target_degrees.dedup();

    if degrees != target_degrees {
        return false;
    }

    let target_set: HashSet<CoordinationSequence> = targets.iter().copied().collect();
    let adjacency = graph.adjacency();
    (0..graph.vertex_count()).all(|v| target_set.contains(&coordination_sequence(&adjacency, v)))
}
