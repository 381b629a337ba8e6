//! # 渐进指派重建策略（兜底）
//!
//! 逐顶点预先算出完整的候选边排名表（不止前 k 个），每个顶点
//! 维护一个游标。每轮试验取各顶点自游标起的配位数个候选组装
//! 试验图并做指纹校验；失败则按轮转顺序把恰好一个游标前移一
//! 位（排名表耗尽的顶点跳过，视为不贡献边）。
//!
//! 试验轮数有固定上限以保证终止；超限即策略失败。这是刻意
//! 不完备的有界组合搜索，部分奇异拓扑上失败是预期结果。
//!
//! ## 依赖关系
//! - 被 `reconstruct/mod.rs` 调用
//! - 使用 `geometry/neighbors.rs`、`topology.rs`

use crate::geometry::{closest_sites, Neighbor};
use crate::models::{PeriodicEdge, PeriodicGraph};
use crate::reconstruct::NetContext;
use crate::topology;
use std::collections::BTreeSet;

/// 试验轮数上限
const TRIAL_CAP: usize = 8192;

pub(crate) fn from_progressive_search(context: &NetContext) -> Option<PeriodicGraph> {
    let n = context.positions.len();
    if n == 0 {
        return None;
    }

    let ranked: Vec<Vec<Neighbor>> = (0..n)
        .map(|i| {
            closest_sites(
                context.positions[i],
                &context.positions,
                &context.metric,
                f64::INFINITY,
                usize::MAX,
            )
        })
        .collect();

    let mut cursors = vec![0usize; n];
    let mut turn = 0usize;

    for _ in 0..TRIAL_CAP {
        if let Some(graph) = assemble_trial(context, &ranked, &cursors) {
            if topology::matches_targets(&graph, &context.record.targets) {
                return Some(graph);
            }
        }

        // 轮转前移一个游标；全部耗尽则搜索结束
        let mut advanced = false;
        for step in 0..n {
            let i = (turn + step) % n;
            if cursors[i] < ranked[i].len() {
                cursors[i] += 1;
                turn = (i + 1) % n;
                advanced = true;
                break;
            }
        }
        if !advanced {
            return None;
        }
    }
    None
}

/// 以各顶点当前游标窗口组装试验图
fn assemble_trial(
    context: &NetContext,
    ranked: &[Vec<Neighbor>],
    cursors: &[usize],
) -> Option<PeriodicGraph> {
    let mut edges: BTreeSet<PeriodicEdge> = BTreeSet::new();
    for (i, list) in ranked.iter().enumerate() {
        for neighbor in list.iter().skip(cursors[i]).take(context.coordination(i)) {
            edges.insert(PeriodicEdge::new(i, neighbor.id, neighbor.image)?);
        }
    }
    Some(PeriodicGraph::new(
        context.positions.len(),
        edges.into_iter().collect(),
    ))
}
