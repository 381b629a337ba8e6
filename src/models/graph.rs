//! # 周期图数据模型
//!
//! 定义带整数晶格平移偏移的无向周期图：规范化的周期边
//! （一条键只保留一个代表，边与其反向负偏移视为同一条边）、
//! 边多重集、度数与覆盖图邻接表。
//!
//! ## 依赖关系
//! - 被 `reconstruct/`、`topology.rs`、`deaugment.rs` 和 `batch/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 规范化的周期边：(source, target, offset)
///
/// 规范形式满足 source < target，或 source == target 且偏移的
/// 首个非零分量为正。零偏移自环是非法的（构造返回 None）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodicEdge {
    pub source: usize,
    pub target: usize,
    pub offset: [i32; 3],
}

impl PeriodicEdge {
    /// 构造规范化周期边；零偏移自环返回 None
    pub fn new(a: usize, b: usize, offset: [i32; 3]) -> Option<Self> {
        if a < b {
            return Some(PeriodicEdge {
                source: a,
                target: b,
                offset,
            });
        }
        if a > b {
            return Some(PeriodicEdge {
                source: b,
                target: a,
                offset: offset_neg(offset),
            });
        }

        // 自环：首个非零分量取正
        match offset.iter().find(|&&c| c != 0) {
            None => None,
            Some(&c) => {
                let offset = if c < 0 { offset_neg(offset) } else { offset };
                Some(PeriodicEdge {
                    source: a,
                    target: b,
                    offset,
                })
            }
        }
    }
}

/// 周期图：顶点数 + 规范边多重集（允许平行边）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicGraph {
    vertex_count: usize,
    edges: Vec<PeriodicEdge>,
}

impl PeriodicGraph {
    /// 从规范边列表创建；内部按序存储，保留重复边
    pub fn new(vertex_count: usize, mut edges: Vec<PeriodicEdge>) -> Self {
        edges.sort_unstable();
        PeriodicGraph {
            vertex_count,
            edges,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// 规范边多重集（升序）
    pub fn edges(&self) -> &[PeriodicEdge] {
        &self.edges
    }

    /// 各顶点度数；自环计两度
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.vertex_count];
        for edge in &self.edges {
            degrees[edge.source] += 1;
            degrees[edge.target] += 1;
        }
        degrees
    }

    /// 覆盖图邻接表：每条边在两个方向各登记一次。
    /// adj[u] 含 (v, o) 表示 (u, t) 与 (v, t + o) 相邻。
    pub fn adjacency(&self) -> Vec<Vec<(usize, [i32; 3])>> {
        let mut adj = vec![Vec::new(); self.vertex_count];
        for edge in &self.edges {
            adj[edge.source].push((edge.target, edge.offset));
            adj[edge.target].push((edge.source, offset_neg(edge.offset)));
        }
        adj
    }
}

/// 偏移加法
pub(crate) fn offset_add(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// 偏移减法
pub(crate) fn offset_sub(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// 偏移取负
pub(crate) fn offset_neg(a: [i32; 3]) -> [i32; 3] {
    [-a[0], -a[1], -a[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_reverse_is_same_bond() {
        let forward = PeriodicEdge::new(0, 1, [1, 0, -1]).unwrap();
        let reverse = PeriodicEdge::new(1, 0, [-1, 0, 1]).unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_edge_zero_self_loop_rejected() {
        assert!(PeriodicEdge::new(2, 2, [0, 0, 0]).is_none());
    }

    #[test]
    fn test_edge_self_loop_sign() {
        let minus = PeriodicEdge::new(0, 0, [-1, 0, 0]).unwrap();
        let plus = PeriodicEdge::new(0, 0, [1, 0, 0]).unwrap();
        assert_eq!(minus, plus);
        assert_eq!(minus.offset, [1, 0, 0]);

        // 首分量为零时由次分量定号
        let mixed = PeriodicEdge::new(0, 0, [0, -2, 1]).unwrap();
        assert_eq!(mixed.offset, [0, 2, -1]);
    }

    #[test]
    fn test_graph_degrees_with_self_loop() {
        let edges = vec![
            PeriodicEdge::new(0, 1, [0, 0, 0]).unwrap(),
            PeriodicEdge::new(0, 0, [1, 0, 0]).unwrap(),
        ];
        let graph = PeriodicGraph::new(2, edges);
        assert_eq!(graph.degrees(), vec![3, 1]);
    }

    #[test]
    fn test_graph_edge_multiset_roundtrip() {
        let edges = vec![
            PeriodicEdge::new(1, 0, [0, 0, -1]).unwrap(),
            PeriodicEdge::new(0, 1, [0, 0, 0]).unwrap(),
            PeriodicEdge::new(0, 1, [0, 0, 0]).unwrap(), // 平行边保留
        ];
        let graph = PeriodicGraph::new(2, edges);
        let rebuilt = PeriodicGraph::new(2, graph.edges().to_vec());
        assert_eq!(graph, rebuilt);
        assert_eq!(rebuilt.edges().len(), 3);
    }

    #[test]
    fn test_adjacency_both_directions() {
        let edges = vec![PeriodicEdge::new(0, 1, [1, 0, 0]).unwrap()];
        let graph = PeriodicGraph::new(2, edges);
        let adj = graph.adjacency();
        assert_eq!(adj[0], vec![(1, [1, 0, 0])]);
        assert_eq!(adj[1], vec![(0, [-1, 0, 0])]);
    }
}
