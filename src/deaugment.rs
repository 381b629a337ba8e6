//! # 去增广：环簇坍缩
//!
//! 增广网把基网的每个顶点替换成一圈装饰顶点。当基网 X 直接
//! 重建失败而增广网 X-a 成功时，把 X-a 图中的环簇坍缩成单个
//! 顶点即可还原基网候选图，再交由配位序列校验定夺。
//!
//! ## 算法概述
//! 1. 环归属：逐顶点枚举覆盖图中经过它的简单环（长度 2..=8）。
//!    覆盖图中同一顶点可经不同周期镜像被重访，因此用显式栈
//!    而非朴素递归，并以 (顶点, 偏移) 覆盖节点判重。
//! 2. 聚簇：按最小环长升序取种子；工作队列逐环吸收，环内
//!    偏移沿环累加传播。环触及其他簇的顶点、或以不一致偏移
//!    回到本簇时整环丢弃。吸收上限为种子最小环长 + 2。
//! 3. 退化保护：首轮把所有顶点并成单簇时重置访问标记，
//!    以零裕度（只用最小长度环）重试一轮。
//! 4. 归约：每簇一个顶点；原边映射为
//!    (簇(u), 簇(v), 偏移 + 簇内偏移(u) - 簇内偏移(v))，
//!    零偏移自环（被吸收进簇内的键）丢弃。
//!
//! ## 依赖关系
//! - 被 `batch/` 调用
//! - 使用 `models/graph.rs`

use crate::models::{offset_add, offset_neg, offset_sub, PeriodicEdge, PeriodicGraph};
use std::collections::{HashSet, VecDeque};

/// 环搜索的最大边数
const MAX_RING_SIZE: usize = 8;

/// 吸收上限在种子最小环长上的裕度
const RING_SLACK: usize = 2;

/// 覆盖图节点
type CoverNode = (usize, [i32; 3]);

/// 一个简单环：成员以归属顶点 (偏移 0) 开头，按环序排列
#[derive(Debug, Clone)]
struct Ring {
    members: Vec<CoverNode>,
}

/// 把环簇坍缩为基网候选图
pub fn deaugment(graph: &PeriodicGraph) -> PeriodicGraph {
    let n = graph.vertex_count();
    if n == 0 {
        return graph.clone();
    }

    let adjacency = edge_indexed_adjacency(graph);
    let rings: Vec<Vec<Ring>> = (0..n).map(|v| rings_through(&adjacency, v)).collect();
    let min_ring: Vec<usize> = rings
        .iter()
        .map(|r| r.iter().map(|ring| ring.members.len()).min().unwrap_or(usize::MAX))
        .collect();

    let mut assignment = cluster(&rings, &min_ring, n, RING_SLACK);
    if assignment.cluster_count == 1 && n > 1 {
        // 病态的整体坍缩：只用最小长度环重试一轮
        let retry = cluster(&rings, &min_ring, n, 0);
        if retry.cluster_count > 1 {
            assignment = retry;
        }
    }

    reduce(graph, &assignment)
}

/// 带边编号的覆盖图邻接表：(邻居, 步进偏移, 边编号)
fn edge_indexed_adjacency(graph: &PeriodicGraph) -> Vec<Vec<(usize, [i32; 3], usize)>> {
    let mut adjacency = vec![Vec::new(); graph.vertex_count()];
    for (id, edge) in graph.edges().iter().enumerate() {
        adjacency[edge.source].push((edge.target, edge.offset, id));
        adjacency[edge.target].push((edge.source, offset_neg(edge.offset), id));
    }
    adjacency
}

/// 枚举经过 (root, 0) 的全部简单环，长度不超过 MAX_RING_SIZE。
///
/// 每个环会沿两个方向各被走到一次，用方向规范化去重；长度 2
/// 的环要求往返使用不同的平行边。
fn rings_through(adjacency: &[Vec<(usize, [i32; 3], usize)>], root: usize) -> Vec<Ring> {
    let origin: CoverNode = (root, [0, 0, 0]);
    let mut found: HashSet<Vec<CoverNode>> = HashSet::new();

    // 显式深度优先栈：(当前节点, 到达所用边, 到达步进, 路径深度)
    struct Frame {
        node: CoverNode,
        arrived_edge: usize,
        arrived_step: [i32; 3],
        depth: usize,
    }

    let mut path: Vec<CoverNode> = vec![origin];
    let mut stack: Vec<Frame> = Vec::new();
    for &(neighbor, step, edge) in &adjacency[root] {
        stack.push(Frame {
            node: (neighbor, step),
            arrived_edge: edge,
            arrived_step: step,
            depth: 1,
        });
    }

    while let Some(frame) = stack.pop() {
        path.truncate(frame.depth);
        if frame.node == origin || path.contains(&frame.node) {
            continue;
        }
        path.push(frame.node);

        let (vertex, offset) = frame.node;
        for &(neighbor, step, edge) in &adjacency[vertex] {
            let next: CoverNode = (neighbor, offset_add(offset, step));
            if next == origin {
                // 闭合：长度 2 时禁止原边折返
                let backtrack = path.len() == 2
                    && edge == frame.arrived_edge
                    && step == offset_neg(frame.arrived_step);
                if !backtrack {
                    found.insert(canonical_cycle(&path));
                }
            } else if path.len() < MAX_RING_SIZE && !path.contains(&next) {
                stack.push(Frame {
                    node: next,
                    arrived_edge: edge,
                    arrived_step: step,
                    depth: path.len(),
                });
            }
        }
    }

    found
        .into_iter()
        .map(|members| Ring { members })
        .collect()
}

/// 方向规范化：取正走与反走的字典序较小者
fn canonical_cycle(path: &[CoverNode]) -> Vec<CoverNode> {
    let forward = path.to_vec();
    let mut backward = vec![path[0]];
    backward.extend(path[1..].iter().rev().copied());
    forward.min(backward)
}

/// 聚簇结果：顶点 -> (簇编号, 簇内偏移)
struct Clustering {
    cluster_of: Vec<usize>,
    shift: Vec<[i32; 3]>,
    cluster_count: usize,
}

fn cluster(rings: &[Vec<Ring>], min_ring: &[usize], n: usize, slack: usize) -> Clustering {
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&v| (min_ring[v], v));

    let mut visited = vec![false; n];
    let mut cluster_of = vec![0usize; n];
    let mut shift = vec![[0i32; 3]; n];
    let mut cluster_count = 0usize;

    for &seed in &order {
        if visited[seed] {
            continue;
        }
        let cid = cluster_count;
        cluster_count += 1;
        visited[seed] = true;
        cluster_of[seed] = cid;
        shift[seed] = [0, 0, 0];

        if min_ring[seed] == usize::MAX {
            continue; // 无环顶点自成一簇
        }
        let limit = min_ring[seed] + slack;

        // 工作队列：(环的归属顶点, 环下标, 累计偏移)
        let mut work: VecDeque<(usize, usize, [i32; 3])> = VecDeque::new();
        for (idx, ring) in rings[seed].iter().enumerate() {
            if ring.members.len() <= limit {
                work.push_back((seed, idx, [0, 0, 0]));
            }
        }

        while let Some((owner, idx, base)) = work.pop_front() {
            let ring = &rings[owner][idx];

            // 触及他簇顶点、或以不一致偏移回到本簇的环整体丢弃
            let consistent = ring.members.iter().all(|&(w, o)| {
                !visited[w] || (cluster_of[w] == cid && shift[w] == offset_add(base, o))
            });
            if !consistent {
                continue;
            }

            for &(w, o) in &ring.members {
                if visited[w] {
                    continue;
                }
                visited[w] = true;
                cluster_of[w] = cid;
                shift[w] = offset_add(base, o);
                for (ridx, r) in rings[w].iter().enumerate() {
                    if r.members.len() <= limit {
                        work.push_back((w, ridx, shift[w]));
                    }
                }
            }
        }
    }

    Clustering {
        cluster_of,
        shift,
        cluster_count,
    }
}

/// 按簇归约：簇内零偏移自环丢弃，其余边重定位到簇顶点
fn reduce(graph: &PeriodicGraph, assignment: &Clustering) -> PeriodicGraph {
    let mut edges = Vec::new();
    for edge in graph.edges() {
        let cu = assignment.cluster_of[edge.source];
        let cv = assignment.cluster_of[edge.target];
        let offset = offset_add(
            edge.offset,
            offset_sub(assignment.shift[edge.source], assignment.shift[edge.target]),
        );
        if let Some(mapped) = PeriodicEdge::new(cu, cv, offset) {
            edges.push(mapped);
        }
    }
    PeriodicGraph::new(assignment.cluster_count, edges)
}
