//! # 图重建模块
//!
//! 从网记录推断周期图。三种互相独立的边推断策略按固定优先级
//! 组成策略链（有序的纯函数列表，而非继承或动态分派）：
//!
//! 1. `closest`     - 最近邻：逐顶点取恰好配位数个最近镜像
//! 2. `symmetry`    - 对称轨道：边中点播种 + 对称操作生成全轨道
//! 3. `progressive` - 渐进指派：按游标窗口做有界组合搜索
//!
//! 首个通过配位序列校验的候选图即为结果；全部失败为软失败
//! （对部分合法输入是预期结果）；输入不变量被破坏为硬失败。
//!
//! ## 依赖关系
//! - 被 `batch/` 调用
//! - 使用 `models/`、`geometry/`、`topology.rs`

pub mod closest;
pub mod progressive;
pub mod symmetry;

use crate::error::{Result, TopokitError};
use crate::geometry::CellMetric;
use crate::models::{apply_row, position_key, NetRecord, PeriodicGraph};
use crate::topology;
use std::collections::HashMap;

/// 重建选项
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// 边中点播种时的端点并列容差（Å）
    pub seed_tolerance: f64,
    /// 允许边中点计数不一致的已知不规则网名单
    pub irregular: Vec<String>,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        ReconstructOptions {
            seed_tolerance: 0.1,
            irregular: Vec::new(),
        }
    }
}

/// 策略共享的重建上下文
pub(crate) struct NetContext<'a> {
    pub record: &'a NetRecord,
    /// 折叠到 [0,1) 的顶点分数坐标
    pub positions: Vec<[f64; 3]>,
    /// 边中点分数坐标
    pub midpoints: Vec<[f64; 3]>,
    pub metric: CellMetric,
    pub seed_tolerance: f64,
}

impl<'a> NetContext<'a> {
    /// 顶点 i 的目标配位数（目标序列首项）
    pub fn coordination(&self, i: usize) -> usize {
        self.record.targets[i][0] as usize
    }
}

/// 以默认选项重建单个网记录
pub fn reconstruct(record: &NetRecord) -> Result<Option<PeriodicGraph>> {
    reconstruct_with(record, &ReconstructOptions::default())
}

/// 重建单个网记录。
///
/// - `Ok(Some(graph))`：某个策略的候选图通过了指纹校验
/// - `Ok(None)`：所有策略失败（软失败）
/// - `Err(..)`：记录不变量被破坏（硬失败）
pub fn reconstruct_with(
    record: &NetRecord,
    options: &ReconstructOptions,
) -> Result<Option<PeriodicGraph>> {
    let context = build_context(record, options)?;

    let strategies: [fn(&NetContext) -> Option<PeriodicGraph>; 3] = [
        closest::from_nearest_neighbors,
        symmetry::from_symmetry_orbit,
        progressive::from_progressive_search,
    ];

    for strategy in strategies {
        if let Some(graph) = strategy(&context) {
            if topology::matches_targets(&graph, &record.targets) {
                return Ok(Some(graph));
            }
        }
    }
    Ok(None)
}

/// 构建上下文并检查记录不变量
fn build_context<'a>(
    record: &'a NetRecord,
    options: &ReconstructOptions,
) -> Result<NetContext<'a>> {
    if record.vertices.len() != record.targets.len() {
        return Err(TopokitError::VertexCountMismatch {
            net: record.name.clone(),
            vertices: record.vertices.len(),
            sequences: record.targets.len(),
        });
    }

    let inverse = record.lattice.inverse()?;
    let to_frac = |cart: &[f64; 3]| -> [f64; 3] {
        let frac = apply_row(&inverse, *cart);
        [
            frac[0].rem_euclid(1.0),
            frac[1].rem_euclid(1.0),
            frac[2].rem_euclid(1.0),
        ]
    };

    let positions: Vec<[f64; 3]> = record.vertices.iter().map(to_frac).collect();
    let midpoints: Vec<[f64; 3]> = record.edge_midpoints.iter().map(to_frac).collect();

    // 取整后的顶点坐标必须两两不同
    let mut seen: HashMap<[i64; 3], usize> = HashMap::new();
    for (i, p) in positions.iter().enumerate() {
        if let Some(&j) = seen.get(&position_key(*p)) {
            return Err(TopokitError::DuplicateVertex {
                net: record.name.clone(),
                first: j,
                second: i,
            });
        }
        seen.insert(position_key(*p), i);
    }

    // 边中点计数与配位数之和必须一致（白名单内的已知不规则记录除外）
    if !record.edge_midpoints.is_empty() && !options.irregular.contains(&record.name) {
        let sum = record.coordination_sum();
        if record.edge_midpoints.len() * 2 != sum {
            return Err(TopokitError::EdgeCountMismatch {
                net: record.name.clone(),
                midpoints: record.edge_midpoints.len(),
                expected: sum / 2,
            });
        }
    }

    Ok(NetContext {
        record,
        positions,
        midpoints,
        metric: CellMetric::new(&record.lattice),
        seed_tolerance: options.seed_tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoordinationSequence, Lattice, PeriodicEdge, SHELL_DEPTH};
    use crate::topology::coordination_sequence;

    fn cubic(a: f64) -> Lattice {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    fn pcu_targets() -> Vec<CoordinationSequence> {
        let mut seq = [0u32; SHELL_DEPTH];
        for (i, shell) in seq.iter_mut().enumerate() {
            let n = (i + 1) as u32;
            *shell = 4 * n * n + 2;
        }
        vec![seq]
    }

    fn pcu_record() -> NetRecord {
        NetRecord::new("pcu", cubic(5.0), vec![[0.0, 0.0, 0.0]], pcu_targets())
    }

    #[test]
    fn test_reconstruct_pcu() {
        let graph = reconstruct(&pcu_record()).unwrap().expect("pcu should solve");
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.degrees(), vec![6]);
    }

    #[test]
    fn test_strategy_priority_is_nearest_neighbor_first() {
        // 最近邻策略成功时，链式结果与其单独输出一致
        let record = pcu_record();
        let options = ReconstructOptions::default();
        let context = build_context(&record, &options).unwrap();

        let direct = closest::from_nearest_neighbors(&context).expect("strategy should succeed");
        let chained = reconstruct(&record).unwrap().unwrap();
        assert_eq!(direct, chained);
    }

    #[test]
    fn test_duplicate_vertices_is_hard_failure() {
        // 第二个顶点与第一个仅差取整精度以下
        let record = NetRecord::new(
            "bad",
            cubic(10.0),
            vec![[0.0, 0.0, 0.0], [1e-7, 0.0, 0.0]],
            vec![pcu_targets()[0], pcu_targets()[0]],
        );
        assert!(matches!(
            reconstruct(&record),
            Err(TopokitError::DuplicateVertex { .. })
        ));
    }

    #[test]
    fn test_vertex_count_mismatch_is_hard_failure() {
        let record = NetRecord::new(
            "bad",
            cubic(10.0),
            vec![[0.0, 0.0, 0.0], [5.0, 5.0, 5.0]],
            pcu_targets(),
        );
        assert!(matches!(
            reconstruct(&record),
            Err(TopokitError::VertexCountMismatch { .. })
        ));
    }

    #[test]
    fn test_midpoint_count_mismatch_and_whitelist() {
        let mut record = pcu_record().with_midpoints(vec![[2.5, 0.0, 0.0]]);
        // pcu 应有 3 条边，只给 1 个中点：硬失败
        assert!(matches!(
            reconstruct(&record),
            Err(TopokitError::EdgeCountMismatch { .. })
        ));

        // 白名单放行后仍可由其余策略求解
        record.symmetry_ops = vec![crate::models::SymmetryOp::identity()];
        let options = ReconstructOptions {
            irregular: vec!["pcu".to_string()],
            ..Default::default()
        };
        let graph = reconstruct_with(&record, &options).unwrap();
        assert!(graph.is_some());
    }

    #[test]
    fn test_unsolvable_record_is_soft_failure() {
        // 单顶点配 8 配位目标：候选不足，所有策略应干净地失败
        let dia_like = {
            let edges = vec![
                PeriodicEdge::new(0, 0, [1, 1, 1]).unwrap(),
                PeriodicEdge::new(0, 0, [1, 1, -1]).unwrap(),
                PeriodicEdge::new(0, 0, [1, -1, 1]).unwrap(),
                PeriodicEdge::new(0, 0, [-1, 1, 1]).unwrap(),
            ];
            crate::models::PeriodicGraph::new(1, edges)
        };
        let targets = vec![coordination_sequence(&dia_like.adjacency(), 0)];
        assert_eq!(targets[0][0], 8);

        let record = NetRecord::new("bcu", cubic(10.0), vec![[0.0, 0.0, 0.0]], targets);
        assert_eq!(reconstruct(&record).unwrap(), None);
    }
}
