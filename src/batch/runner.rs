//! # 批量重建执行器
//!
//! 在固定大小的 rayon 线程池上并行重建一批网记录：每个网一个
//! 逻辑任务，互不阻塞；各任务结果由池内收集、池排空后统一
//! 合并，避免工作线程间的锁竞争。单个网内部的 panic 被捕获并
//! 记成该网的硬失败，不会中断整批。
//!
//! 第二阶段做去增广补救：对每个直接重建失败的网 X，若 X-a 已
//! 成功，则坍缩 X-a 的图并用 X 的目标序列校验。除此之外没有
//! 任何批级重试。
//!
//! ## 依赖关系
//! - 使用 `reconstruct/`、`deaugment.rs`、`topology.rs`
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::deaugment::deaugment;
use crate::models::{NetRecord, PeriodicGraph};
use crate::reconstruct::{reconstruct_with, ReconstructOptions};
use crate::topology;
use crate::utils::progress;

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// 单个网的重建结局
#[derive(Debug, Clone)]
pub enum NetOutcome {
    /// 某策略的候选图通过校验
    Solved(PeriodicGraph),
    /// 所有策略失败（软失败，合法输入的预期结局之一）
    Unsolved,
    /// 记录不变量被破坏或内部 panic（硬失败）
    Failed(String),
}

/// 批量重建汇总
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 网名 -> 重建出的周期图
    pub solved: BTreeMap<String, PeriodicGraph>,
    /// 所有策略失败的网名
    pub unsolved: Vec<String>,
    /// 硬失败：(网名, 错误信息)
    pub errors: Vec<(String, String)>,
    /// 声明对称标签与空间群编号不一致的网名
    pub symmetry_mismatches: Vec<String>,
}

impl BatchSummary {
    /// 处理过的网总数
    pub fn total(&self) -> usize {
        self.solved.len() + self.unsolved.len() + self.errors.len()
    }
}

/// 批量重建执行器
pub struct ReconstructionRunner {
    /// 并行作业数（0 = 自动）
    jobs: usize,
    options: ReconstructOptions,
}

impl ReconstructionRunner {
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            options: ReconstructOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconstructOptions) -> Self {
        self.options = options;
        self
    }

    /// 并行重建整批记录
    pub fn run(&self, records: &[NetRecord]) -> BatchSummary {
        let pb = progress::create_bar(records.len() as u64, "Reconstructing nets");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .unwrap();

        let outcomes: Vec<NetOutcome> = pool.install(|| {
            records
                .par_iter()
                .map(|record| {
                    let result = catch_unwind(AssertUnwindSafe(|| {
                        reconstruct_with(record, &self.options)
                    }));
                    pb.inc(1);
                    match result {
                        Ok(Ok(Some(graph))) => NetOutcome::Solved(graph),
                        Ok(Ok(None)) => NetOutcome::Unsolved,
                        Ok(Err(e)) => NetOutcome::Failed(e.to_string()),
                        Err(_) => NetOutcome::Failed("panic during reconstruction".to_string()),
                    }
                })
                .collect()
        });
        pb.finish_and_clear();

        // 池排空后统一合并
        let mut summary = BatchSummary::default();
        for (record, outcome) in records.iter().zip(outcomes) {
            if record.symmetry_mismatch {
                summary.symmetry_mismatches.push(record.name.clone());
            }
            match outcome {
                NetOutcome::Solved(graph) => {
                    summary.solved.insert(record.name.clone(), graph);
                }
                NetOutcome::Unsolved => summary.unsolved.push(record.name.clone()),
                NetOutcome::Failed(message) => summary.errors.push((record.name.clone(), message)),
            }
        }

        self.rescue_by_deaugmentation(records, &mut summary);
        summary
    }

    /// 去增广补救：X 失败而 X-a 成功时，坍缩 X-a 的图交给 X 校验
    fn rescue_by_deaugmentation(&self, records: &[NetRecord], summary: &mut BatchSummary) {
        if summary.unsolved.is_empty() {
            return;
        }
        let spinner = progress::create_spinner("Deaugmenting unsolved nets");

        let by_name: BTreeMap<&str, &NetRecord> =
            records.iter().map(|r| (r.name.as_str(), r)).collect();

        let mut rescued: Vec<(String, PeriodicGraph)> = Vec::new();
        for name in &summary.unsolved {
            let Some(augmented) = summary.solved.get(&format!("{}-a", name)) else {
                continue;
            };
            let Some(record) = by_name.get(name.as_str()) else {
                continue;
            };
            let reduced = deaugment(augmented);
            if topology::matches_targets(&reduced, &record.targets) {
                rescued.push((name.clone(), reduced));
            }
        }

        for (name, graph) in rescued {
            summary.unsolved.retain(|n| n != &name);
            summary.solved.insert(name, graph);
        }
        spinner.finish_and_clear();
    }
}
