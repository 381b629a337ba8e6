//! # 批量结果报告
//!
//! 终端汇总输出与逐网结局的 CSV 导出。
//!
//! ## 依赖关系
//! - 被库使用者调用
//! - 使用 `utils/output.rs` 打印状态行
//! - 使用 `tabled` 排版失败明细、`csv` 写出数据文件

use crate::batch::BatchSummary;
use crate::error::{Result, TopokitError};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 失败明细表格的一行
#[derive(Debug, Clone, Tabled)]
struct FailureRow {
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// 终端打印批量汇总
pub fn print_summary(summary: &BatchSummary) {
    output::print_header("Net Reconstruction Summary");

    output::print_success(&format!(
        "{} of {} nets reconstructed",
        summary.solved.len(),
        summary.total()
    ));
    if !summary.symmetry_mismatches.is_empty() {
        output::print_warning(&format!(
            "{} nets with symmetry label discrepancies: {}",
            summary.symmetry_mismatches.len(),
            summary.symmetry_mismatches.join(", ")
        ));
    }

    let mut rows: Vec<FailureRow> = summary
        .unsolved
        .iter()
        .map(|net| FailureRow {
            net: net.clone(),
            kind: "unsolved".to_string(),
            detail: "all strategies declined".to_string(),
        })
        .collect();
    rows.extend(summary.errors.iter().map(|(net, message)| FailureRow {
        net: net.clone(),
        kind: "error".to_string(),
        detail: message.clone(),
    }));

    if rows.is_empty() {
        return;
    }
    output::print_warning(&format!("{} nets not reconstructed:", rows.len()));
    let shown = rows.len().min(20);
    println!("{}", Table::new(&rows[..shown]));
    if rows.len() > shown {
        output::print_warning(&format!("  ... and {} more", rows.len() - shown));
    }
    output::print_separator();
}

/// 导出逐网结局到 CSV：name, status, vertices, edges, detail
pub fn export_outcomes_csv(summary: &BatchSummary, output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path).map_err(TopokitError::CsvError)?;

    writer.write_record(["name", "status", "vertices", "edges", "detail"])?;
    for (name, graph) in &summary.solved {
        let vertices = graph.vertex_count().to_string();
        let edges = graph.edges().len().to_string();
        writer.write_record([name.as_str(), "solved", vertices.as_str(), edges.as_str(), ""])?;
    }
    for name in &summary.unsolved {
        writer.write_record([name.as_str(), "unsolved", "", "", ""])?;
    }
    for (name, message) in &summary.errors {
        writer.write_record([name.as_str(), "error", "", "", message.as_str()])?;
    }

    writer.flush().map_err(|e| TopokitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeriodicEdge, PeriodicGraph};

    fn sample_summary() -> BatchSummary {
        let mut summary = BatchSummary::default();
        summary.solved.insert(
            "pcu".to_string(),
            PeriodicGraph::new(
                1,
                vec![
                    PeriodicEdge::new(0, 0, [1, 0, 0]).unwrap(),
                    PeriodicEdge::new(0, 0, [0, 1, 0]).unwrap(),
                    PeriodicEdge::new(0, 0, [0, 0, 1]).unwrap(),
                ],
            ),
        );
        summary.unsolved.push("weird".to_string());
        summary
            .errors
            .push(("broken".to_string(), "duplicate vertices".to_string()));
        summary
    }

    #[test]
    fn test_export_outcomes_csv() {
        let dir = std::env::temp_dir();
        let path = dir.join("topokit_outcomes_test.csv");
        export_outcomes_csv(&sample_summary(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "name,status,vertices,edges,detail");
        assert_eq!(lines[1], "pcu,solved,1,3,");
        assert_eq!(lines[2], "weird,unsolved,,,");
        assert!(lines[3].starts_with("broken,error,"));

        std::fs::remove_file(&path).ok();
    }
}
