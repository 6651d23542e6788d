//! Results persistence module

use crate::cluster::{ClusterSummary, Partition};
use crate::validate::ValidationReport;
use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save a partition and its cluster summaries to the output directory
pub fn save_clustering(
    partition: &Partition,
    summaries: &[ClusterSummary],
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", summaries.len(), output_dir);

    fs::create_dir_all(output_dir)?;

    save_partition(partition, output_dir)?;
    save_summary(partition, summaries, output_dir)?;
    save_clusters(summaries, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save the paper-id -> label mapping
fn save_partition(partition: &Partition, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("partition.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(partition)?.as_bytes())?;
    Ok(())
}

/// Save summary statistics across all clusters
fn save_summary(
    partition: &Partition,
    summaries: &[ClusterSummary],
    output_dir: &str,
) -> Result<()> {
    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let summary = json!({
        "paper_count": partition.len(),
        "cluster_count": summaries.len(),
        "largest_cluster_size": summaries.first().map_or(0, |s| s.size),
        "smallest_cluster_size": summaries.last().map_or(0, |s| s.size),
        "avg_cluster_size": partition.len() as f64 /
                            if summaries.is_empty() { 1.0 } else { summaries.len() as f64 },
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save one file per cluster plus an index of all clusters
fn save_clusters(summaries: &[ClusterSummary], output_dir: &str) -> Result<()> {
    let clusters_dir = Path::new(output_dir).join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    for summary in summaries {
        let path = clusters_dir.join(format!("cluster_{}.json", summary.label));
        let mut file = File::create(path)?;
        file.write_all(to_string_pretty(summary)?.as_bytes())?;
    }

    let index_path = Path::new(output_dir).join("all_clusters.json");
    let mut index_file = File::create(index_path)?;

    let index = json!({
        "clusters": summaries.iter().map(|s| {
            json!({
                "label": s.label,
                "size": s.size,
                "top_entities": s.top_entities,
            })
        }).collect::<Vec<_>>()
    });

    index_file.write_all(to_string_pretty(&index)?.as_bytes())?;

    Ok(())
}

/// Save a validation report
pub fn save_validation(report: &ValidationReport, output_dir: &str) -> Result<()> {
    log::info!("Saving validation report to {}", output_dir);

    fs::create_dir_all(output_dir)?;

    let path = Path::new(output_dir).join("validation.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(report)?.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{self, partition};
    use crate::data::Paper;
    use crate::graph::build_graph;

    fn corpus() -> Vec<Paper> {
        vec![
            Paper::new("a", ["x".to_string(), "y".to_string()]),
            Paper::new("b", ["x".to_string(), "y".to_string()]),
            Paper::new("c", ["z".to_string()]),
        ]
    }

    #[test]
    fn test_clustering_round_trip() {
        let papers = corpus();
        let graph = build_graph(&papers).unwrap();
        let part = partition(&graph, 1.0, 42).unwrap();
        let summaries = cluster::summarize(&papers, &part, 10);

        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        save_clustering(&part, &summaries, dir_str).unwrap();

        let raw = fs::read_to_string(dir.path().join("partition.json")).unwrap();
        let restored: Partition = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, part);

        assert!(dir.path().join("summary.json").exists());
        assert!(dir.path().join("all_clusters.json").exists());
        for summary in &summaries {
            assert!(dir
                .path()
                .join("clusters")
                .join(format!("cluster_{}.json", summary.label))
                .exists());
        }
    }
}
