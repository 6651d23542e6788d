//! Hierarchical sub-clustering within one existing cluster

use crate::cluster::{self, ClusterLabel, Partition};
use crate::data::Paper;
use crate::error::{ClusterError, Result};
use crate::graph::build_graph;
use std::collections::{BTreeMap, HashSet};

/// Partition the members of one cluster into finer sub-clusters.
///
/// The subset graph is rebuilt from scratch rather than sliced out of the
/// parent graph: two papers may share entities that never mattered against
/// the rest of the corpus, and a slice of precomputed parent edges would
/// drop that signal.
///
/// If the subset turns out to have no finer structure (a single community),
/// every member keeps the literal parent label; otherwise members get
/// labels of the form `"{label}.{child}"`. The same operation can be
/// applied again to a child label, with no depth limit.
pub fn subcluster(
    papers: &[Paper],
    label: &ClusterLabel,
    partition: &Partition,
    resolution: f64,
    seed: u64,
) -> Result<Partition> {
    let member_ids: HashSet<&str> = partition
        .iter()
        .filter(|(_, l)| *l == label)
        .map(|(id, _)| id.as_str())
        .collect();

    if member_ids.is_empty() {
        return Err(ClusterError::LabelNotFound {
            label: label.to_string(),
        });
    }
    if member_ids.len() < 2 {
        return Err(ClusterError::TooFewMembers {
            label: label.to_string(),
            found: member_ids.len(),
        });
    }

    // Keep corpus order so node numbering stays deterministic
    let subset: Vec<Paper> = papers
        .iter()
        .filter(|p| member_ids.contains(p.id.as_str()))
        .cloned()
        .collect();

    log::info!(
        "Sub-clustering cluster {} ({} papers, resolution {})",
        label,
        subset.len(),
        resolution
    );

    let graph = build_graph(&subset)?;
    let child_partition = cluster::partition(&graph, resolution, seed)?;

    let distinct = child_partition.labels().len();
    if distinct <= 1 {
        // No further structure found; report the parent label unchanged
        log::info!("Cluster {} has no finer structure", label);
        let assignments: BTreeMap<_, _> = subset
            .iter()
            .map(|p| (p.id.clone(), label.clone()))
            .collect();
        return Ok(Partition::new(assignments));
    }

    log::info!("Cluster {} split into {} sub-clusters", label, distinct);

    let assignments: BTreeMap<_, _> = child_partition
        .iter()
        .map(|(id, child)| {
            // Child labels are top-level integers from the nested partition
            let n: usize = child.as_str().parse().unwrap_or(0);
            (id.clone(), label.child(n))
        })
        .collect();

    Ok(Partition::new(assignments))
}
