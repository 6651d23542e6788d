//! Partitions, cluster labels and summaries

pub mod leiden;
pub mod metrics;
pub mod subcluster;

pub use leiden::{Leiden, Partitioner};
pub use subcluster::subcluster;

use crate::data::{Paper, PaperId};
use crate::error::Result;
use crate::graph::SimilarityGraph;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Cluster label, either a top-level integer (`"3"`) or a dot-separated
/// hierarchical id (`"3.1"`, `"3.1.0"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterLabel(String);

impl ClusterLabel {
    /// Top-level label for cluster `n`
    pub fn root(n: usize) -> Self {
        Self(n.to_string())
    }

    /// Child label `"{self}.{n}"`
    pub fn child(&self, n: usize) -> Self {
        Self(format!("{}.{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClusterLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A total mapping from paper id to cluster label.
///
/// Every paper in the partition's domain appears exactly once. Labels are
/// deterministic for a fixed seed but not guaranteed stable across reruns
/// with different seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    assignments: BTreeMap<PaperId, ClusterLabel>,
}

impl Partition {
    pub fn new(assignments: BTreeMap<PaperId, ClusterLabel>) -> Self {
        Self { assignments }
    }

    /// Number of papers covered
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Label assigned to a paper, if it is in the domain
    pub fn get(&self, id: &str) -> Option<&ClusterLabel> {
        self.assignments.get(id)
    }

    /// Iterate `(paper id, label)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&PaperId, &ClusterLabel)> {
        self.assignments.iter()
    }

    /// Distinct labels in sorted order
    pub fn labels(&self) -> Vec<&ClusterLabel> {
        self.assignments.values().unique().sorted().collect()
    }

    /// Ids assigned to `label`, in id order
    pub fn members(&self, label: &ClusterLabel) -> Vec<&PaperId> {
        self.assignments
            .iter()
            .filter(|(_, l)| *l == label)
            .map(|(id, _)| id)
            .collect()
    }

    /// Paper count per label
    pub fn cluster_sizes(&self) -> BTreeMap<ClusterLabel, usize> {
        let mut sizes = BTreeMap::new();
        for label in self.assignments.values() {
            *sizes.entry(label.clone()).or_insert(0) += 1;
        }
        sizes
    }
}

/// Read-only view of one cluster: its members and most frequent entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub label: ClusterLabel,
    pub size: usize,
    pub members: Vec<PaperId>,

    /// Most frequent entities among members, ties broken by the order in
    /// which entities were first seen during aggregation
    pub top_entities: Vec<String>,
}

/// Partition a similarity graph into entity-based clusters.
///
/// Runs seeded Leiden community detection and assigns top-level integer
/// labels by first appearance in node order. Fixing the graph, resolution
/// and seed yields identical output across runs.
pub fn partition(graph: &SimilarityGraph, resolution: f64, seed: u64) -> Result<Partition> {
    let detector = Leiden::new(resolution, seed)?;
    let communities = detector.partition(graph)?;

    let assignments = graph
        .paper_ids()
        .zip(communities.iter())
        .map(|(id, &c)| (id.clone(), ClusterLabel::root(c)))
        .collect();

    Ok(Partition::new(assignments))
}

/// Summarize every cluster of a partition, largest first.
pub fn summarize(papers: &[Paper], partition: &Partition, top_entities: usize) -> Vec<ClusterSummary> {
    let mut summaries: Vec<ClusterSummary> = partition
        .labels()
        .into_iter()
        .map(|label| {
            let members: Vec<PaperId> = partition.members(label).into_iter().cloned().collect();

            // Count entities preserving first-seen order for tie-breaking
            let mut order: Vec<(String, usize)> = Vec::new();
            let mut positions: HashMap<&str, usize> = HashMap::new();
            for paper in papers.iter().filter(|p| partition.get(&p.id) == Some(label)) {
                for entity in &paper.entities {
                    match positions.get(entity.as_str()) {
                        Some(&pos) => order[pos].1 += 1,
                        None => {
                            positions.insert(entity.as_str(), order.len());
                            order.push((entity.clone(), 1));
                        }
                    }
                }
            }
            // Stable sort keeps first-seen order among equal counts
            order.sort_by(|a, b| b.1.cmp(&a.1));

            ClusterSummary {
                label: label.clone(),
                size: members.len(),
                members,
                top_entities: order
                    .into_iter()
                    .take(top_entities)
                    .map(|(e, _)| e)
                    .collect(),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.size.cmp(&a.size));
    summaries
}

/// Ids of papers carrying a given entity (case-insensitive)
pub fn papers_with_entity(papers: &[Paper], entity: &str) -> Vec<PaperId> {
    let needle = entity.to_lowercase();
    papers
        .iter()
        .filter(|p| p.entities.contains(&needle))
        .map(|p| p.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;

    fn paper(id: &str, entities: &[&str]) -> Paper {
        Paper::new(id, entities.iter().map(|e| e.to_string()))
    }

    fn corpus() -> Vec<Paper> {
        vec![
            paper("A", &["x", "y"]),
            paper("B", &["x", "y"]),
            paper("C", &["x"]),
            paper("D", &["z"]),
            paper("E", &["z"]),
            paper("F", &[]),
        ]
    }

    #[test]
    fn test_labels_compose() {
        let label = ClusterLabel::root(3).child(1).child(0);
        assert_eq!(label.as_str(), "3.1.0");
    }

    #[test]
    fn test_partition_covers_every_paper_once() {
        let papers = corpus();
        let graph = build_graph(&papers).unwrap();
        let part = partition(&graph, 1.0, 42).unwrap();

        assert_eq!(part.len(), papers.len());
        for p in &papers {
            assert!(part.get(&p.id).is_some());
        }
    }

    #[test]
    fn test_partition_is_deterministic() {
        let papers = corpus();
        let graph = build_graph(&papers).unwrap();
        let first = partition(&graph, 1.0, 42).unwrap();
        let graph2 = build_graph(&papers).unwrap();
        let second = partition(&graph2, 1.0, 42).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shared_entity_grouping() {
        // {A,B,C} together, {D,E} together, F alone or trivially merged
        let papers = corpus();
        let graph = build_graph(&papers).unwrap();
        let part = partition(&graph, 1.0, 42).unwrap();

        assert_eq!(part.get("A"), part.get("B"));
        assert_eq!(part.get("A"), part.get("C"));
        assert_eq!(part.get("D"), part.get("E"));
        assert_ne!(part.get("A"), part.get("D"));

        let n_clusters = part.labels().len();
        assert!((2..=3).contains(&n_clusters), "got {} clusters", n_clusters);
    }

    #[test]
    fn test_summaries_rank_entities_with_first_seen_ties() {
        let papers = corpus();
        let graph = build_graph(&papers).unwrap();
        let part = partition(&graph, 1.0, 42).unwrap();
        let summaries = summarize(&papers, &part, 10);

        // Largest cluster first
        assert_eq!(summaries[0].size, 3);
        // x appears 3 times, y twice
        assert_eq!(summaries[0].top_entities[0], "x");
        assert_eq!(summaries[0].top_entities[1], "y");
    }

    #[test]
    fn test_papers_with_entity() {
        let papers = corpus();
        assert_eq!(papers_with_entity(&papers, "Z"), vec!["D", "E"]);
        assert!(papers_with_entity(&papers, "missing").is_empty());
    }
}
