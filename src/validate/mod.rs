//! Citation-based cross-validation of entity clusters
//!
//! Builds an independent graph from citation edges restricted to the corpus,
//! partitions it with the same community detector, and compares the result
//! against the entity-based partition. Two signals come out: global
//! agreement (ARI / NMI over the joint contingency table) and a per-paper
//! confidence score that is local to each paper's entity cluster and
//! independent of the citation partition.

use crate::cluster::metrics::{ari, nmi};
use crate::cluster::{self, ClusterLabel, Partition};
use crate::config::ValidationConfig;
use crate::data::{Paper, PaperId};
use crate::error::{ClusterError, Result};
use crate::graph::SimilarityGraph;
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Categorical agreement bucket derived from the ARI score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agreement {
    Strong,
    Moderate,
    Weak,
}

/// Per-bucket counts of paper confidence scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    /// confidence >= 0.5
    pub high: usize,
    /// 0.2 <= confidence < 0.5
    pub medium: usize,
    /// confidence < 0.2
    pub low: usize,
}

/// Outcome of cross-validating an entity partition against citations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Adjusted Rand Index between entity and citation partitions, [-1, 1]
    pub ari: f64,

    /// Normalized mutual information, [0, 1]
    pub nmi: f64,

    /// Papers present in both partitions
    pub num_papers: usize,

    /// Paper count per entity cluster
    pub entity_cluster_sizes: BTreeMap<ClusterLabel, usize>,

    /// Paper count per citation cluster
    pub citation_cluster_sizes: BTreeMap<ClusterLabel, usize>,

    /// Fraction of each paper's entity-cluster peers with a direct citation
    /// edge to or from it; 1.0 for singletons
    pub confidence: BTreeMap<PaperId, f64>,

    pub confidence_summary: ConfidenceSummary,

    pub agreement: Agreement,

    /// One-line reading of the ARI bucket
    pub interpretation: String,
}

/// Cross-validate an entity partition against the corpus citation structure.
///
/// Citations pointing outside the corpus are dropped silently. Fails with
/// `InsufficientCitationData` when fewer than `config.min_citation_edges`
/// in-corpus citation references exist; callers should skip validation
/// reporting in that case rather than retry.
pub fn validate(
    papers: &[Paper],
    entity_partition: &Partition,
    config: &ValidationConfig,
) -> Result<ValidationReport> {
    let (citation_graph, reference_count) = build_citation_graph(papers);

    if reference_count < config.min_citation_edges {
        return Err(ClusterError::InsufficientCitationData {
            found: reference_count,
            required: config.min_citation_edges,
        });
    }

    log::info!(
        "Validating {} entity clusters against {} in-corpus citation references",
        entity_partition.labels().len(),
        reference_count
    );

    let citation_partition = cluster::partition(&citation_graph, config.resolution, config.seed)?;

    // Agreement metrics over ids present in both partitions
    let common: BTreeSet<&PaperId> = entity_partition
        .iter()
        .map(|(id, _)| id)
        .filter(|id| citation_partition.get(id).is_some())
        .collect();

    let entity_labels = encode_labels(&common, entity_partition);
    let citation_labels = encode_labels(&common, &citation_partition);

    let ari_score = ari(&entity_labels, &citation_labels);
    let nmi_score = nmi(&entity_labels, &citation_labels);

    let confidence = confidence_scores(papers, entity_partition);

    let mut summary = ConfidenceSummary {
        high: 0,
        medium: 0,
        low: 0,
    };
    for &score in confidence.values() {
        if score >= 0.5 {
            summary.high += 1;
        } else if score >= 0.2 {
            summary.medium += 1;
        } else {
            summary.low += 1;
        }
    }

    let (agreement, interpretation) = interpret(ari_score, config);

    Ok(ValidationReport {
        ari: ari_score,
        nmi: nmi_score,
        num_papers: common.len(),
        entity_cluster_sizes: entity_partition.cluster_sizes(),
        citation_cluster_sizes: citation_partition.cluster_sizes(),
        confidence,
        confidence_summary: summary,
        agreement,
        interpretation,
    })
}

/// Build the undirected citation graph restricted to in-corpus targets.
///
/// Returns the graph plus the number of in-corpus citation references seen
/// (directed, before deduplication) which feeds the sufficiency check.
pub fn build_citation_graph(papers: &[Paper]) -> (SimilarityGraph, usize) {
    let ids: HashSet<&str> = papers.iter().map(|p| p.id.as_str()).collect();

    let mut graph = UnGraph::with_capacity(papers.len(), 0);
    let mut index: HashMap<PaperId, NodeIndex> = HashMap::with_capacity(papers.len());
    for paper in papers {
        let idx = graph.add_node(paper.id.clone());
        index.insert(paper.id.clone(), idx);
    }

    let mut reference_count = 0;
    let mut seen_pairs: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();

    for paper in papers {
        let src = index[&paper.id];
        for target in &paper.citations {
            // Out-of-corpus citations are dropped, not errored
            if !ids.contains(target.as_str()) || target == &paper.id {
                continue;
            }
            reference_count += 1;

            let dst = index[target];
            let key = if src < dst { (src, dst) } else { (dst, src) };
            if seen_pairs.insert(key) {
                graph.add_edge(src, dst, 1);
            }
        }
    }

    (SimilarityGraph::new(graph, index), reference_count)
}

/// Per-paper confidence: the fraction of same-cluster peers with a direct
/// citation edge to or from the paper. Singleton clusters cannot be
/// contradicted and score 1.0.
///
/// This is a local signal, deliberately independent of the citation graph's
/// own partition.
pub fn confidence_scores(papers: &[Paper], partition: &Partition) -> BTreeMap<PaperId, f64> {
    // Symmetric citation adjacency over in-corpus pairs
    let ids: HashSet<&str> = papers.iter().map(|p| p.id.as_str()).collect();
    let mut adjacency: HashMap<&str, HashSet<&str>> = HashMap::with_capacity(papers.len());
    for paper in papers {
        for target in &paper.citations {
            if ids.contains(target.as_str()) && target != &paper.id {
                adjacency.entry(paper.id.as_str()).or_default().insert(target);
                adjacency.entry(target.as_str()).or_default().insert(&paper.id);
            }
        }
    }

    let mut members: HashMap<&ClusterLabel, Vec<&str>> = HashMap::new();
    for (id, label) in partition.iter() {
        members.entry(label).or_default().push(id);
    }

    let entries: Vec<(&PaperId, &ClusterLabel)> = partition.iter().collect();
    entries
        .par_iter()
        .map(|(id, label)| {
            let peers: Vec<&str> = members[label]
                .iter()
                .copied()
                .filter(|&peer| peer != id.as_str())
                .collect();

            let score = if peers.is_empty() {
                1.0
            } else {
                let neighbors = adjacency.get(id.as_str());
                let connected = peers
                    .iter()
                    .filter(|peer| neighbors.is_some_and(|n| n.contains(*peer)))
                    .count();
                connected as f64 / peers.len() as f64
            };

            ((*id).clone(), score)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn interpret(ari: f64, config: &ValidationConfig) -> (Agreement, String) {
    if ari > config.strong_ari {
        (
            Agreement::Strong,
            "Strong agreement: entity clusters align well with citation patterns.".to_string(),
        )
    } else if ari > config.moderate_ari {
        (
            Agreement::Moderate,
            "Moderate agreement: entity and citation views capture partially overlapping structure."
                .to_string(),
        )
    } else {
        (
            Agreement::Weak,
            "Weak agreement: entity and citation views capture different aspects of the collection."
                .to_string(),
        )
    }
}

/// Map cluster labels to dense integers over a fixed id order
fn encode_labels(ids: &BTreeSet<&PaperId>, partition: &Partition) -> Vec<usize> {
    let mut codes: HashMap<&ClusterLabel, usize> = HashMap::new();
    ids.iter()
        .filter_map(|id| partition.get(id.as_str()))
        .map(|label| {
            let next = codes.len();
            *codes.entry(label).or_insert(next)
        })
        .collect()
}
