//! Pairwise similarity graph construction

use crate::data::{check_unique_ids, Paper};
use crate::error::Result;
use crate::graph::SimilarityGraph;
use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use std::collections::HashMap;

/// Build the entity-overlap graph for a paper corpus.
///
/// Every unordered pair of papers is compared once; a pair sharing `w > 0`
/// entities gets an undirected edge of weight `w`. Papers with no overlap
/// (including papers with empty entity sets) remain as zero-degree nodes.
///
/// The comparison loop is O(n²) in the number of papers. Rows are processed
/// in parallel but collected in index order, so the edge set is a pure
/// function of the input.
pub fn build_graph(papers: &[Paper]) -> Result<SimilarityGraph> {
    check_unique_ids(papers)?;

    let n = papers.len();
    log::info!("Building similarity graph over {} papers", n);

    // One row per paper: edges (i, j, w) with j > i
    let rows: Vec<Vec<(usize, usize, u32)>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut row = Vec::new();
            if papers[i].entities.is_empty() {
                return row;
            }
            for j in (i + 1)..n {
                let shared = papers[i].shared_entities(&papers[j]);
                if shared > 0 {
                    row.push((i, j, shared as u32));
                }
            }
            row
        })
        .collect();

    let edge_count: usize = rows.iter().map(|r| r.len()).sum();

    let mut graph = UnGraph::with_capacity(n, edge_count);
    let mut index: HashMap<String, NodeIndex> = HashMap::with_capacity(n);

    for paper in papers {
        let idx = graph.add_node(paper.id.clone());
        index.insert(paper.id.clone(), idx);
    }

    for row in rows {
        for (i, j, w) in row {
            graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), w);
        }
    }

    log::info!("Similarity graph has {} edges", edge_count);

    Ok(SimilarityGraph::new(graph, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;

    fn paper(id: &str, entities: &[&str]) -> Paper {
        Paper::new(id, entities.iter().map(|e| e.to_string()))
    }

    #[test]
    fn test_edge_weights_are_intersection_sizes() {
        let papers = vec![
            paper("a", &["x", "y", "z"]),
            paper("b", &["x", "y"]),
            paper("c", &["q"]),
        ];
        let g = build_graph(&papers).unwrap();

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight("a", "b"), Some(2));
        assert_eq!(g.weight("a", "c"), None);
        assert_eq!(g.weight("b", "c"), None);
    }

    #[test]
    fn test_empty_entity_set_is_isolated_node() {
        let papers = vec![paper("a", &["x"]), paper("b", &[])];
        let g = build_graph(&papers).unwrap();

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_identical_sets_always_connected() {
        let papers = vec![paper("a", &["x", "y"]), paper("b", &["x", "y"])];
        let g = build_graph(&papers).unwrap();
        assert_eq!(g.weight("a", "b"), Some(2));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let papers = vec![paper("a", &["x"]), paper("a", &["y"])];
        let err = build_graph(&papers).unwrap_err();
        assert!(matches!(err, ClusterError::DuplicatePaperId { .. }));
    }

    #[test]
    fn test_mixed_corpus_edge_structure() {
        // A and B share {x, y}; C shares x with both; D and E share z; F empty
        let papers = vec![
            paper("A", &["x", "y"]),
            paper("B", &["x", "y"]),
            paper("C", &["x"]),
            paper("D", &["z"]),
            paper("E", &["z"]),
            paper("F", &[]),
        ];
        let g = build_graph(&papers).unwrap();

        assert_eq!(g.node_count(), 6);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.weight("A", "B"), Some(2));
        assert_eq!(g.weight("A", "C"), Some(1));
        assert_eq!(g.weight("B", "C"), Some(1));
        assert_eq!(g.weight("D", "E"), Some(1));
        assert_eq!(g.weight("A", "D"), None);
        assert_eq!(g.weight("F", "A"), None);
    }
}
