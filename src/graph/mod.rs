//! Similarity graph representation and construction

pub mod builder;

pub use builder::build_graph;

use crate::data::PaperId;
use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

/// Undirected weighted graph over papers.
///
/// Nodes carry paper ids in input order; edge weights are entity
/// intersection sizes. Weight-0 pairs have no edge, so the graph is sparse
/// by construction. There are no self-loops and at most one edge per
/// unordered pair.
#[derive(Debug)]
pub struct SimilarityGraph {
    graph: UnGraph<PaperId, u32>,
    index: HashMap<PaperId, NodeIndex>,
}

impl SimilarityGraph {
    pub(crate) fn new(graph: UnGraph<PaperId, u32>, index: HashMap<PaperId, NodeIndex>) -> Self {
        Self { graph, index }
    }

    /// Number of nodes (papers)
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges (pairs with at least one shared entity)
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Paper ids in node order (which is input order)
    pub fn paper_ids(&self) -> impl Iterator<Item = &PaperId> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    /// Edge weight between two papers, if both exist and share entities
    pub fn weight(&self, a: &str, b: &str) -> Option<u32> {
        let (&ia, &ib) = (self.index.get(a)?, self.index.get(b)?);
        self.graph
            .find_edge(ia, ib)
            .map(|e| *self.graph.edge_weight(e).unwrap_or(&0))
    }

    /// Edges as `(node_index_a, node_index_b, weight)` triples with a < b
    pub fn weighted_edges(&self) -> Vec<(usize, usize, f64)> {
        self.graph
            .edge_references()
            .map(|e| {
                let (i, j) = (e.source().index(), e.target().index());
                let (i, j) = if i < j { (i, j) } else { (j, i) };
                (i, j, f64::from(*e.weight()))
            })
            .collect()
    }

    /// Sum of edge weights incident to a paper.
    ///
    /// A high weighted degree marks an entity hub: a paper sharing many
    /// entities with many other papers.
    pub fn weighted_degree(&self, id: &str) -> u32 {
        match self.index.get(id) {
            Some(&i) => self.graph.edges(i).map(|e| *e.weight()).sum(),
            None => 0,
        }
    }

    /// Top-k papers by weighted degree, the citation-free analogue of
    /// "most cited paper". Ties broken by node order.
    pub fn hub_papers(&self, top_k: usize) -> Vec<(PaperId, u32)> {
        self.graph
            .node_indices()
            .map(|i| {
                let score: u32 = self.graph.edges(i).map(|e| *e.weight()).sum();
                (self.graph[i].clone(), score)
            })
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(top_k)
            .collect()
    }

    /// Ids of papers reachable from `seed` within `hops` edges, including
    /// the seed itself. Returns `None` if the seed is not in the graph.
    pub fn expand_from_seed(&self, seed: &str, hops: usize) -> Option<BTreeSet<PaperId>> {
        let &start = self.index.get(seed)?;

        let mut visited: BTreeSet<PaperId> = BTreeSet::new();
        visited.insert(self.graph[start].clone());
        let mut frontier = vec![start];

        for _ in 0..hops {
            let mut next = Vec::new();
            for &node in &frontier {
                for neighbor in self.graph.neighbors(node) {
                    if visited.insert(self.graph[neighbor].clone()) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Some(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Paper;

    fn paper(id: &str, entities: &[&str]) -> Paper {
        Paper::new(id, entities.iter().map(|e| e.to_string()))
    }

    fn triangle() -> SimilarityGraph {
        // a-b weight 2, a-c and b-c weight 1, d isolated
        let papers = vec![
            paper("a", &["x", "y"]),
            paper("b", &["x", "y"]),
            paper("c", &["x"]),
            paper("d", &["z"]),
        ];
        build_graph(&papers).unwrap()
    }

    #[test]
    fn test_weighted_degree() {
        let g = triangle();
        assert_eq!(g.weighted_degree("a"), 3);
        assert_eq!(g.weighted_degree("c"), 2);
        assert_eq!(g.weighted_degree("d"), 0);
        assert_eq!(g.weighted_degree("missing"), 0);
    }

    #[test]
    fn test_hub_papers() {
        let g = triangle();
        let hubs = g.hub_papers(2);
        assert_eq!(hubs.len(), 2);
        // a and b tie at 3; node order breaks the tie
        assert_eq!(hubs[0], ("a".to_string(), 3));
        assert_eq!(hubs[1], ("b".to_string(), 3));
    }

    #[test]
    fn test_expand_from_seed() {
        let g = triangle();
        let one_hop = g.expand_from_seed("c", 1).unwrap();
        assert_eq!(
            one_hop,
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
        );
        assert!(g.expand_from_seed("missing", 1).is_none());

        // isolated node never expands
        let isolated = g.expand_from_seed("d", 5).unwrap();
        assert_eq!(isolated.len(), 1);
    }
}
