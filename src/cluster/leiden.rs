//! Leiden community detection over weighted similarity graphs
//!
//! Local moving of nodes between communities to improve resolution-weighted
//! modularity, followed by a refinement pass that splits communities that
//! ended up internally disconnected (Traag, Waltman, van Eck 2019).
//!
//! The quality function is weight-aware: two papers sharing ten entities
//! pull toward each other ten times harder than two papers sharing one.

use crate::error::{ClusterError, Result};
use crate::graph::SimilarityGraph;
use std::collections::{HashMap, VecDeque};

/// Narrow interface for the partitioning heuristic.
///
/// Everything downstream (sub-clustering, validation) depends only on this
/// contract: every node gets exactly one community id, output is
/// deterministic for fixed inputs and seed.
pub trait Partitioner {
    /// Assign a community id to every node, indexed in node order
    fn partition(&self, graph: &SimilarityGraph) -> Result<Vec<usize>>;
}

/// Seeded, resolution-parameterized Leiden detector.
#[derive(Debug, Clone)]
pub struct Leiden {
    resolution: f64,
    seed: u64,
    max_iter: usize,
}

/// Minimum modularity gain for a move to count as an improvement
const MIN_GAIN: f64 = 1e-10;

impl Leiden {
    /// Create a detector; fails with `InvalidResolution` for resolution <= 0
    pub fn new(resolution: f64, seed: u64) -> Result<Self> {
        if !(resolution > 0.0) {
            return Err(ClusterError::InvalidResolution { value: resolution });
        }
        Ok(Self {
            resolution,
            seed,
            max_iter: 100,
        })
    }
}

impl Partitioner for Leiden {
    fn partition(&self, graph: &SimilarityGraph) -> Result<Vec<usize>> {
        let n = graph.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let edges = graph.weighted_edges();
        if edges.is_empty() {
            // No entity overlap anywhere: every paper is its own cluster
            return Ok((0..n).collect());
        }

        let wg = WeightedAdjacency::from_edges(n, &edges);
        let mut state = CommunityState::singletons(n, &wg.degrees);

        let visit_order = seeded_order(n, self.seed);

        for _level in 0..self.max_iter {
            let improved = self.local_moving(&wg, &mut state, &visit_order);
            if !improved {
                break;
            }
            self.refine(&wg, &mut state);
        }

        Ok(renumber(&state.assignment))
    }
}

impl Leiden {
    /// Greedily move nodes to the neighboring community with the best
    /// resolution-weighted modularity gain, revisiting neighbors of moved
    /// nodes until no move improves the partition.
    fn local_moving(
        &self,
        wg: &WeightedAdjacency,
        state: &mut CommunityState,
        visit_order: &[usize],
    ) -> bool {
        let mut improved = false;
        let mut queue: VecDeque<usize> = visit_order.iter().copied().collect();
        let mut queued = vec![true; wg.n];

        while let Some(node) = queue.pop_front() {
            queued[node] = false;
            let current = state.assignment[node];

            // Candidate communities, sorted so tie-breaking does not depend
            // on adjacency order
            let mut candidates: Vec<usize> =
                wg.adj[node].iter().map(|&(nb, _)| state.assignment[nb]).collect();
            candidates.push(current);
            candidates.sort_unstable();
            candidates.dedup();

            // Evaluate gains with the node removed from its community
            state.comm_weight[current] -= wg.degrees[node];

            let mut best_comm = current;
            let mut best_gain = 0.0;
            for &target in &candidates {
                let gain = wg.modularity_gain(node, target, state, self.resolution);
                if gain > best_gain + MIN_GAIN {
                    best_gain = gain;
                    best_comm = target;
                }
            }

            state.comm_weight[current] += wg.degrees[node];

            if best_comm != current {
                state.move_node(node, current, best_comm, wg.degrees[node]);
                improved = true;

                for &(neighbor, _) in &wg.adj[node] {
                    if !queued[neighbor] {
                        queue.push_back(neighbor);
                        queued[neighbor] = true;
                    }
                }
            }
        }

        improved
    }

    /// Split any community whose members are not internally connected.
    ///
    /// Local moving alone can leave a community in two pieces joined only
    /// through nodes that have since moved elsewhere; the split restores the
    /// well-connectedness guarantee.
    fn refine(&self, wg: &WeightedAdjacency, state: &mut CommunityState) {
        let snapshot = state.assignment.clone();

        let mut comms: Vec<usize> = snapshot.clone();
        comms.sort_unstable();
        comms.dedup();

        for comm in comms {
            let members: Vec<usize> = (0..wg.n).filter(|&i| snapshot[i] == comm).collect();
            if members.len() <= 1 {
                continue;
            }

            let components = connected_components(wg, &members);
            if components.len() <= 1 {
                continue;
            }

            // First component keeps the community id; the rest get fresh ids
            for component in components.iter().skip(1) {
                let fresh = state.comm_weight.len();
                state.comm_weight.push(0.0);
                for &node in component {
                    let old = state.assignment[node];
                    state.move_node(node, old, fresh, wg.degrees[node]);
                }
            }
        }
    }
}

/// Flat weighted adjacency built once per partition call.
struct WeightedAdjacency {
    n: usize,
    /// node -> [(neighbor, weight)]
    adj: Vec<Vec<(usize, f64)>>,
    /// Weighted degree per node
    degrees: Vec<f64>,
    /// 2m: every edge weight counted twice
    total_weight: f64,
}

impl WeightedAdjacency {
    fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut adj = vec![Vec::new(); n];
        let mut degrees = vec![0.0; n];
        let mut total_weight = 0.0;

        for &(i, j, w) in edges {
            adj[i].push((j, w));
            adj[j].push((i, w));
            degrees[i] += w;
            degrees[j] += w;
            total_weight += 2.0 * w;
        }

        Self {
            n,
            adj,
            degrees,
            total_weight,
        }
    }

    /// Gain from placing `node` in `target`:
    /// k_i,in / m - gamma * sigma_tot * k_i / (2 m^2)
    fn modularity_gain(
        &self,
        node: usize,
        target: usize,
        state: &CommunityState,
        resolution: f64,
    ) -> f64 {
        if self.total_weight == 0.0 {
            return 0.0;
        }

        let m = self.total_weight / 2.0;
        let ki = self.degrees[node];
        let ki_in: f64 = self.adj[node]
            .iter()
            .filter(|&&(nb, _)| state.assignment[nb] == target)
            .map(|&(_, w)| w)
            .sum();
        let sigma_tot = state.comm_weight[target];

        ki_in / m - resolution * sigma_tot * ki / (2.0 * m * m)
    }
}

/// Community assignment with cached per-community weighted degree.
struct CommunityState {
    assignment: Vec<usize>,
    comm_weight: Vec<f64>,
}

impl CommunityState {
    fn singletons(n: usize, degrees: &[f64]) -> Self {
        Self {
            assignment: (0..n).collect(),
            comm_weight: degrees.to_vec(),
        }
    }

    fn move_node(&mut self, node: usize, from: usize, to: usize, degree: f64) {
        self.assignment[node] = to;
        self.comm_weight[from] -= degree;
        self.comm_weight[to] += degree;
    }
}

/// Connected components within a member subset, visited in member order
fn connected_components(wg: &WeightedAdjacency, members: &[usize]) -> Vec<Vec<usize>> {
    let mut in_subset = vec![false; wg.n];
    for &m in members {
        in_subset[m] = true;
    }

    let mut visited = vec![false; wg.n];
    let mut components = Vec::new();

    for &start in members {
        if visited[start] {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            component.push(node);
            for &(neighbor, _) in &wg.adj[node] {
                if in_subset[neighbor] && !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        components.push(component);
    }

    components
}

/// Renumber community ids consecutively by first appearance in node order
fn renumber(assignment: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut next = 0;

    assignment
        .iter()
        .map(|&c| {
            *mapping.entry(c).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect()
}

/// Deterministic seed-derived permutation of 0..n (splitmix64 Fisher-Yates)
fn seeded_order(n: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut state = seed;

    let mut next = move || {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    };

    for i in (1..n).rev() {
        let j = (next() % (i as u64 + 1)) as usize;
        order.swap(i, j);
    }

    order
}
