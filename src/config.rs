//! Configuration for clustering and validation runs

/// Parameters for entity-based clustering.
pub struct ClusterConfig {
    /// Leiden resolution parameter; higher values favor more, smaller clusters
    pub resolution: f64,

    /// Random seed for deterministic tie-breaking
    pub seed: u64,

    /// Number of most frequent entities reported per cluster summary
    pub top_entities: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 42,
            top_entities: 10,
        }
    }
}

/// Parameters for citation cross-validation.
pub struct ValidationConfig {
    /// Resolution for partitioning the citation graph
    pub resolution: f64,

    /// Seed for the citation-graph partition
    pub seed: u64,

    /// Minimum number of in-corpus citation references required before a
    /// validation report is produced
    pub min_citation_edges: usize,

    /// ARI above this value is reported as strong agreement
    pub strong_ari: f64,

    /// ARI above this value (but below `strong_ari`) is moderate agreement
    pub moderate_ari: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 0,
            min_citation_edges: 10,
            strong_ari: 0.5,
            moderate_ari: 0.2,
        }
    }
}
