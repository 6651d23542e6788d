//! Error types for clustering and validation operations

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors returned by graph building, partitioning and validation.
///
/// All variants are recoverable conditions reported to the caller; none
/// indicate a fatal process state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Sub-clustering was requested for a label absent from the partition
    #[error("cluster label '{label}' not found in partition")]
    LabelNotFound { label: String },

    /// Sub-clustering was requested for a cluster with fewer than 2 members
    #[error("cluster '{label}' has {found} member(s); at least 2 are required to sub-cluster")]
    TooFewMembers { label: String, found: usize },

    /// Validation was attempted with too few in-corpus citation edges
    #[error("insufficient citation data: {found} in-corpus citation edge(s), {required} required")]
    InsufficientCitationData { found: usize, required: usize },

    /// Resolution parameter must be strictly positive
    #[error("invalid resolution {value}; must be > 0")]
    InvalidResolution { value: f64 },

    /// The input corpus contains the same paper id more than once
    #[error("duplicate paper id '{id}' in input corpus")]
    DuplicatePaperId { id: String },
}
