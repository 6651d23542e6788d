//! Core library for entity-based paper clustering
//!
//! Organizes a paper corpus into topical clusters without citation metadata:
//! a weighted similarity graph is built over shared extracted entities,
//! partitioned with seeded Leiden community detection (recursively, for
//! hierarchical drill-down), and cross-validated against an independent
//! citation graph.

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod storage;
pub mod validate;

pub use cluster::{partition, subcluster, ClusterLabel, ClusterSummary, Partition};
pub use config::{ClusterConfig, ValidationConfig};
pub use data::{Paper, PaperId};
pub use error::{ClusterError, Result};
pub use graph::{build_graph, SimilarityGraph};
pub use validate::{validate, ValidationReport};
