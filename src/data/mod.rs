//! Paper corpus loading and validation

use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opaque unique paper identifier (e.g. a normalized DOI)
pub type PaperId = String;

/// A single paper in the corpus.
///
/// Papers are immutable inputs: entity sets come from an upstream extractor
/// and citation sets from an upstream ingestion layer; the core never
/// mutates either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Unique identifier
    pub id: PaperId,

    /// Lowercase entity strings extracted for this paper (may be empty)
    #[serde(default)]
    pub entities: BTreeSet<String>,

    /// Ids of other papers this paper cites; entries pointing outside the
    /// corpus are ignored by the validator
    #[serde(default)]
    pub citations: BTreeSet<PaperId>,
}

impl Paper {
    /// Create a paper with the given id and entity set and no citations
    pub fn new(id: impl Into<PaperId>, entities: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: id.into(),
            entities: entities.into_iter().collect(),
            citations: BTreeSet::new(),
        }
    }

    /// Number of entities shared with another paper
    pub fn shared_entities(&self, other: &Paper) -> usize {
        // Iterate the smaller set, probe the larger
        let (small, large) = if self.entities.len() <= other.entities.len() {
            (&self.entities, &other.entities)
        } else {
            (&other.entities, &self.entities)
        };
        small.iter().filter(|e| large.contains(*e)).count()
    }
}

/// Reject corpora containing the same paper id more than once.
///
/// Duplicate ids would silently corrupt every downstream partition, so they
/// are caught at the ingestion boundary rather than propagated.
pub fn check_unique_ids(papers: &[Paper]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(papers.len());
    for paper in papers {
        if !seen.insert(&paper.id) {
            return Err(ClusterError::DuplicatePaperId {
                id: paper.id.clone(),
            });
        }
    }
    Ok(())
}

/// Load a paper corpus from a JSON file (an array of paper objects)
pub fn load_papers(path: &Path) -> anyhow::Result<Vec<Paper>> {
    log::info!("Loading papers from {}", path.display());

    let file = File::open(path)?;
    let papers: Vec<Paper> = serde_json::from_reader(BufReader::new(file))?;
    check_unique_ids(&papers)?;

    log::info!("Loaded {} papers", papers.len());
    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_entities() {
        let a = Paper::new("a", ["x".to_string(), "y".to_string()]);
        let b = Paper::new("b", ["y".to_string(), "z".to_string()]);
        assert_eq!(a.shared_entities(&b), 1);
        assert_eq!(b.shared_entities(&a), 1);
    }

    #[test]
    fn test_shared_entities_empty() {
        let a = Paper::new("a", []);
        let b = Paper::new("b", ["x".to_string()]);
        assert_eq!(a.shared_entities(&b), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let papers = vec![Paper::new("a", []), Paper::new("a", [])];
        let err = check_unique_ids(&papers).unwrap_err();
        assert_eq!(
            err,
            ClusterError::DuplicatePaperId {
                id: "a".to_string()
            }
        );
    }

    #[test]
    fn test_unique_ids_ok() {
        let papers = vec![Paper::new("a", []), Paper::new("b", [])];
        assert!(check_unique_ids(&papers).is_ok());
    }
}
