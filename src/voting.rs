//! Similarity-weighted annotation transfer.
//!
//! Each stored protein carries a [`Proposal`]: the best annotation seen so
//! far and the similarity of the query that proposed it. Processing an
//! external annotation against the index offers it to every sufficiently
//! close stored protein, and each keeps whichever proposal scored highest.

use getset::{CopyGetters, Getters};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::IndexConfig;
use crate::identity::ProteinId;
use crate::index::KmerIndex;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct Proposal {
    #[getset(get_copy = "pub")]
    best_score: f64,

    #[getset(get = "pub")]
    best_annotation: String,
}

impl Proposal {
    pub fn new<S: Into<String>>(default_annotation: S) -> Proposal {
        Proposal {
            best_score: 0.0,
            best_annotation: default_annotation.into(),
        }
    }

    /// Replaces the stored pair if `score` is strictly higher.
    pub fn merge(&mut self, score: f64, annotation: &str) -> bool {
        if score > self.best_score {
            self.best_score = score;
            self.best_annotation = annotation.into();
            true
        } else {
            false
        }
    }
}

impl From<&str> for Proposal {
    fn from(default_annotation: &str) -> Proposal {
        Proposal::new(default_annotation)
    }
}

pub struct AnnotationVoter {
    index: KmerIndex<Proposal>,
    min_similarity: f64,
}

impl AnnotationVoter {
    pub fn new(config: &IndexConfig) -> Result<AnnotationVoter> {
        Ok(AnnotationVoter {
            index: KmerIndex::new(config)?,
            min_similarity: config.min_similarity(),
        })
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    pub fn index(&self) -> &KmerIndex<Proposal> {
        &self.index
    }

    /// Stores `seq` with a score-zero proposal for `default_annotation`.
    pub fn add_protein(&self, seq: &[u8], default_annotation: &str) -> Result<ProteinId> {
        self.index.add_protein(seq, Proposal::new(default_annotation))
    }

    /// Offers `annotation` to every stored protein close to `query`.
    ///
    /// Returns how many stored proteins matched the query.
    pub fn process_proposal(&self, query: &[u8], annotation: &str) -> Result<usize> {
        let matches = self.index.close_matches(query, self.min_similarity)?;

        let mut updated = 0;
        for m in &matches {
            let replaced = self
                .index
                .update_payload_idx(m.idx, |proposal| proposal.merge(m.similarity, annotation));
            if replaced == Some(true) {
                updated += 1;
            }
        }

        debug!(
            "proposal {:?} matched {} proteins, {} took it",
            annotation,
            matches.len(),
            updated
        );
        Ok(matches.len())
    }

    pub fn proposal(&self, identifier: &str) -> Option<Proposal> {
        self.index.get(identifier)
    }

    /// Every stored protein with its current proposal, in no particular order.
    pub fn proposals(&self) -> Vec<(ProteinId, Proposal)> {
        self.index
            .entries()
            .into_iter()
            .map(|entry| (entry.identifier().clone(), entry.into_payload()))
            .collect()
    }
}
