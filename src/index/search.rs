use getset::{CopyGetters, Getters};
use serde::Serialize;

use crate::identity::ProteinId;
use crate::index::Idx;

pub(crate) type KmerHits = counter::Counter<Idx>;

/// Jaccard similarity of two k-mer multisets sharing `shared` k-mers.
///
/// `shared` must not exceed either count.
#[inline]
pub fn jaccard(shared: usize, query_kmers: usize, stored_kmers: usize) -> f64 {
    let union = (query_kmers + stored_kmers).saturating_sub(shared);
    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct QueryResult<T> {
    #[getset(get = "pub")]
    identifier: ProteinId,

    #[getset(get_copy = "pub")]
    shared_kmers: usize,

    #[getset(get_copy = "pub")]
    similarity: f64,

    #[getset(get = "pub")]
    payload: T,
}

impl<T> QueryResult<T> {
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// A scored candidate, before its payload is attached.
#[derive(Debug, Clone)]
pub(crate) struct Match {
    pub(crate) idx: Idx,
    pub(crate) shared_kmers: usize,
    pub(crate) similarity: f64,
}

impl Match {
    pub(crate) fn new(idx: Idx, hits: usize, query_kmers: usize, stored_kmers: usize) -> Match {
        let shared_kmers = hits.min(stored_kmers).min(query_kmers);
        Match {
            idx,
            shared_kmers,
            similarity: jaccard(shared_kmers, query_kmers, stored_kmers),
        }
    }

    pub(crate) fn into_result<T>(self, identifier: ProteinId, payload: T) -> QueryResult<T> {
        QueryResult {
            identifier,
            shared_kmers: self.shared_kmers,
            similarity: self.similarity,
            payload,
        }
    }
}

/// Highest hit count in `counter`. Ties go to whichever the map yields first.
pub(crate) fn best_hit(counter: &KmerHits) -> Option<(Idx, usize)> {
    counter
        .iter()
        .max_by_key(|(_, &hits)| hits)
        .map(|(&idx, &hits)| (idx, hits))
}
