//! # Sharded k-mer index for protein similarity search
//!
//! A [`KmerIndex`] maps every k-mer of every stored protein to the set of
//! proteins containing it. Queries tally, per stored protein, how many of
//! their k-mers hit that set, and score candidates by Jaccard similarity.
//! Only proteins sharing at least one k-mer with the query are scored.
//!
//! All operations take `&self`: proteins can be added and queried from
//! many threads at once.

pub mod search;
pub mod shard;
pub mod table;

use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::IndexConfig;
use crate::encodings::canonicalize;
use crate::identity::{ProteinHasher, ProteinId};
use crate::kmer::{kmer_count, kmers, KmerKey};
use crate::Error;
use crate::Result;

use search::{best_hit, KmerHits, Match};
use shard::ShardTable;
use table::ProteinTable;

pub use search::{jaccard, QueryResult};
pub use table::ProteinEntry;

/// Dense protein index stored in the shards.
pub type Idx = u32;

pub struct KmerIndex<T> {
    ksize: usize,
    hasher: ProteinHasher,
    proteins: ProteinTable<T>,
    shards: ShardTable,
}

impl<T> KmerIndex<T> {
    pub fn new(config: &IndexConfig) -> Result<KmerIndex<T>> {
        let ksize = config.ksize();
        if ksize == 0 {
            return Err(Error::InvalidKsize { ksize });
        }

        Ok(KmerIndex {
            ksize,
            hasher: ProteinHasher::new()?,
            proteins: ProteinTable::new(),
            shards: ShardTable::new(),
        })
    }

    pub fn ksize(&self) -> usize {
        self.ksize
    }

    /// Indexes `seq` under its content identifier.
    ///
    /// Re-adding a sequence already present replaces its payload and keeps
    /// its k-mer memberships.
    pub fn add_protein(&self, seq: &[u8], payload: T) -> Result<ProteinId> {
        let canonical = canonicalize(seq)?;
        let identifier = self.hasher.digest(&canonical);
        let count = kmer_count(canonical.len(), self.ksize);

        // The entry goes in before any shard points at it.
        let (idx, replaced) = self.proteins.upsert(identifier.clone(), count, payload)?;
        if replaced {
            debug!("replaced existing entry for {}", identifier);
        }

        for kmer in kmers(&canonical, self.ksize) {
            let key = KmerKey::encode(kmer)?;
            self.shards.shard_for(kmer).insert(key, idx);
        }

        Ok(identifier)
    }

    /// Runs `f` on the payload stored for `identifier`, under its entry guard.
    pub fn update_payload<R, F>(&self, identifier: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let idx = self.proteins.idx(identifier)?;
        self.proteins.update_payload(idx, f)
    }

    pub(crate) fn update_payload_idx<R, F>(&self, idx: Idx, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.proteins.update_payload(idx, f)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.proteins.idx(identifier).is_some()
    }

    /// Distinct k-mers stored across all shards.
    pub fn kmer_count(&self) -> usize {
        self.shards.kmer_count()
    }

    pub fn protein_count(&self) -> usize {
        self.proteins.len()
    }

    /// Distinct k-mers per shard, in alphabet order.
    pub fn shard_sizes(&self) -> Vec<usize> {
        self.shards.sizes()
    }

    /// Hit counts per stored protein, and the number of query k-mers.
    fn counter_for_query(&self, query: &[u8]) -> Result<(KmerHits, usize)> {
        let canonical = canonicalize(query)?;
        let mut counter = KmerHits::new();
        let mut query_kmers = 0;

        for kmer in kmers(&canonical, self.ksize) {
            query_kmers += 1;
            let key = KmerKey::encode(kmer)?;
            if let Some(members) = self.shards.shard_for(kmer).members(&key) {
                counter.update(members.iter());
            }
        }

        debug!(
            "{} query k-mers hit {} stored proteins",
            query_kmers,
            counter.len()
        );
        Ok((counter, query_kmers))
    }

    fn score(&self, idx: Idx, hits: usize, query_kmers: usize) -> Option<Match> {
        let entry = self.proteins.get(idx)?;
        Some(Match::new(idx, hits, query_kmers, entry.kmer_count()))
    }

    /// Every stored protein with similarity at least `min_similarity`,
    /// most similar first.
    pub(crate) fn close_matches(&self, query: &[u8], min_similarity: f64) -> Result<Vec<Match>> {
        let (counter, query_kmers) = self.counter_for_query(query)?;

        let mut matches: Vec<Match> = counter
            .iter()
            .filter_map(|(&idx, &hits)| self.score(idx, hits, query_kmers))
            .filter(|m| m.similarity >= min_similarity)
            .collect();
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        Ok(matches)
    }
}

impl<T: Clone> KmerIndex<T> {
    /// The stored protein sharing the most k-mers with `query`.
    ///
    /// `None` if no stored protein shares a k-mer with it. Among proteins
    /// tied on hits any one may be returned.
    pub fn find_closest(&self, query: &[u8]) -> Result<Option<QueryResult<T>>> {
        let (counter, query_kmers) = self.counter_for_query(query)?;

        Ok(best_hit(&counter)
            .and_then(|(idx, hits)| self.score(idx, hits, query_kmers))
            .and_then(|m| self.attach(m)))
    }

    /// Every stored protein with Jaccard similarity `>= min_similarity`.
    pub fn find_close(&self, query: &[u8], min_similarity: f64) -> Result<Vec<QueryResult<T>>> {
        Ok(self
            .close_matches(query, min_similarity)?
            .into_iter()
            .filter_map(|m| self.attach(m))
            .collect())
    }

    pub fn get(&self, identifier: &str) -> Option<T> {
        let idx = self.proteins.idx(identifier)?;
        self.proteins.get(idx).map(|entry| entry.payload().clone())
    }

    pub fn entry(&self, identifier: &str) -> Option<ProteinEntry<T>> {
        let idx = self.proteins.idx(identifier)?;
        self.proteins.get(idx).map(|entry| entry.value().clone())
    }

    /// Copy of every stored entry, in no particular order.
    pub fn entries(&self) -> Vec<ProteinEntry<T>> {
        self.proteins.snapshot()
    }

    fn attach(&self, m: Match) -> Option<QueryResult<T>> {
        let entry = self.proteins.get(m.idx)?;
        Some(m.into_result(entry.identifier().clone(), entry.payload().clone()))
    }
}

impl<T: Clone + Send + Sync> KmerIndex<T> {
    /// [`find_closest`](Self::find_closest) for each query, in input order.
    pub fn find_closest_many<Q>(&self, queries: &[Q]) -> Result<Vec<Option<QueryResult<T>>>>
    where
        Q: AsRef<[u8]> + Sync,
    {
        #[cfg(feature = "parallel")]
        let query_iter = queries.par_iter();

        #[cfg(not(feature = "parallel"))]
        let query_iter = queries.iter();

        query_iter.map(|q| self.find_closest(q.as_ref())).collect()
    }

    /// [`find_close`](Self::find_close) for each query, in input order.
    pub fn find_close_many<Q>(
        &self,
        queries: &[Q],
        min_similarity: f64,
    ) -> Result<Vec<Vec<QueryResult<T>>>>
    where
        Q: AsRef<[u8]> + Sync,
    {
        #[cfg(feature = "parallel")]
        let query_iter = queries.par_iter();

        #[cfg(not(feature = "parallel"))]
        let query_iter = queries.iter();

        query_iter
            .map(|q| self.find_close(q.as_ref(), min_similarity))
            .collect()
    }
}
