use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use roaring::RoaringBitmap;

use crate::encodings::{rank, ALPHABET_SIZE};
use crate::index::Idx;
use crate::kmer::KmerKey;

/// Proteins containing each k-mer that starts with one alphabet symbol.
///
/// Inserting into a k-mer's set holds the guard for that map entry only, so
/// insertions for unrelated k-mers proceed in parallel.
#[derive(Default)]
pub struct Shard {
    kmers: DashMap<KmerKey, RoaringBitmap>,
}

impl Shard {
    /// Adds `idx` to the set of `key`. Returns false if it was already there.
    pub fn insert(&self, key: KmerKey, idx: Idx) -> bool {
        self.kmers.entry(key).or_default().insert(idx)
    }

    pub fn members(&self, key: &KmerKey) -> Option<Ref<'_, KmerKey, RoaringBitmap>> {
        self.kmers.get(key)
    }

    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }
}

/// One shard per alphabet symbol, selected by the k-mer's leading symbol.
pub struct ShardTable {
    shards: Vec<Shard>,
}

impl Default for ShardTable {
    fn default() -> Self {
        ShardTable {
            shards: (0..ALPHABET_SIZE).map(|_| Shard::default()).collect(),
        }
    }
}

impl ShardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shard holding `kmer`. The empty k-mer lives in the first shard.
    #[inline]
    pub fn shard_for(&self, kmer: &[u8]) -> &Shard {
        let pos = kmer
            .first()
            .and_then(|&symbol| rank(symbol))
            .map_or(0, |r| r as usize);
        &self.shards[pos]
    }

    /// Distinct k-mers stored in each shard, in alphabet order.
    pub fn sizes(&self) -> Vec<usize> {
        self.shards.iter().map(Shard::len).collect()
    }

    pub fn kmer_count(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }
}
