use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use getset::{CopyGetters, Getters};

use crate::identity::ProteinId;
use crate::index::Idx;
use crate::Error;
use crate::Result;

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct ProteinEntry<T> {
    #[getset(get = "pub")]
    identifier: ProteinId,

    #[getset(get_copy = "pub")]
    kmer_count: usize,

    #[getset(get = "pub")]
    payload: T,
}

impl<T> ProteinEntry<T> {
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Identifier to entry table, with a dense `Idx` per identifier.
///
/// The `Idx` is what the shards store, so each identifier keeps the same
/// `Idx` for the lifetime of the table.
pub struct ProteinTable<T> {
    ids: DashMap<ProteinId, Idx>,
    entries: DashMap<Idx, ProteinEntry<T>>,
    next_idx: AtomicU32,
}

impl<T> Default for ProteinTable<T> {
    fn default() -> Self {
        ProteinTable {
            ids: DashMap::new(),
            entries: DashMap::new(),
            next_idx: AtomicU32::new(0),
        }
    }
}

impl<T> ProteinTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entry, replacing any previous entry for `identifier`.
    ///
    /// Returns the entry's `Idx` and whether an entry was replaced.
    pub fn upsert(
        &self,
        identifier: ProteinId,
        kmer_count: usize,
        payload: T,
    ) -> Result<(Idx, bool)> {
        let (idx, existed) = match self.ids.entry(identifier.clone()) {
            Entry::Occupied(entry) => (*entry.get(), true),
            Entry::Vacant(entry) => {
                let idx = self.allocate()?;
                entry.insert(idx);
                (idx, false)
            }
        };

        self.entries.insert(
            idx,
            ProteinEntry {
                identifier,
                kmer_count,
                payload,
            },
        );
        Ok((idx, existed))
    }

    /// Next free `Idx`. Once exhausted the counter stays exhausted.
    fn allocate(&self) -> Result<Idx> {
        self.next_idx
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(|_| Error::Internal {
                message: "protein table is full".into(),
            })
    }

    pub fn idx(&self, identifier: &str) -> Option<Idx> {
        self.ids.get(identifier).map(|idx| *idx)
    }

    pub fn get(&self, idx: Idx) -> Option<Ref<'_, Idx, ProteinEntry<T>>> {
        self.entries.get(&idx)
    }

    /// Runs `f` on the payload of `idx` while holding that entry's guard.
    pub fn update_payload<R, F>(&self, idx: Idx, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.entries
            .get_mut(&idx)
            .map(|mut entry| f(&mut entry.payload))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T: Clone> ProteinTable<T> {
    /// Copy of every entry, in no particular order.
    pub fn snapshot(&self) -> Vec<ProteinEntry<T>> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }
}
