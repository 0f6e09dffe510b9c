//! Process-lifetime routine cache.
//!
//! A concurrent write-once map from concrete type to its generated
//! [`Routine`]. Generation happens outside the map; insertion goes through
//! the entry API so that when several threads race on the same type exactly
//! one routine is retained and every caller uses that one.
//!
//! There is no eviction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use mimic_types::Idx;

use crate::Routine;

/// Counters describing cache behavior since creation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found no routine.
    pub misses: u64,
    /// Routines retained.
    pub generated: u64,
    /// Routines built by a thread that lost the insertion race.
    pub discarded: u64,
}

/// Concurrent map from type to duplication routine.
pub struct RoutineCache {
    routines: DashMap<Idx, Arc<Routine>, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
    generated: AtomicU64,
    discarded: AtomicU64,
}

impl RoutineCache {
    pub fn new() -> Self {
        RoutineCache {
            routines: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            generated: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// Look up the routine for `ty`, counting a hit or a miss.
    pub fn get(&self, ty: Idx) -> Option<Arc<Routine>> {
        let found = self.lookup(ty);
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Look up the routine for `ty` without touching the counters.
    pub fn lookup(&self, ty: Idx) -> Option<Arc<Routine>> {
        self.routines.get(&ty).map(|entry| Arc::clone(entry.value()))
    }

    /// Store `routine` unless another thread got there first.
    ///
    /// Returns the retained routine, which is `routine` only if this call won.
    pub fn insert_if_absent(&self, ty: Idx, routine: Routine) -> Arc<Routine> {
        match self.routines.entry(ty) {
            Entry::Occupied(entry) => {
                self.discarded.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%ty, "discarding duplicate routine");
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                self.generated.fetch_add(1, Ordering::Relaxed);
                let retained = Arc::new(routine);
                entry.insert(Arc::clone(&retained));
                retained
            }
        }
    }

    pub fn contains(&self, ty: Idx) -> bool {
        self.routines.contains_key(&ty)
    }

    /// Number of cached routines.
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

impl Default for RoutineCache {
    fn default() -> Self {
        Self::new()
    }
}
