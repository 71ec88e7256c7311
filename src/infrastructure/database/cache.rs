//! Read-side query cache for the SeaORM student store.
//!
//! Entries expire after a TTL and are dropped wholesale on invalidation.
//! Each fill records the generation it started in; a fill that raced
//! with an invalidation is discarded instead of resurrecting old rows.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::domain::StudentFilter;

/// Shape of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadKey {
    Count(StudentFilter),
    All(StudentFilter),
    Window {
        filter: StudentFilter,
        offset: u64,
        limit: u64,
    },
    One(String),
}

pub struct ReadCache<K, V> {
    entries: DashMap<K, (Instant, V)>,
    ttl: Duration,
    generation: AtomicU64,
    // held shared by fills, exclusively by invalidation
    gate: RwLock<()>,
}

impl<K: Eq + Hash, V: Clone> ReadCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            generation: AtomicU64::new(0),
            gate: RwLock::new(()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let fresh = {
            let entry = self.entries.get(key)?;
            let (stored_at, value) = entry.value();
            (stored_at.elapsed() < self.ttl).then(|| value.clone())
        };
        if fresh.is_none() {
            self.entries.remove(key);
        }
        fresh
    }

    /// Store `value` unless the cache was invalidated after `generation`
    /// was read. Returns whether the value was kept.
    pub fn put(&self, key: K, value: V, generation: u64) -> bool {
        let _gate = self.gate.read().unwrap_or_else(|e| e.into_inner());
        if self.generation() != generation {
            return false;
        }
        self.entries.insert(key, (Instant::now(), value));
        true
    }

    pub fn invalidate(&self) {
        let _gate = self.gate.write().unwrap_or_else(|e| e.into_inner());
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
