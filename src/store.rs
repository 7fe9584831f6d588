//! In-memory store of produced notarial paragraphs.
//!
//! The store is bounded: once `capacity` records are held, each insert evicts
//! the oldest record.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::schema::Notarialization;

/// Records kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<String, Notarialization>,
    /// Ids in insertion order, oldest first.
    order: VecDeque<String>,
}

/// Shared map of notarialization id → record.
#[derive(Debug, Clone)]
pub struct NotarializationStore {
    inner: Arc<RwLock<Records>>,
    capacity: usize,
}

impl Default for NotarializationStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NotarializationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding at most `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Records::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a record, returning its id.
    pub fn insert(&self, record: Notarialization) -> String {
        let id = record.id.clone();
        let mut store = self.inner.write().unwrap();
        tracing::debug!("NotarializationStore: stored '{}' ({})", id, record.unit_name);

        if store.by_id.insert(id.clone(), record).is_none() {
            store.order.push_back(id.clone());
        }
        while store.order.len() > self.capacity {
            if let Some(oldest) = store.order.pop_front() {
                store.by_id.remove(&oldest);
                tracing::debug!("NotarializationStore: evicted '{}'", oldest);
            }
        }
        id
    }

    pub fn get(&self, id: &str) -> Option<Notarialization> {
        self.inner.read().unwrap().by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
