//! Read cache for the list and its derived views.
//!
//! # Design Decisions
//! - One generation counter guards every entry. Invalidation bumps it and
//!   clears the map; entries are tagged with the generation they were
//!   computed in and ignored once it has moved on
//! - A fetch that started before an invalidation can never repopulate the
//!   cache with pre-write data
//! - Errors are never cached
//! - Search views are capped per generation; the fixed views always fit

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::CacheConfig;
use crate::directory::Employee;
use crate::observability::metrics;

/// Identity of a cached view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKey {
    AllEmployees,
    /// Lowercased search term.
    Search(String),
    HighestSalary,
    TopTenEarners,
}

impl ViewKey {
    pub fn search(term: &str) -> Self {
        Self::Search(term.to_lowercase())
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllEmployees => "all",
            Self::Search(_) => "search",
            Self::HighestSalary => "highest_salary",
            Self::TopTenEarners => "top_ten",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedView {
    Employees(Arc<Vec<Employee>>),
    Salary(u64),
    Names(Arc<Vec<String>>),
}

/// Opaque cache epoch captured before a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug)]
pub struct ViewCache {
    enabled: bool,
    max_search_entries: usize,
    generation: AtomicU64,
    entries: DashMap<ViewKey, (Generation, CachedView)>,
}

impl ViewCache {
    pub fn new(enabled: bool, max_search_entries: usize) -> Self {
        Self {
            enabled,
            max_search_entries,
            generation: AtomicU64::new(0),
            entries: DashMap::new(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.enabled, config.max_search_entries)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation.load(Ordering::Acquire))
    }

    /// Look up a view, recording a hit or miss.
    pub fn get(&self, key: &ViewKey) -> Option<CachedView> {
        let found = self.peek(key);
        tracing::debug!(view = ?key, hit = found.is_some(), "Cache lookup");
        metrics::record_cache_lookup(key.label(), found.is_some());
        found
    }

    /// Look up a view without recording anything.
    pub fn peek(&self, key: &ViewKey) -> Option<CachedView> {
        if !self.enabled {
            return None;
        }
        let current = self.generation();
        self.entries
            .get(key)
            .filter(|entry| entry.value().0 == current)
            .map(|entry| entry.value().1.clone())
    }

    /// Store `view` if no invalidation happened since `generation` was taken.
    pub fn insert(&self, key: ViewKey, view: CachedView, generation: Generation) {
        if !self.enabled || self.generation() != generation {
            return;
        }
        if matches!(key, ViewKey::Search(_))
            && !self.entries.contains_key(&key)
            && self.search_entries() >= self.max_search_entries
        {
            tracing::debug!(view = ?key, limit = self.max_search_entries, "Search cache full, not storing");
            return;
        }
        self.entries.insert(key, (generation, view));
    }

    /// Number of stored search views.
    pub fn search_entries(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.key(), ViewKey::Search(_)))
            .count()
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        self.entries.clear();
        metrics::record_cache_invalidation();
        tracing::info!(generation = previous + 1, "View cache invalidated");
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
