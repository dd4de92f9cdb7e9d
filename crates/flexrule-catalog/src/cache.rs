// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: OffsetDateTime,
}

/// Read-through cache. Expired entries are refetched; when the refetch
/// fails the stale value is served instead of the error.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_fetch<F>(&self, key: K, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        self.get_or_fetch_at(OffsetDateTime::now_utc(), key, fetch)
    }

    pub fn get_or_fetch_at<F>(&self, now: OffsetDateTime, key: K, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let cached = self.entries().get(&key).cloned();

        let Some(entry) = cached else {
            let value = fetch()?;
            self.store(key, value.clone(), now);
            return Ok(value);
        };

        if now - entry.fetched_at < self.ttl {
            return Ok(entry.value);
        }

        match fetch() {
            Ok(value) => {
                debug!(key = ?key, "refreshed expired cache entry");
                self.store(key, value.clone(), now);
                Ok(value)
            }
            Err(error) => {
                warn!(
                    key = ?key,
                    age = %(now - entry.fetched_at),
                    error = %format!("{error:#}"),
                    "refresh failed, serving stale value"
                );
                Ok(entry.value)
            }
        }
    }

    pub fn invalidate(&self, key: &K) {
        self.entries().remove(key);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self, key: K, value: V, fetched_at: OffsetDateTime) {
        self.entries().insert(key, Entry { value, fetched_at });
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
