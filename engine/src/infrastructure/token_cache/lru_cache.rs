// /////////////////////////////////////////////////////////////////////////////
// Ontology Construction Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Bounded LRU cache with absolute per-entry expiry (spec §4.4 "Cache").
//! `lru::LruCache` already keeps entries ordered by recency internally, so
//! `get`/`put` give LRU-correct eviction for free; we still stamp
//! `last_access` on [`TokenCacheEntry`] for observability, matching the
//! spec's explicit accounting of it.

use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use engine_domain::TokenCacheEntry;
use lru::LruCache;
use tokio::sync::RwLock;

pub struct TokenCache {
    inner: RwLock<LruCache<String, TokenCacheEntry>>,
}

impl TokenCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self { inner: RwLock::new(LruCache::new(capacity)) }
    }

    /// A hit past expiry returns a miss without removing the entry — the
    /// sweep loop is responsible for eviction (spec §4.4).
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let mut guard = self.inner.write().await;
        let entry = guard.get_mut(key)?;
        if entry.is_expired(now) {
            return None;
        }
        entry.last_access = now;
        Some(entry.token.clone())
    }

    pub async fn set(&self, key: String, token: String, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        let mut guard = self.inner.write().await;
        guard.put(key.clone(), TokenCacheEntry::new(key, token, expires_at, now));
    }

    /// Removes every entry whose expiry has passed.
    pub async fn sweep(&self, now: DateTime<Utc>) {
        let mut guard = self.inner.write().await;
        let expired: Vec<String> =
            guard.iter().filter(|(_, entry)| entry.is_expired(now)).map(|(key, _)| key.clone()).collect();
        for key in expired {
            guard.pop(&key);
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn hit_past_expiry_is_a_miss_but_not_removed() {
        let cache = TokenCache::new(4);
        let now = Utc::now();
        cache.set("k".to_string(), "tok".to_string(), now - Duration::seconds(1), now).await;
        assert_eq!(cache.get("k", now).await, None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn eviction_drops_the_least_recently_used_entry() {
        let cache = TokenCache::new(2);
        let now = Utc::now();
        let later = now + Duration::seconds(60);
        cache.set("a".to_string(), "tok-a".to_string(), later, now).await;
        cache.set("b".to_string(), "tok-b".to_string(), later, now).await;
        // touch "a" so "b" becomes least recently used
        cache.get("a", now).await;
        cache.set("c".to_string(), "tok-c".to_string(), later, now).await;
        assert_eq!(cache.get("b", now).await, None);
        assert_eq!(cache.get("a", now).await, Some("tok-a".to_string()));
        assert_eq!(cache.get("c", now).await, Some("tok-c".to_string()));
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_entries() {
        let cache = TokenCache::new(4);
        let now = Utc::now();
        cache.set("expired".to_string(), "tok".to_string(), now - Duration::seconds(1), now).await;
        cache.set("live".to_string(), "tok".to_string(), now + Duration::seconds(60), now).await;
        cache.sweep(now).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("live", now).await, Some("tok".to_string()));
    }
}
