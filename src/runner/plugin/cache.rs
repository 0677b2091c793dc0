//! Resolution cache keyed by runtime type and member name.
//!
//! Negative results are stored explicitly, so a repeated failed lookup is a
//! single map probe. Concurrent first lookups of the same key may both
//! compute; the first insert wins and every caller reads back the winner.
//! Entries live until [`ResolutionCache::clear`].

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::runner::ds::types::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub type_name: Arc<str>,
    pub member: String,
}

impl CacheKey {
    pub fn new(ty: &TypeRef, member: &str) -> Self {
        CacheKey {
            type_name: Arc::from(ty.to_string().as_str()),
            member: member.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.member)
    }
}

/// A cached verdict.
#[derive(Clone)]
pub enum Resolution<V> {
    Resolved(V),
    /// Confirmed absent, as opposed to not yet looked up.
    Absent,
}

impl<V: Clone> Resolution<V> {
    pub fn from_option(value: Option<V>) -> Self {
        match value {
            Some(v) => Resolution::Resolved(v),
            None => Resolution::Absent,
        }
    }

    pub fn to_option(&self) -> Option<V> {
        match self {
            Resolution::Resolved(v) => Some(v.clone()),
            Resolution::Absent => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

pub struct ResolutionCache<V> {
    entries: DashMap<CacheKey, Resolution<V>, FxBuildHasher>,
}

impl<V: Clone> ResolutionCache<V> {
    pub fn new() -> Self {
        ResolutionCache {
            entries: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<Resolution<V>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store `resolution` unless the key already has an entry; either way
    /// return what the cache holds afterwards.
    pub fn insert_if_absent(&self, key: CacheKey, resolution: Resolution<V>) -> Resolution<V> {
        self.entries.entry(key).or_insert(resolution).value().clone()
    }

    /// Serve `key` from the cache, or run `compute` and cache its verdict.
    ///
    /// `compute` runs without any map lock held, so it may consult other
    /// caches or even this one. Errors are returned as-is and not cached.
    pub fn get_or_compute<E, F>(&self, key: CacheKey, compute: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Result<Option<V>, E>,
    {
        if let Some(cached) = self.lookup(&key) {
            tracing::trace!(key = %key, hit = cached.is_resolved(), "resolution cache hit");
            return Ok(cached.to_option());
        }
        tracing::trace!(key = %key, "resolution cache miss");
        let computed = Resolution::from_option(compute()?);
        Ok(self.insert_if_absent(key, computed).to_option())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<V: Clone> Default for ResolutionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    fn key(member: &str) -> CacheKey {
        CacheKey::new(&TypeRef::named("util.ImmutableList"), member)
    }

    #[test]
    fn test_negative_result_is_cached() {
        let cache: ResolutionCache<u32> = ResolutionCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let out: Result<Option<u32>, ()> = cache.get_or_compute(key("missing"), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            });
            assert_eq!(out, Ok(None));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(cache.lookup(&key("missing")), Some(Resolution::Absent)));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: ResolutionCache<u32> = ResolutionCache::new();
        let out: Result<Option<u32>, &str> = cache.get_or_compute(key("boom"), || Err("boom"));
        assert_eq!(out, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_first_insert_wins() {
        let cache: ResolutionCache<u32> = ResolutionCache::new();
        assert!(cache.insert_if_absent(key("a"), Resolution::Resolved(1)).is_resolved());
        let winner = cache.insert_if_absent(key("a"), Resolution::Absent);
        assert_eq!(winner.to_option(), Some(1));
    }

    #[test]
    fn test_concurrent_first_resolution_agrees() {
        let cache: ResolutionCache<Arc<String>> = ResolutionCache::new();
        let barrier = Barrier::new(8);
        let results: Vec<Arc<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let cache = &cache;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        let out: Result<Option<Arc<String>>, ()> = cache
                            .get_or_compute(key("sorted"), || Ok(Some(Arc::new(format!("thread {}", i)))));
                        out.unwrap().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(cache.len(), 1);
        let first = &results[0];
        assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
    }
}
