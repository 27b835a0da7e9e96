//! Caller-side mapping cache.
//!
//! The resolver is stateless and allocates fresh mappings on every call.
//! Model building asks for the same property types over and over, so the
//! mapping layer memoizes results here, keyed by [`TypeKey`].
//!
//! - Concurrent access via `DashMap`; the resolver is never called while a
//!   shard lock is held
//! - Errors are returned to the caller and never cached

use crate::descriptor::{TypeDescriptor, TypeKey};
use crate::error::MappingError;
use crate::mapping::TypeMapping;
use crate::resolver::TypeMappingResolver;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct MappingCache {
    resolver: Arc<TypeMappingResolver>,
    entries: DashMap<TypeKey, TypeMapping>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MappingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingCache")
            .field("entries", &self.entries.len())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MappingCache {
    pub fn new(resolver: Arc<TypeMappingResolver>) -> Self {
        Self {
            resolver,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn resolver(&self) -> &TypeMappingResolver {
        &self.resolver
    }

    /// Cached mapping for `descriptor`, resolving it on first use.
    ///
    /// When two callers miss on the same type at once, both resolve and the
    /// first mapping inserted is the one both get back.
    pub fn get_or_resolve(&self, descriptor: &TypeDescriptor) -> Result<TypeMapping, MappingError> {
        if let Some(entry) = self.entries.get(descriptor.key()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(type_name = %descriptor, "type mapping cache hit");
            return Ok(entry.value().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let mapping = self.resolver.resolve(descriptor)?;
        tracing::debug!(
            type_name = %descriptor,
            rule = %self.resolver.classify(descriptor),
            structural = !mapping.is_plain(),
            "resolved type mapping"
        );

        let cached = self
            .entries
            .entry(descriptor.key().clone())
            .or_insert(mapping)
            .value()
            .clone();
        Ok(cached)
    }

    pub fn get(&self, key: &TypeKey) -> Option<TypeMapping> {
        self.entries.get(key).map(|entry| entry.value().clone())
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

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
