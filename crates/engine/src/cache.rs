//! Type cache
//!
//! Memoizes synthesized types per `(contract, base type)` key for the life of
//! the cache. Each key maps to its own `OnceCell`: concurrent first callers
//! for one key block on that cell while exactly one of them synthesizes, and
//! callers for other keys are not blocked at all.
//!
//! A failed synthesis leaves the cell empty, so the next caller retries and
//! gets the same error instead of a poisoned key.
//!
//! Resolved property sets are cached separately per contract, so a contract
//! used with several base types is resolved once.

use crate::base::BaseType;
use crate::config::EngineConfig;
use crate::resolver::{resolve, ResolvedPropertySet};
use crate::synthesizer::{synthesize_resolved, SynthesizedType};
use dashmap::DashMap;
use dtoforge_core::contract::{Contract, ContractId, ContractType};
use dtoforge_core::Result;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    contract: ContractId,
    base: Option<TypeId>,
}

struct Inner {
    types: DashMap<CacheKey, Arc<OnceCell<Arc<SynthesizedType>>>>,
    resolved: DashMap<ContractId, Arc<ResolvedPropertySet>>,
    /// Syntheses performed - uses Relaxed ordering, observational only
    syntheses: AtomicU64,
    config: RwLock<EngineConfig>,
}

/// Process-wide type cache (global)
static GLOBAL_CACHE: Lazy<TypeCache> = Lazy::new(TypeCache::new);

/// Cache of synthesized types
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct TypeCache {
    inner: Arc<Inner>,
}

impl TypeCache {
    /// Create an empty cache with default configuration
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    /// Create an empty cache with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: EngineConfig) -> Self {
        TypeCache {
            inner: Arc::new(Inner {
                types: DashMap::new(),
                resolved: DashMap::new(),
                syntheses: AtomicU64::new(0),
                config: RwLock::new(config),
            }),
        }
    }

    /// The lazily created process-wide cache
    pub fn global() -> &'static TypeCache {
        &GLOBAL_CACHE
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> EngineConfig {
        self.inner.config.read().clone()
    }

    /// Update the configuration
    ///
    /// Types already synthesized are unaffected; new syntheses use the
    /// updated limits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` and keeps the old configuration if the
    /// updated one does not validate.
    pub fn update_config(&self, update: impl FnOnce(&mut EngineConfig)) -> Result<()> {
        let mut guard = self.inner.config.write();
        let mut next = guard.clone();
        update(&mut next);
        next.validate()?;
        *guard = next;
        debug!(target: "dtoforge::config", "Updated engine config");
        Ok(())
    }

    /// Resolved property set of a contract, computed once
    pub fn resolved(&self, contract: &Contract) -> Arc<ResolvedPropertySet> {
        if let Some(set) = self.inner.resolved.get(&contract.id()) {
            return Arc::clone(set.value());
        }
        self.inner
            .resolved
            .entry(contract.id())
            .or_insert_with(|| Arc::new(resolve(contract)))
            .clone()
    }

    /// Get the synthesized type for a contract, synthesizing it on first use
    ///
    /// # Errors
    ///
    /// Validation and base type errors from synthesis. Errors are not cached.
    pub fn get_or_synthesize(
        &self,
        contract: &Arc<Contract>,
        base: Option<&BaseType>,
    ) -> Result<Arc<SynthesizedType>> {
        let key = CacheKey {
            contract: contract.id(),
            base: base.map(BaseType::type_id),
        };

        // Fast path: already synthesized
        if let Some(cell) = self.inner.types.get(&key) {
            if let Some(ty) = cell.get() {
                return Ok(Arc::clone(ty));
            }
        }

        // Clone the cell out so the shard lock is released before synthesis
        let cell = self
            .inner
            .types
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        cell.get_or_try_init(|| -> Result<Arc<SynthesizedType>> {
            debug!(target: "dtoforge::cache", contract = contract.name(), "Cache miss");
            let config = self.config();
            let properties = self.resolved(contract);
            let ty = synthesize_resolved(contract, properties, base, &config)?;
            self.inner.syntheses.fetch_add(1, Ordering::Relaxed);
            Ok(Arc::new(ty))
        })
        .cloned()
    }

    /// Get the synthesized type of a static contract
    pub fn get<C: ContractType>(&self) -> Result<Arc<SynthesizedType>> {
        self.get_or_synthesize(&C::contract(), None)
    }

    /// Get the synthesized type of a static contract over a base type
    pub fn get_with_base<C: ContractType>(&self, base: &BaseType) -> Result<Arc<SynthesizedType>> {
        self.get_or_synthesize(&C::contract(), Some(base))
    }

    /// Number of syntheses performed by this cache
    pub fn synthesis_count(&self) -> u64 {
        self.inner.syntheses.load(Ordering::Relaxed)
    }

    /// Number of cached types
    pub fn len(&self) -> usize {
        self.inner
            .types
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Returns true if no type has been synthesized
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCache")
            .field("types", &self.len())
            .field("syntheses", &self.synthesis_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoforge_core::contract::AccessorShape;
    use dtoforge_core::Error;

    #[derive(Default)]
    struct Entity;

    fn article() -> Arc<Contract> {
        Contract::builder("Article")
            .property::<i64>("id", AccessorShape::GET)
            .build()
    }

    #[test]
    fn test_same_key_same_type() {
        let cache = TypeCache::new();
        let contract = article();
        let a = cache.get_or_synthesize(&contract, None).unwrap();
        let b = cache.get_or_synthesize(&contract, None).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.synthesis_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_base_is_part_of_key() {
        let cache = TypeCache::new();
        let contract = article();
        let plain = cache.get_or_synthesize(&contract, None).unwrap();
        let based = cache
            .get_or_synthesize(&contract, Some(&BaseType::of::<Entity>()))
            .unwrap();
        assert!(!Arc::ptr_eq(&plain, &based));
        assert_eq!(based.name(), "Entity.Article");
        assert_eq!(cache.synthesis_count(), 2);
        // one resolution shared by both keys
        assert!(Arc::ptr_eq(plain.properties(), based.properties()));
    }

    #[test]
    fn test_failure_not_cached() {
        let cache = TypeCache::new();
        let bad = Contract::builder("Bad").operation("run").build();
        assert!(cache.get_or_synthesize(&bad, None).is_err());
        assert!(cache.get_or_synthesize(&bad, None).is_err());
        assert_eq!(cache.synthesis_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = TypeCache::new();
        let clone = cache.clone();
        let contract = article();
        let a = cache.get_or_synthesize(&contract, None).unwrap();
        let b = clone.get_or_synthesize(&contract, None).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_update_config_applies_to_new_syntheses() {
        let cache = TypeCache::new();
        cache
            .update_config(|c| c.limits.max_properties = 1)
            .unwrap();
        let wide = Contract::builder("Wide")
            .property::<i64>("a", AccessorShape::GET)
            .property::<i64>("b", AccessorShape::GET)
            .build();
        assert!(matches!(
            cache.get_or_synthesize(&wide, None),
            Err(Error::LimitExceeded { .. })
        ));
    }

    #[test]
    fn test_invalid_config_update_rejected() {
        let cache = TypeCache::new();
        let err = cache
            .update_config(|c| c.limits.max_lattice_depth = 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(cache.config().limits.max_lattice_depth, 64);
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = EngineConfig::default();
        config.limits.max_properties = 0;
        assert!(TypeCache::with_config(config).is_err());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(TypeCache::global(), TypeCache::global()));
    }
}
