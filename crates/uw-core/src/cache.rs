//! Signature-keyed plan cache
//!
//! Plans of every target type share one store, so entries are type-erased
//! and downcast on lookup. Nothing is evicted.

use crate::plan::ConstructionPlan;
use crate::signature::CacheKey;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// Type-erased `Arc<ConstructionPlan<T>>`
pub type ErasedPlan = Arc<dyn Any + Send + Sync>;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: usize,
}

/// Storage for compiled plans
///
/// Implementations must be safe for concurrent `get` and `set`. Computation is
/// not serialized: two callers missing the same key may both compile, and the
/// last `set` wins.
pub trait PlanStore: Send + Sync {
    /// Look up a plan
    fn get(&self, key: &CacheKey) -> Option<ErasedPlan>;

    /// Store a plan, replacing any previous entry
    fn set(&self, key: CacheKey, plan: ErasedPlan);
}

impl<'a> dyn PlanStore + 'a {
    /// Typed lookup; an entry of another plan type reads as a miss
    #[must_use]
    pub fn lookup<T: Send + Sync + 'static>(&self, key: &CacheKey) -> Option<Arc<ConstructionPlan<T>>> {
        self.get(key)
            .and_then(|erased| erased.downcast::<ConstructionPlan<T>>().ok())
    }

    /// Typed store
    pub fn store<T: Send + Sync + 'static>(&self, plan: Arc<ConstructionPlan<T>>) {
        let key = plan.key().clone();
        self.set(key, plan);
    }

    /// Cached plan for `key`, or compile and store one
    ///
    /// # Errors
    /// Returns whatever `compile` returns; nothing is stored on error
    pub fn try_get_or_insert_with<T, E, F>(
        &self,
        key: &CacheKey,
        compile: F,
    ) -> Result<Arc<ConstructionPlan<T>>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<ConstructionPlan<T>, E>,
    {
        if let Some(cached) = self.lookup::<T>(key) {
            return Ok(cached);
        }

        let plan = Arc::new(compile()?);
        self.set(key.clone(), Arc::clone(&plan) as ErasedPlan);
        Ok(plan)
    }
}

/// In-memory plan store over `DashMap`
#[derive(Debug, Default)]
pub struct PlanCache {
    inner: DashMap<CacheKey, ErasedPlan>,
}

impl PlanCache {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Number of cached plans
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if cache is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Check if a plan is cached for `key`
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Drop every cached plan
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.len(),
        }
    }
}

impl PlanStore for PlanCache {
    fn get(&self, key: &CacheKey) -> Option<ErasedPlan> {
        self.inner.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn set(&self, key: CacheKey, plan: ErasedPlan) {
        self.inner.insert(key, plan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchRules;
    use crate::diagnostics::NoopSink;
    use crate::error::ResolveError;
    use crate::signature::UpdateSignature;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uw_shape::{ConstructorDescriptor, Shaped, TypeDescriptor, TypeRef};

    #[derive(Debug, Clone, PartialEq)]
    struct Named {
        name: String,
    }

    impl Shaped for Named {
        fn describe() -> TypeDescriptor<Self> {
            TypeDescriptor::builder()
                .property("Name", |n: &Named| n.name.clone())
                .constructor(
                    ConstructorDescriptor::builder("new")
                        .param::<String>("name")
                        .build(|args| Ok(Named { name: args.take()? })),
                )
                .build()
        }
    }

    fn signature() -> UpdateSignature {
        UpdateSignature::builder::<Named>()
            .intent::<String>("name")
            .build()
            .unwrap()
    }

    fn compile() -> Result<ConstructionPlan<Named>, ResolveError> {
        ConstructionPlan::compile(&Named::describe(), &signature(), &MatchRules::default(), &NoopSink)
    }

    #[test]
    fn store_then_lookup_shares_plan() {
        let cache = PlanCache::new();
        let store: &dyn PlanStore = &cache;
        let plan = Arc::new(compile().unwrap());

        store.store(Arc::clone(&plan));
        let found = store.lookup::<Named>(plan.key()).unwrap();

        assert!(Arc::ptr_eq(&found, &plan));
        assert_eq!(cache.stats().entry_count, 1);
    }

    #[test]
    fn wrong_type_reads_as_miss() {
        let cache = PlanCache::new();
        let store: &dyn PlanStore = &cache;
        let plan = Arc::new(compile().unwrap());
        store.store(Arc::clone(&plan));

        assert!(store.lookup::<String>(plan.key()).is_none());
        assert!(cache.contains(plan.key()));
    }

    #[test]
    fn get_or_insert_compiles_once() {
        let cache = PlanCache::new();
        let store: &dyn PlanStore = &cache;
        let key = signature().cache_key(TypeRef::of::<Named>(), MatchRules::default().id());
        let compiled = AtomicUsize::new(0);

        let first = store
            .try_get_or_insert_with(&key, || {
                compiled.fetch_add(1, Ordering::SeqCst);
                compile()
            })
            .unwrap();
        let second = store
            .try_get_or_insert_with(&key, || {
                compiled.fetch_add(1, Ordering::SeqCst);
                compile()
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(compiled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_compile_is_not_cached() {
        let cache = PlanCache::new();
        let store: &dyn PlanStore = &cache;
        let key = signature().cache_key(TypeRef::of::<Named>(), MatchRules::default().id());

        let result = store.try_get_or_insert_with::<Named, _, _>(&key, || {
            Err(ResolveError::unmappable("title", TypeRef::of::<Named>()))
        });

        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let cache = PlanCache::new();
        let store: &dyn PlanStore = &cache;
        let first = Arc::new(compile().unwrap());
        let second = Arc::new(compile().unwrap());

        store.store(Arc::clone(&first));
        store.store(Arc::clone(&second));

        let found = store.lookup::<Named>(first.key()).unwrap();
        assert!(Arc::ptr_eq(&found, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_lookups_and_stores() {
        let cache = Arc::new(PlanCache::new());
        let key = signature().cache_key(TypeRef::of::<Named>(), MatchRules::default().id());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let key = key.clone();
                std::thread::spawn(move || {
                    let store: &dyn PlanStore = &*cache;
                    store
                        .try_get_or_insert_with(&key, compile)
                        .unwrap()
                        .constructor_label()
                        .to_string()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "new");
        }
        assert_eq!(cache.len(), 1);
    }
}
