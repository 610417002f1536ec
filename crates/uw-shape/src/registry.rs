//! Descriptor registry
//!
//! Derives each [`TypeDescriptor`] once and shares it afterwards. Explicitly
//! registered descriptors take precedence over [`Shaped::describe`].

use crate::descriptor::{Shaped, TypeDescriptor};
use crate::type_ref::TypeRef;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;

/// Concurrent, type-keyed descriptor store
///
/// Entries are immutable once inserted. Two threads describing the same type
/// at the same time may both run `describe`; the first insert wins and both
/// get equivalent descriptors.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    inner: DashMap<TypeRef, Arc<dyn Any + Send + Sync>>,
}

impl DescriptorRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Register a descriptor explicitly, replacing any previous one
    pub fn register<T: Send + Sync + 'static>(&self, descriptor: TypeDescriptor<T>) {
        self.inner
            .insert(TypeRef::of::<T>(), Arc::new(Arc::new(descriptor)));
    }

    /// Registered or previously derived descriptor for `T`
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<TypeDescriptor<T>>> {
        self.inner
            .get(&TypeRef::of::<T>())
            .and_then(|entry| entry.value().downcast_ref::<Arc<TypeDescriptor<T>>>().cloned())
    }

    /// Descriptor for `T`, deriving it on first use
    #[must_use]
    pub fn describe<T: Shaped>(&self) -> Arc<TypeDescriptor<T>> {
        if let Some(existing) = self.get::<T>() {
            return existing;
        }

        let derived: Arc<TypeDescriptor<T>> = Arc::new(T::describe());
        let entry = self
            .inner
            .entry(TypeRef::of::<T>())
            .or_insert_with(|| Arc::new(Arc::clone(&derived)));
        entry
            .value()
            .downcast_ref::<Arc<TypeDescriptor<T>>>()
            .cloned()
            .unwrap_or(derived)
    }

    /// Check if a descriptor is present for `T`
    #[inline]
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.inner.contains_key(&TypeRef::of::<T>())
    }

    /// Number of described types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ConstructorDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DESCRIBE_CALLS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, Clone, PartialEq)]
    struct Counted {
        n: u32,
    }

    impl Shaped for Counted {
        fn describe() -> TypeDescriptor<Self> {
            DESCRIBE_CALLS.fetch_add(1, Ordering::SeqCst);
            TypeDescriptor::builder()
                .property("N", |c: &Counted| c.n)
                .constructor(
                    ConstructorDescriptor::builder("new")
                        .param::<u32>("n")
                        .build(|args| Ok(Counted { n: args.take()? })),
                )
                .build()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Unshaped;

    #[test]
    fn describe_derives_once() {
        let registry = DescriptorRegistry::new();
        let before = DESCRIBE_CALLS.load(Ordering::SeqCst);

        let a = registry.describe::<Counted>();
        let b = registry.describe::<Counted>();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(DESCRIBE_CALLS.load(Ordering::SeqCst) - before, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn explicit_registration_is_returned() {
        let registry = DescriptorRegistry::new();
        assert!(registry.get::<Unshaped>().is_none());

        registry.register(TypeDescriptor::<Unshaped>::builder().build());

        assert!(registry.contains::<Unshaped>());
        let shape = registry.get::<Unshaped>().unwrap();
        assert!(shape.properties().is_empty());
    }

    #[test]
    fn explicit_registration_wins_over_describe() {
        let registry = DescriptorRegistry::new();
        registry.register(TypeDescriptor::<Counted>::builder().build());

        let shape = registry.describe::<Counted>();
        assert!(shape.constructors().is_empty());
    }
}
