//! Type-erased field values
//!
//! Provides [`Field`], implemented for every clonable, comparable, thread-safe
//! type, and [`FieldValue`], the shared handle that descriptors and plans pass
//! around without knowing the concrete type.

use crate::type_ref::TypeRef;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A value that can flow through a construction plan
///
/// Blanket-implemented for `T: Any + Send + Sync + Debug + Clone + PartialEq`.
/// Absent values are modelled with `Option<U>`: `None` is the absent value and
/// compares equal only to another `None` of the same type.
pub trait Field: Any + Send + Sync + Debug {
    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Equality against another erased value
    ///
    /// Values of different types are never equal.
    fn dyn_eq(&self, other: &dyn Field) -> bool;

    /// Runtime type of this value
    fn type_ref(&self) -> TypeRef;
}

impl<T> Field for T
where
    T: Any + Send + Sync + Debug + Clone + PartialEq,
{
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Field) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    #[inline]
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<T>()
    }
}

/// Shared, immutable, type-erased value
///
/// Cheap to clone (Arc). Equality delegates to the wrapped type's `PartialEq`.
#[derive(Clone)]
pub struct FieldValue(Arc<dyn Field>);

impl FieldValue {
    /// Wrap a value
    ///
    /// Wrapping an existing `FieldValue` returns a clone of it rather than
    /// nesting it.
    #[must_use]
    pub fn new<T: Field>(value: T) -> Self {
        if let Some(existing) = (&value as &dyn Any).downcast_ref::<FieldValue>() {
            return existing.clone();
        }
        Self(Arc::new(value))
    }

    /// Runtime type of the wrapped value
    #[inline]
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        self.0.as_ref().type_ref()
    }

    /// Borrow the wrapped value as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_ref().as_any().downcast_ref::<T>()
    }

    /// Clone the wrapped value out as `T`
    #[inline]
    #[must_use]
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Check whether the wrapped value is a `T`
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_ref().as_any().is::<T>()
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.dyn_eq(other.0.as_ref())
    }
}

impl Debug for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.0.as_ref(), f)
    }
}
