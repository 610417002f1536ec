//! Tri-state update container
//!
//! [`OptionalValue`] separates "leave this field alone" from "set this field",
//! including setting it to an absent value (`Set(None)` for an `Option` field).
//! A plain `Option<T>` cannot carry that distinction.

use crate::type_ref::TypeRef;
use crate::value::{Field, FieldValue};

/// Update value that may or may not have been provided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalValue<T> {
    /// No update requested
    Unset,

    /// Update requested to the contained value
    Set(T),
}

/// Type-erased update value, as forwarded positionally to a plan
pub type RawUpdate = OptionalValue<FieldValue>;

impl<T> OptionalValue<T> {
    /// Check if a value was provided
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Borrow the contained value, if set
    #[inline]
    #[must_use]
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }

    /// Contained value if set, else `fallback`
    #[inline]
    #[must_use]
    pub fn get_value(self, fallback: T) -> T {
        match self {
            Self::Set(value) => value,
            Self::Unset => fallback,
        }
    }

    /// Map the contained value
    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> OptionalValue<U> {
        match self {
            Self::Set(value) => OptionalValue::Set(f(value)),
            Self::Unset => OptionalValue::Unset,
        }
    }
}

impl<T: PartialEq> OptionalValue<T> {
    /// Whether applying this update to `current` would change it
    ///
    /// `Unset` never indicates change. For `Option` fields, `None` against
    /// `None` is no change and `None` against `Some(_)` is a change; everything
    /// else uses the type's own `PartialEq`.
    #[inline]
    #[must_use]
    pub fn indicates_change_from_value(&self, current: &T) -> bool {
        match self {
            Self::Set(value) => value != current,
            Self::Unset => false,
        }
    }
}

impl<T: Field> OptionalValue<T> {
    /// Erase the value type for positional forwarding
    #[inline]
    #[must_use]
    pub fn erase(self) -> RawUpdate {
        self.map(FieldValue::new)
    }
}

impl RawUpdate {
    /// Runtime type of the contained value, if set
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> Option<TypeRef> {
        self.as_set().map(FieldValue::type_ref)
    }
}

impl<T> Default for OptionalValue<T> {
    #[inline]
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<T> for OptionalValue<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}
