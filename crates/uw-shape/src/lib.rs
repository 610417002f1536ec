//! UW Shape
//!
//! Runtime shape model for immutable value types.
//!
//! # Core Concepts
//!
//! - [`TypeRef`]: Type identity used in descriptors and cache keys
//! - [`FieldValue`]: Shared, type-erased field value with `PartialEq` semantics
//! - [`OptionalValue`]: Tri-state update container (`Unset` / `Set`)
//! - [`TypeDescriptor`]: Properties and constructors of a value type
//! - [`Shaped`]: Metadata supplier trait
//! - [`DescriptorRegistry`]: Lazily derived, shared descriptors
//!
//! # Example
//!
//! ```rust
//! use uw_shape::{FieldValue, OptionalValue};
//!
//! let keep: OptionalValue<Option<String>> = OptionalValue::Unset;
//! let clear: OptionalValue<Option<String>> = OptionalValue::Set(None);
//! let current = Some("title".to_string());
//!
//! assert!(!keep.indicates_change_from_value(&current));
//! assert!(clear.indicates_change_from_value(&current));
//!
//! let erased = clear.erase();
//! assert!(!erased.indicates_change_from_value(&FieldValue::new(None::<String>)));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod descriptor;
mod optional;
mod registry;
mod type_ref;
mod value;

// Re-exports
pub use descriptor::{
    ConstructError, Constructor, ConstructorArgs, ConstructorBuilder, ConstructorDescriptor,
    ConstructorParameterDescriptor, PropertyAccessor, PropertyDescriptor, Shaped,
    TypeDescriptor, TypeDescriptorBuilder,
};
pub use optional::{OptionalValue, RawUpdate};
pub use registry::DescriptorRegistry;
pub use type_ref::TypeRef;
pub use value::{Field, FieldValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
