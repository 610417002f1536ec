//! Type shape descriptors
//!
//! A [`TypeDescriptor`] lists the readable properties and the constructors of a
//! value type. Matching and constructor selection only look at the plain
//! descriptors ([`PropertyDescriptor`], [`ConstructorDescriptor`]); the
//! accessor closures are only touched when a plan executes.
//!
//! # Example
//!
//! ```rust
//! use uw_shape::{ConstructorDescriptor, Shaped, TypeDescriptor};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Named {
//!     name: String,
//! }
//!
//! impl Shaped for Named {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::builder()
//!             .property("Name", |s: &Named| s.name.clone())
//!             .constructor(
//!                 ConstructorDescriptor::builder("new")
//!                     .param::<String>("name")
//!                     .build(|args| Ok(Named { name: args.take()? })),
//!             )
//!             .build()
//!     }
//! }
//!
//! let shape = Named::describe();
//! assert_eq!(shape.properties().len(), 1);
//! assert_eq!(shape.constructors()[0].descriptor().params()[0].name(), "name");
//! ```

use crate::type_ref::TypeRef;
use crate::value::{Field, FieldValue};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Errors raised while invoking a constructor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    /// Constructor asked for more arguments than the plan supplied
    #[error("constructor argument {index} was not supplied")]
    MissingArgument { index: usize },

    /// Argument had a different runtime type than requested
    #[error("constructor argument {index}: expected {expected}, got {actual}")]
    ArgumentType {
        index: usize,
        expected: TypeRef,
        actual: TypeRef,
    },

    /// Constructor refused the arguments
    #[error("constructor rejected arguments: {0}")]
    Rejected(String),
}

impl ConstructError {
    /// Create rejection error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Readable property of a value type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: String,
    ty: TypeRef,
}

impl PropertyDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Property name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }
}

type Getter<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// Property descriptor together with its getter
pub struct PropertyAccessor<T> {
    descriptor: PropertyDescriptor,
    getter: Getter<T>,
}

impl<T> PropertyAccessor<T> {
    /// Create accessor from a typed getter
    pub fn new<V, F>(name: impl Into<String>, getter: F) -> Self
    where
        V: Field,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            descriptor: PropertyDescriptor::new(name, TypeRef::of::<V>()),
            getter: Arc::new(move |source| FieldValue::new(getter(source))),
        }
    }

    /// Plain descriptor
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// Read the property from `source`
    #[inline]
    #[must_use]
    pub fn read(&self, source: &T) -> FieldValue {
        (self.getter)(source)
    }
}

impl<T> Clone for PropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<T> Debug for PropertyAccessor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("name", &self.descriptor.name)
            .field("ty", &self.descriptor.ty)
            .finish_non_exhaustive()
    }
}

/// One constructor parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorParameterDescriptor {
    name: String,
    ty: TypeRef,
    default: Option<FieldValue>,
}

impl ConstructorParameterDescriptor {
    /// Parameter without a default
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    /// Parameter with a declared default
    #[inline]
    #[must_use]
    pub fn with_default<V: Field>(name: impl Into<String>, default: V) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::of::<V>(),
            default: Some(FieldValue::new(default)),
        }
    }

    /// Parameter name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Whether a default is declared
    #[inline]
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Declared default, if any
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }
}

/// Ordered parameter list of one constructor
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDescriptor {
    label: String,
    params: Vec<ConstructorParameterDescriptor>,
}

impl ConstructorDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, params: Vec<ConstructorParameterDescriptor>) -> Self {
        Self {
            label: label.into(),
            params,
        }
    }

    /// Start building a constructor
    #[inline]
    #[must_use]
    pub fn builder(label: impl Into<String>) -> ConstructorBuilder {
        ConstructorBuilder {
            label: label.into(),
            params: Vec::new(),
        }
    }

    /// Label used in diagnostics (usually the Rust function name)
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parameters in declaration order
    #[inline]
    #[must_use]
    pub fn params(&self) -> &[ConstructorParameterDescriptor] {
        &self.params
    }

    /// Number of parameters
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Positional constructor arguments
///
/// Handed to a constructor's build function; arguments are taken in
/// declaration order.
#[derive(Debug)]
pub struct ConstructorArgs {
    values: VecDeque<FieldValue>,
    next: usize,
}

impl ConstructorArgs {
    /// Wrap ordered values
    #[inline]
    #[must_use]
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// Take the next argument as `V`
    ///
    /// # Errors
    /// Returns error if no argument is left or it is not a `V`
    pub fn take<V: Any + Clone>(&mut self) -> Result<V, ConstructError> {
        let index = self.next;
        let value = self
            .values
            .pop_front()
            .ok_or(ConstructError::MissingArgument { index })?;
        self.next += 1;
        value.downcast::<V>().ok_or_else(|| ConstructError::ArgumentType {
            index,
            expected: TypeRef::of::<V>(),
            actual: value.type_ref(),
        })
    }

    /// Arguments not yet taken
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

type BuildFn<T> = Arc<dyn Fn(&mut ConstructorArgs) -> Result<T, ConstructError> + Send + Sync>;

/// Constructor descriptor together with its build function
pub struct Constructor<T> {
    descriptor: ConstructorDescriptor,
    build: BuildFn<T>,
}

impl<T> Constructor<T> {
    /// Create constructor
    pub fn new<F>(descriptor: ConstructorDescriptor, build: F) -> Self
    where
        F: Fn(&mut ConstructorArgs) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            build: Arc::new(build),
        }
    }

    /// Plain descriptor
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &ConstructorDescriptor {
        &self.descriptor
    }

    /// Invoke with ordered arguments
    ///
    /// # Errors
    /// Returns error if the build function rejects the arguments or the
    /// argument count does not match the declared parameters
    pub fn invoke(&self, args: Vec<FieldValue>) -> Result<T, ConstructError> {
        if args.len() < self.descriptor.arity() {
            return Err(ConstructError::MissingArgument { index: args.len() });
        }
        let mut args = ConstructorArgs::new(args);
        (self.build)(&mut args)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            build: Arc::clone(&self.build),
        }
    }
}

impl<T> Debug for Constructor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Constructor`]
#[derive(Debug)]
#[must_use]
pub struct ConstructorBuilder {
    label: String,
    params: Vec<ConstructorParameterDescriptor>,
}

impl ConstructorBuilder {
    /// Add a required parameter
    pub fn param<V: Field>(mut self, name: impl Into<String>) -> Self {
        self.params
            .push(ConstructorParameterDescriptor::new(name, TypeRef::of::<V>()));
        self
    }

    /// Add a parameter with a declared default
    pub fn param_with_default<V: Field>(mut self, name: impl Into<String>, default: V) -> Self {
        self.params
            .push(ConstructorParameterDescriptor::with_default(name, default));
        self
    }

    /// Finish with the build function
    pub fn build<T, F>(self, build: F) -> Constructor<T>
    where
        F: Fn(&mut ConstructorArgs) -> Result<T, ConstructError> + Send + Sync + 'static,
    {
        Constructor::new(ConstructorDescriptor::new(self.label, self.params), build)
    }
}

/// Full shape of a value type
pub struct TypeDescriptor<T> {
    target: TypeRef,
    properties: Vec<PropertyAccessor<T>>,
    constructors: Vec<Constructor<T>>,
}

impl<T: Any> TypeDescriptor<T> {
    /// Create descriptor
    #[must_use]
    pub fn new(properties: Vec<PropertyAccessor<T>>, constructors: Vec<Constructor<T>>) -> Self {
        Self {
            target: TypeRef::of::<T>(),
            properties,
            constructors,
        }
    }

    /// Start building a descriptor
    #[inline]
    #[must_use]
    pub fn builder() -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            properties: Vec::new(),
            constructors: Vec::new(),
        }
    }
}

impl<T> TypeDescriptor<T> {
    /// Described type
    #[inline]
    #[must_use]
    pub fn target(&self) -> TypeRef {
        self.target
    }

    /// Properties in declaration order
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &[PropertyAccessor<T>] {
        &self.properties
    }

    /// Constructors in declaration order
    #[inline]
    #[must_use]
    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    /// Plain property descriptors in declaration order
    #[must_use]
    pub fn property_descriptors(&self) -> Vec<PropertyDescriptor> {
        self.properties
            .iter()
            .map(|p| p.descriptor().clone())
            .collect()
    }

    /// Plain constructor descriptors in declaration order
    #[must_use]
    pub fn constructor_descriptors(&self) -> Vec<ConstructorDescriptor> {
        self.constructors
            .iter()
            .map(|c| c.descriptor().clone())
            .collect()
    }
}

impl<T> Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("target", &self.target)
            .field("properties", &self.properties)
            .field("constructors", &self.constructors)
            .finish()
    }
}

/// Builder for [`TypeDescriptor`]
#[must_use]
pub struct TypeDescriptorBuilder<T> {
    properties: Vec<PropertyAccessor<T>>,
    constructors: Vec<Constructor<T>>,
}

impl<T: Any> TypeDescriptorBuilder<T> {
    /// Add a readable property
    pub fn property<V, F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        V: Field,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.properties.push(PropertyAccessor::new(name, getter));
        self
    }

    /// Add a constructor
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> TypeDescriptor<T> {
        TypeDescriptor::new(self.properties, self.constructors)
    }
}

/// Types that can describe their own shape
///
/// This is the metadata supplier: implement it by hand, generate it at build
/// time, or register a descriptor explicitly with
/// [`DescriptorRegistry::register`](crate::DescriptorRegistry::register).
pub trait Shaped: Sized + Send + Sync + 'static {
    /// Describe properties and constructors
    fn describe() -> TypeDescriptor<Self>;
}
