//! Construction plans
//!
//! A [`ConstructionPlan`] is compiled once per (target, declaring type,
//! signature) and then executed for any source instance and any set of raw
//! update values.
//!
//! Execution has two phases:
//! 1. Change test: each intent's value is compared with the current value of
//!    its matched property. No change means the source `Arc` is returned as is.
//! 2. Construction: every constructor argument is taken from its
//!    [`ParameterSource`] and the constructor is invoked.

use crate::config::MatchRules;
use crate::diagnostics::DiagnosticSink;
use crate::error::{ResolveError, UpdateError};
use crate::matcher::match_intents;
use crate::selector::{select_constructor, ParameterSource};
use crate::signature::{CacheKey, UpdateIntentDescriptor, UpdateSignature};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use uw_shape::{Constructor, FieldValue, PropertyAccessor, RawUpdate, TypeDescriptor};

/// Update intent paired with the property it is compared against
pub struct IntentBinding<T> {
    intent: UpdateIntentDescriptor,
    property: PropertyAccessor<T>,
}

impl<T> IntentBinding<T> {
    /// Update intent
    #[inline]
    #[must_use]
    pub fn intent(&self) -> &UpdateIntentDescriptor {
        &self.intent
    }

    /// Matched source property
    #[inline]
    #[must_use]
    pub fn property(&self) -> &PropertyAccessor<T> {
        &self.property
    }
}

impl<T> Clone for IntentBinding<T> {
    fn clone(&self) -> Self {
        Self {
            intent: self.intent.clone(),
            property: self.property.clone(),
        }
    }
}

impl<T> Debug for IntentBinding<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentBinding")
            .field("intent", &self.intent)
            .field("property", &self.property.descriptor().name())
            .finish()
    }
}

/// Reusable recipe for rebuilding a `T` from a source and update values
///
/// Immutable once compiled; holds no per-call state.
pub struct ConstructionPlan<T> {
    key: CacheKey,
    constructor: Constructor<T>,
    parameter_sources: Vec<ParameterSource>,
    intents: Vec<IntentBinding<T>>,
    properties: Vec<PropertyAccessor<T>>,
}

impl<T: Send + Sync + 'static> ConstructionPlan<T> {
    /// Compile a plan for `signature` against `descriptor`
    ///
    /// # Errors
    /// Returns error if an intent has no property or no constructor qualifies
    pub fn compile(
        descriptor: &TypeDescriptor<T>,
        signature: &UpdateSignature,
        rules: &MatchRules,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ResolveError> {
        let target = descriptor.target();
        let properties = descriptor.property_descriptors();

        let matches = match_intents(signature.intents(), target, &properties, rules, sink)?;
        let selection = select_constructor(
            target,
            signature.intents(),
            &properties,
            &descriptor.constructor_descriptors(),
            rules,
            sink,
        )?;

        let intents = matches
            .iter()
            .map(|m| IntentBinding {
                intent: signature.intents()[m.intent].clone(),
                property: descriptor.properties()[m.property].clone(),
            })
            .collect();

        Ok(Self {
            key: signature.cache_key(target, rules.id()),
            constructor: descriptor.constructors()[selection.constructor].clone(),
            parameter_sources: selection.sources,
            intents,
            properties: descriptor.properties().to_vec(),
        })
    }

    /// Apply update values to `source`
    ///
    /// Returns `source` itself (same `Arc`) when no value indicates a change.
    ///
    /// # Errors
    /// Returns error on arity or value type mismatch, or if the constructor fails
    pub fn execute(&self, source: &Arc<T>, values: &[RawUpdate]) -> Result<Arc<T>, UpdateError> {
        match self.rebuild(source, values)? {
            Some(rebuilt) => Ok(Arc::new(rebuilt)),
            None => Ok(Arc::clone(source)),
        }
    }

    /// Array-framed entry point where source and values may be absent
    ///
    /// # Errors
    /// Returns `NullSource` or `NullValues` for absent inputs, otherwise as
    /// [`execute`](Self::execute)
    pub fn execute_array(
        &self,
        source: Option<&Arc<T>>,
        values: Option<&[RawUpdate]>,
    ) -> Result<Arc<T>, UpdateError> {
        let source = source.ok_or(UpdateError::NullSource)?;
        let values = values.ok_or(UpdateError::NullValues)?;
        self.execute(source, values)
    }

    /// Build a new value, or `None` if nothing changes
    ///
    /// # Errors
    /// Returns error on arity or value type mismatch, or if the constructor fails
    pub fn rebuild(&self, source: &T, values: &[RawUpdate]) -> Result<Option<T>, UpdateError> {
        self.check_values(values)?;

        let current: Vec<FieldValue> = self
            .intents
            .iter()
            .map(|binding| binding.property.read(source))
            .collect();

        let changed = values
            .iter()
            .zip(&current)
            .any(|(value, current)| value.indicates_change_from_value(current));
        if !changed {
            return Ok(None);
        }

        let args = self
            .parameter_sources
            .iter()
            .map(|param| match param {
                ParameterSource::FromUpdateIntent(index) => {
                    values[*index].clone().get_value(current[*index].clone())
                }
                ParameterSource::FromSourceProperty { index, .. } => {
                    self.properties[*index].read(source)
                }
                ParameterSource::FromDefault(default) => default.clone(),
            })
            .collect();

        Ok(Some(self.constructor.invoke(args)?))
    }

    fn check_values(&self, values: &[RawUpdate]) -> Result<(), UpdateError> {
        if values.len() != self.intents.len() {
            return Err(UpdateError::arity(self.intents.len(), values.len()));
        }
        for (binding, value) in self.intents.iter().zip(values) {
            if let Some(actual) = value.value_type() {
                let expected = binding.intent.inner();
                if actual != expected {
                    return Err(UpdateError::ValueTypeMismatch {
                        intent: binding.intent.name().to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<T> ConstructionPlan<T> {
    /// Key this plan was compiled for
    #[inline]
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Label of the selected constructor
    #[inline]
    #[must_use]
    pub fn constructor_label(&self) -> &str {
        self.constructor.descriptor().label()
    }

    /// Source of each constructor argument, in parameter order
    #[inline]
    #[must_use]
    pub fn parameter_sources(&self) -> &[ParameterSource] {
        &self.parameter_sources
    }

    /// Intent bindings, in signature order
    #[inline]
    #[must_use]
    pub fn intents(&self) -> &[IntentBinding<T>] {
        &self.intents
    }

    /// Number of update values expected
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.intents.len()
    }
}

impl<T> Debug for ConstructionPlan<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionPlan")
            .field("key", &self.key)
            .field("constructor", &self.constructor_label())
            .field("parameter_sources", &self.parameter_sources)
            .field("intents", &self.intents)
            .finish()
    }
}
