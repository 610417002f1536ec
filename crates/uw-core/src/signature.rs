//! Update signatures and cache keys
//!
//! An [`UpdateSignature`] is what an update method declares about itself: the
//! type it is declared on and its ordered update intents. It is registered
//! once (typically in a lazily initialised static next to the method) and
//! passed to the resolver on every call.

use crate::config::RulesId;
use crate::error::ResolveError;
use std::fmt::{self, Display, Formatter};
use uw_shape::{Field, TypeRef};

/// One named update intent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateIntentDescriptor {
    name: String,
    inner: TypeRef,
}

impl UpdateIntentDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, inner: TypeRef) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Descriptor for an intent carrying `V`
    #[inline]
    #[must_use]
    pub fn of<V: Field>(name: impl Into<String>) -> Self {
        Self::new(name, TypeRef::of::<V>())
    }

    /// Intent name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type carried once unwrapped from `OptionalValue`
    #[inline]
    #[must_use]
    pub fn inner(&self) -> TypeRef {
        self.inner
    }
}

impl Display for UpdateIntentDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.inner)
    }
}

/// Declared update-parameter list of one update method
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateSignature {
    declaring: TypeRef,
    intents: Vec<UpdateIntentDescriptor>,
}

impl UpdateSignature {
    /// Create signature
    ///
    /// # Errors
    /// Returns error if `intents` is empty
    pub fn new(declaring: TypeRef, intents: Vec<UpdateIntentDescriptor>) -> Result<Self, ResolveError> {
        if intents.is_empty() {
            return Err(ResolveError::EmptySignature { declaring });
        }
        Ok(Self { declaring, intents })
    }

    /// Start a signature declared on `D`
    #[inline]
    #[must_use]
    pub fn builder<D: 'static>() -> SignatureBuilder {
        SignatureBuilder {
            declaring: TypeRef::of::<D>(),
            intents: Vec::new(),
        }
    }

    /// Type the update method is declared on
    #[inline]
    #[must_use]
    pub fn declaring(&self) -> TypeRef {
        self.declaring
    }

    /// Ordered update intents
    #[inline]
    #[must_use]
    pub fn intents(&self) -> &[UpdateIntentDescriptor] {
        &self.intents
    }

    /// Number of update intents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Cache key for resolving this signature against `target` under the
    /// match rules identified by `rules`
    #[must_use]
    pub fn cache_key(&self, target: TypeRef, rules: RulesId) -> CacheKey {
        CacheKey {
            target,
            declaring: self.declaring,
            rules,
            signature: self
                .intents
                .iter()
                .map(|intent| (intent.name.clone(), intent.inner))
                .collect(),
        }
    }
}

impl Display for UpdateSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let intents: Vec<String> = self.intents.iter().map(ToString::to_string).collect();
        write!(f, "{}({})", self.declaring, intents.join(", "))
    }
}

/// Builder for [`UpdateSignature`]
#[derive(Debug)]
#[must_use]
pub struct SignatureBuilder {
    declaring: TypeRef,
    intents: Vec<UpdateIntentDescriptor>,
}

impl SignatureBuilder {
    /// Add an update intent carrying `V`
    pub fn intent<V: Field>(mut self, name: impl Into<String>) -> Self {
        self.intents.push(UpdateIntentDescriptor::of::<V>(name));
        self
    }

    /// Finish building
    ///
    /// # Errors
    /// Returns error if no intent was added
    pub fn build(self) -> Result<UpdateSignature, ResolveError> {
        UpdateSignature::new(self.declaring, self.intents)
    }
}

/// Plan cache key
///
/// Structural: two keys are equal iff target type, declaring type, match
/// rules and the full ordered (name, type) list are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    target: TypeRef,
    declaring: TypeRef,
    rules: RulesId,
    signature: Vec<(String, TypeRef)>,
}

impl CacheKey {
    /// Type being constructed
    #[inline]
    #[must_use]
    pub fn target(&self) -> TypeRef {
        self.target
    }

    /// Type the update method is declared on
    #[inline]
    #[must_use]
    pub fn declaring(&self) -> TypeRef {
        self.declaring
    }

    /// Match rules the plan is compiled under
    #[inline]
    #[must_use]
    pub fn rules(&self) -> RulesId {
        self.rules
    }

    /// Ordered (name, type) pairs
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &[(String, TypeRef)] {
        &self.signature
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}(", self.target, self.declaring)?;
        for (i, (name, ty)) in self.signature.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {ty}")?;
        }
        write!(f, ") under {}", self.rules)
    }
}
