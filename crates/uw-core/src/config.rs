//! Resolver configuration
//!
//! [`ResolverConfig`] is the serializable form; [`MatchRules`] is the runtime
//! form holding the actual comparison functions used by the matcher and the
//! constructor selector.

use crate::error::ConfigError;
use crate::signature::UpdateIntentDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uw_shape::{ConstructorDescriptor, ConstructorParameterDescriptor, PropertyDescriptor, TypeRef};

/// How names are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    /// ASCII case-insensitive exact match (`name` == `Name`)
    #[default]
    CaseInsensitive,

    /// Byte-for-byte match
    Exact,
}

impl NameMatching {
    /// Identity of the unmodified rules built from this comparison
    #[inline]
    #[must_use]
    pub fn rules_id(self) -> RulesId {
        match self {
            Self::CaseInsensitive => RulesId(0),
            Self::Exact => RulesId(1),
        }
    }

    /// Compare two names under this rule
    #[inline]
    #[must_use]
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Self::CaseInsensitive => a.eq_ignore_ascii_case(b),
            Self::Exact => a == b,
        }
    }
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Name comparison used for every match
    pub name_matching: NameMatching,
    /// Whether ambiguity notices go to `tracing` when no sink is injected
    ///
    /// Off by default, so notices are dropped unless asked for.
    pub log_ambiguity: bool,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With name comparison rule
    #[inline]
    #[must_use]
    pub fn with_name_matching(mut self, name_matching: NameMatching) -> Self {
        self.name_matching = name_matching;
        self
    }

    /// With ambiguity logging switched on or off
    #[inline]
    #[must_use]
    pub fn with_log_ambiguity(mut self, log_ambiguity: bool) -> Self {
        self.log_ambiguity = log_ambiguity;
        self
    }

    /// Parse from a TOML document
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML or has unknown values
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            name_matching: NameMatching::CaseInsensitive,
            log_ambiguity: false,
        }
    }
}

/// Update intent ↔ source property comparison
pub type IntentToProperty =
    Arc<dyn Fn(&UpdateIntentDescriptor, &PropertyDescriptor) -> bool + Send + Sync>;

/// Update intent ↔ constructor parameter comparison
pub type IntentToParameter = Arc<
    dyn Fn(&UpdateIntentDescriptor, &ConstructorDescriptor, &ConstructorParameterDescriptor) -> bool
        + Send
        + Sync,
>;

/// Source property ↔ constructor parameter comparison
pub type PropertyToParameter = Arc<
    dyn Fn(&PropertyDescriptor, &ConstructorDescriptor, &ConstructorParameterDescriptor) -> bool
        + Send
        + Sync,
>;

/// Type compatibility: can a value of `source` be used where `target` is expected
pub type Assignable = Arc<dyn Fn(TypeRef, TypeRef) -> bool + Send + Sync>;

/// Identity of a [`MatchRules`] value, part of every plan cache key
///
/// Rules built only from a [`NameMatching`] share a fixed id, so helpers
/// configured alike share plans. Every override allocates a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RulesId(u64);

impl RulesId {
    fn custom() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(2);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for RulesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "rules#{}", self.0)
    }
}

/// Runtime matching rules
///
/// The three name comparisons mirror the three places a match happens; type
/// compatibility is checked separately by `assignable`. Clones keep the id.
#[derive(Clone)]
pub struct MatchRules {
    id: RulesId,
    intent_to_property: IntentToProperty,
    intent_to_parameter: IntentToParameter,
    property_to_parameter: PropertyToParameter,
    assignable: Assignable,
}

impl MatchRules {
    /// Rules using one name comparison everywhere and exact type equality
    #[must_use]
    pub fn new(name_matching: NameMatching) -> Self {
        Self {
            id: name_matching.rules_id(),
            intent_to_property: Arc::new(
                move |intent: &UpdateIntentDescriptor, property: &PropertyDescriptor| {
                    name_matching.matches(intent.name(), property.name())
                },
            ),
            intent_to_parameter: Arc::new(
                move |intent: &UpdateIntentDescriptor,
                      _constructor: &ConstructorDescriptor,
                      parameter: &ConstructorParameterDescriptor| {
                    name_matching.matches(intent.name(), parameter.name())
                },
            ),
            property_to_parameter: Arc::new(
                move |property: &PropertyDescriptor,
                      _constructor: &ConstructorDescriptor,
                      parameter: &ConstructorParameterDescriptor| {
                    name_matching.matches(property.name(), parameter.name())
                },
            ),
            assignable: Arc::new(|target: TypeRef, source: TypeRef| target == source),
        }
    }

    /// Rules derived from configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.name_matching)
    }

    /// Override the intent ↔ property comparison
    #[must_use]
    pub fn with_intent_to_property<F>(mut self, f: F) -> Self
    where
        F: Fn(&UpdateIntentDescriptor, &PropertyDescriptor) -> bool + Send + Sync + 'static,
    {
        self.intent_to_property = Arc::new(f);
        self.id = RulesId::custom();
        self
    }

    /// Override the intent ↔ parameter comparison
    #[must_use]
    pub fn with_intent_to_parameter<F>(mut self, f: F) -> Self
    where
        F: Fn(&UpdateIntentDescriptor, &ConstructorDescriptor, &ConstructorParameterDescriptor) -> bool
            + Send
            + Sync
            + 'static,
    {
        self.intent_to_parameter = Arc::new(f);
        self.id = RulesId::custom();
        self
    }

    /// Override the property ↔ parameter comparison
    #[must_use]
    pub fn with_property_to_parameter<F>(mut self, f: F) -> Self
    where
        F: Fn(&PropertyDescriptor, &ConstructorDescriptor, &ConstructorParameterDescriptor) -> bool
            + Send
            + Sync
            + 'static,
    {
        self.property_to_parameter = Arc::new(f);
        self.id = RulesId::custom();
        self
    }

    /// Override type compatibility
    #[must_use]
    pub fn with_assignable<F>(mut self, f: F) -> Self
    where
        F: Fn(TypeRef, TypeRef) -> bool + Send + Sync + 'static,
    {
        self.assignable = Arc::new(f);
        self.id = RulesId::custom();
        self
    }

    /// Identity used to keep plans compiled under different rules apart
    #[inline]
    #[must_use]
    pub fn id(&self) -> RulesId {
        self.id
    }

    /// Intent matches property by name and type
    #[inline]
    #[must_use]
    pub fn intent_matches_property(
        &self,
        intent: &UpdateIntentDescriptor,
        property: &PropertyDescriptor,
    ) -> bool {
        (self.assignable)(intent.inner(), property.ty()) && (self.intent_to_property)(intent, property)
    }

    /// Intent matches constructor parameter by name and type
    #[inline]
    #[must_use]
    pub fn intent_matches_parameter(
        &self,
        intent: &UpdateIntentDescriptor,
        constructor: &ConstructorDescriptor,
        parameter: &ConstructorParameterDescriptor,
    ) -> bool {
        (self.assignable)(parameter.ty(), intent.inner())
            && (self.intent_to_parameter)(intent, constructor, parameter)
    }

    /// Property matches constructor parameter by name and type
    #[inline]
    #[must_use]
    pub fn property_matches_parameter(
        &self,
        property: &PropertyDescriptor,
        constructor: &ConstructorDescriptor,
        parameter: &ConstructorParameterDescriptor,
    ) -> bool {
        (self.assignable)(parameter.ty(), property.ty())
            && (self.property_to_parameter)(property, constructor, parameter)
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self::new(NameMatching::default())
    }
}

impl Debug for MatchRules {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchRules")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
