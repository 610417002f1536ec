//! Constructor selection
//!
//! Picks the constructor that can be driven entirely from update intents,
//! current property values and declared defaults.
//!
//! # Selection Logic
//! 1. Eligibility: every intent must match some parameter (name and type).
//! 2. Binding, per parameter in declaration order: update intent, else source
//!    property, else declared default, else the constructor is out.
//! 3. Scoring: most intent-bound parameters, then most property-bound, then
//!    fewest default-bound. Ties go to the constructor declared first.

use crate::config::MatchRules;
use crate::diagnostics::{AmbiguityNotice, DiagnosticSink};
use crate::error::ResolveError;
use crate::signature::UpdateIntentDescriptor;
use std::cmp::{Ordering, Reverse};
use uw_shape::{ConstructorDescriptor, FieldValue, PropertyDescriptor, TypeRef};

/// Where one constructor argument comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSource {
    /// The update value at this signature index
    FromUpdateIntent(usize),

    /// The current value of a source property
    FromSourceProperty { name: String, index: usize },

    /// The parameter's declared default
    FromDefault(FieldValue),
}

impl ParameterSource {
    /// Check if bound to an update intent
    #[inline]
    #[must_use]
    pub fn is_intent(&self) -> bool {
        matches!(self, Self::FromUpdateIntent(_))
    }
}

/// How a constructor's parameters were satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstructorScore {
    /// Parameters bound to update intents
    pub intents: usize,
    /// Parameters bound to source properties
    pub properties: usize,
    /// Parameters bound to declared defaults
    pub defaults: usize,
}

impl ConstructorScore {
    fn rank(&self) -> (usize, usize, Reverse<usize>) {
        (self.intents, self.properties, Reverse(self.defaults))
    }
}

impl PartialOrd for ConstructorScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConstructorScore {
    /// Greater is preferred
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A fully bound constructor
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorSelection {
    /// Index into the target's constructors
    pub constructor: usize,
    /// One source per parameter, in declaration order
    pub sources: Vec<ParameterSource>,
    /// Binding tally used for ranking
    pub score: ConstructorScore,
}

/// Check that every intent can be placed on some parameter
#[must_use]
pub fn is_eligible(
    constructor: &ConstructorDescriptor,
    intents: &[UpdateIntentDescriptor],
    rules: &MatchRules,
) -> bool {
    intents.iter().all(|intent| {
        constructor
            .params()
            .iter()
            .any(|param| rules.intent_matches_parameter(intent, constructor, param))
    })
}

/// Bind every parameter of one constructor
///
/// Returns `None` if a parameter cannot be satisfied, or if some intent ends
/// up bound to no parameter.
#[must_use]
pub fn bind_constructor(
    target: TypeRef,
    index: usize,
    constructor: &ConstructorDescriptor,
    intents: &[UpdateIntentDescriptor],
    properties: &[PropertyDescriptor],
    rules: &MatchRules,
    sink: &dyn DiagnosticSink,
) -> Option<ConstructorSelection> {
    let mut sources = Vec::with_capacity(constructor.arity());
    let mut score = ConstructorScore::default();
    let mut placed = vec![false; intents.len()];

    for param in constructor.params() {
        let intent_matches: Vec<usize> = intents
            .iter()
            .enumerate()
            .filter(|(_, intent)| rules.intent_matches_parameter(intent, constructor, param))
            .map(|(i, _)| i)
            .collect();
        if let Some(&first) = intent_matches.first() {
            if intent_matches.len() > 1 {
                sink.ambiguity(&AmbiguityNotice::IntentForParameter {
                    target,
                    constructor: constructor.label().to_string(),
                    parameter: param.name().to_string(),
                    chosen: intents[first].name().to_string(),
                    candidates: intent_matches.len(),
                });
            }
            placed[first] = true;
            sources.push(ParameterSource::FromUpdateIntent(first));
            score.intents += 1;
            continue;
        }

        let property_matches: Vec<usize> = properties
            .iter()
            .enumerate()
            .filter(|(_, property)| rules.property_matches_parameter(property, constructor, param))
            .map(|(i, _)| i)
            .collect();
        if let Some(&first) = property_matches.first() {
            if property_matches.len() > 1 {
                sink.ambiguity(&AmbiguityNotice::PropertyForParameter {
                    target,
                    constructor: constructor.label().to_string(),
                    parameter: param.name().to_string(),
                    chosen: properties[first].name().to_string(),
                    candidates: property_matches.len(),
                });
            }
            sources.push(ParameterSource::FromSourceProperty {
                name: properties[first].name().to_string(),
                index: first,
            });
            score.properties += 1;
            continue;
        }

        if let Some(default) = param.default_value() {
            sources.push(ParameterSource::FromDefault(default.clone()));
            score.defaults += 1;
            continue;
        }

        return None;
    }

    if placed.iter().any(|placed| !placed) {
        return None;
    }

    Some(ConstructorSelection {
        constructor: index,
        sources,
        score,
    })
}

/// Pick the best constructor for the intents
///
/// # Errors
/// Returns `UnsatisfiableConstructor` if no constructor survives eligibility
/// and binding, including when the type describes none
pub fn select_constructor(
    target: TypeRef,
    intents: &[UpdateIntentDescriptor],
    properties: &[PropertyDescriptor],
    constructors: &[ConstructorDescriptor],
    rules: &MatchRules,
    sink: &dyn DiagnosticSink,
) -> Result<ConstructorSelection, ResolveError> {
    let mut best: Option<ConstructorSelection> = None;
    for (index, constructor) in constructors.iter().enumerate() {
        if !is_eligible(constructor, intents, rules) {
            continue;
        }
        let Some(candidate) =
            bind_constructor(target, index, constructor, intents, properties, rules, sink)
        else {
            continue;
        };
        // Strictly better only: an equal score keeps the earlier constructor
        let replace = best
            .as_ref()
            .map_or(true, |current| candidate.score > current.score);
        if replace {
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| ResolveError::UnsatisfiableConstructor {
        target,
        signature: intents
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    })
}
