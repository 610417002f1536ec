//! Update intent → source property matching
//!
//! Every update intent needs a source property: its current value is the
//! fallback for `get_value` and the baseline for change detection.

use crate::config::MatchRules;
use crate::diagnostics::{AmbiguityNotice, DiagnosticSink};
use crate::error::ResolveError;
use crate::signature::UpdateIntentDescriptor;
use uw_shape::{PropertyDescriptor, TypeRef};

/// Property chosen for one update intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentMatch {
    /// Index into the signature's intents
    pub intent: usize,
    /// Index into the target's properties
    pub property: usize,
}

/// Find the property for one intent
///
/// First match in declaration order wins; several matches emit a notice.
///
/// # Errors
/// Returns `UnmappableArgument` if no property matches
pub fn match_intent(
    intent: &UpdateIntentDescriptor,
    target: TypeRef,
    properties: &[PropertyDescriptor],
    rules: &MatchRules,
    sink: &dyn DiagnosticSink,
) -> Result<usize, ResolveError> {
    let mut candidates = properties
        .iter()
        .enumerate()
        .filter(|(_, property)| rules.intent_matches_property(intent, property))
        .map(|(index, _)| index);

    let chosen = candidates
        .next()
        .ok_or_else(|| ResolveError::unmappable(intent.name(), target))?;

    let extra = candidates.count();
    if extra > 0 {
        sink.ambiguity(&AmbiguityNotice::PropertyForIntent {
            target,
            intent: intent.name().to_string(),
            chosen: properties[chosen].name().to_string(),
            candidates: extra + 1,
        });
    }

    Ok(chosen)
}

/// Find the property for every intent
///
/// # Errors
/// Returns the first `UnmappableArgument`; no partial result is produced
pub fn match_intents(
    intents: &[UpdateIntentDescriptor],
    target: TypeRef,
    properties: &[PropertyDescriptor],
    rules: &MatchRules,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<IntentMatch>, ResolveError> {
    intents
        .iter()
        .enumerate()
        .map(|(index, intent)| {
            match_intent(intent, target, properties, rules, sink).map(|property| IntentMatch {
                intent: index,
                property,
            })
        })
        .collect()
}
