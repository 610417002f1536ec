//! Error types for plan resolution and execution
//!
//! Provides error handling for:
//! - Resolution (signature → construction plan)
//! - Execution (source + raw values → instance)
//! - Configuration loading

use uw_shape::{ConstructError, TypeRef};

/// Errors while resolving a construction plan
///
/// All of these are structural: retrying with the same inputs fails the same
/// way, and nothing is cached when they occur.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Signature has no update intents
    #[error("update signature declared on {declaring} must declare at least one update intent")]
    EmptySignature { declaring: TypeRef },

    /// Update intent has no matching property on the target
    #[error("unable to map update argument '{intent}' onto a property of {target}")]
    UnmappableArgument { intent: String, target: TypeRef },

    /// No constructor can take every intent and fill every parameter
    ///
    /// Also covers a target that describes no constructors at all.
    #[error(
        "no constructor of {target} can be satisfied using all update arguments ({signature})"
    )]
    UnsatisfiableConstructor { target: TypeRef, signature: String },
}

impl ResolveError {
    /// Create unmappable argument error
    pub fn unmappable(intent: impl Into<String>, target: TypeRef) -> Self {
        Self::UnmappableArgument {
            intent: intent.into(),
            target,
        }
    }
}

/// Errors while executing a plan (or resolving one on the way)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// Source instance was absent
    #[error("source must not be absent")]
    NullSource,

    /// Update values collection was absent
    #[error("update values must not be absent")]
    NullValues,

    /// Wrong number of update values
    #[error("there must be precisely {expected} update values provided, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Update value had a different runtime type than its intent declares
    #[error("update value for '{intent}' must be {expected}, got {actual}")]
    ValueTypeMismatch {
        intent: String,
        expected: TypeRef,
        actual: TypeRef,
    },

    /// Constructor invocation failed
    #[error("construction failed: {0}")]
    Construction(#[from] ConstructError),

    /// Plan could not be resolved
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}

impl UpdateError {
    /// Create arity mismatch error
    #[inline]
    #[must_use]
    pub fn arity(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    /// Check if error happened before a plan existed
    #[inline]
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }
}

/// Errors while loading resolver configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML document could not be parsed
    #[error("invalid resolver config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type alias for updates
pub type UpdateResult<T> = Result<T, UpdateError>;
