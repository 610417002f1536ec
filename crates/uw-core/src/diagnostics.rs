//! Ambiguity diagnostics
//!
//! Resolution never fails on ambiguity: it takes the first match and reports
//! the choice to a [`DiagnosticSink`]. Sinks are invoked synchronously at the
//! point the ambiguity is detected.

use parking_lot::Mutex;
use std::fmt::{self, Display, Formatter};
use uw_shape::TypeRef;

/// Non-fatal notice emitted during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmbiguityNotice {
    /// Several properties match one update intent
    PropertyForIntent {
        target: TypeRef,
        intent: String,
        chosen: String,
        candidates: usize,
    },

    /// Several update intents match one constructor parameter
    IntentForParameter {
        target: TypeRef,
        constructor: String,
        parameter: String,
        chosen: String,
        candidates: usize,
    },

    /// Several properties match one constructor parameter with no intent
    PropertyForParameter {
        target: TypeRef,
        constructor: String,
        parameter: String,
        chosen: String,
        candidates: usize,
    },
}

impl AmbiguityNotice {
    /// Type being resolved
    #[inline]
    #[must_use]
    pub fn target(&self) -> TypeRef {
        match self {
            Self::PropertyForIntent { target, .. }
            | Self::IntentForParameter { target, .. }
            | Self::PropertyForParameter { target, .. } => *target,
        }
    }

    /// Name that was picked
    #[inline]
    #[must_use]
    pub fn chosen(&self) -> &str {
        match self {
            Self::PropertyForIntent { chosen, .. }
            | Self::IntentForParameter { chosen, .. }
            | Self::PropertyForParameter { chosen, .. } => chosen,
        }
    }
}

impl Display for AmbiguityNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PropertyForIntent {
                target,
                intent,
                chosen,
                candidates,
            } => write!(
                f,
                "{candidates} properties of {target} match update argument '{intent}', using the first: '{chosen}'"
            ),
            Self::IntentForParameter {
                target,
                constructor,
                parameter,
                chosen,
                candidates,
            } => write!(
                f,
                "{candidates} update arguments match parameter '{parameter}' of {target}::{constructor}, using the first: '{chosen}'"
            ),
            Self::PropertyForParameter {
                target,
                constructor,
                parameter,
                chosen,
                candidates,
            } => write!(
                f,
                "{candidates} properties match parameter '{parameter}' of {target}::{constructor} with no update argument, using the first: '{chosen}'"
            ),
        }
    }
}

/// Receiver for ambiguity notices
pub trait DiagnosticSink: Send + Sync {
    /// Report one notice
    fn ambiguity(&self, notice: &AmbiguityNotice);
}

/// Sink that drops everything (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    #[inline]
    fn ambiguity(&self, _notice: &AmbiguityNotice) {}
}

/// Sink that forwards notices to `tracing` at warn level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn ambiguity(&self, notice: &AmbiguityNotice) {
        tracing::warn!(ty = %notice.target(), "Ambiguous match: {}", notice);
    }
}

/// Sink that keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<AmbiguityNotice>>,
}

impl RecordingSink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded notices
    #[must_use]
    pub fn notices(&self) -> Vec<AmbiguityNotice> {
        self.notices.lock().clone()
    }

    /// Number of recorded notices
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }

    /// Drop recorded notices
    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn ambiguity(&self, notice: &AmbiguityNotice) {
        self.notices.lock().push(notice.clone());
    }
}
