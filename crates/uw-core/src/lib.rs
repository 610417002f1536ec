//! UW Core - copy-with-updates for immutable values
//!
//! Turns an update method's declared intents into a reusable construction
//! plan that either hands back the source untouched or builds a new instance
//! through the best-fitting constructor.
//!
//! # Core Concepts
//!
//! - [`UpdateSignature`]: Declaring type plus ordered, named update intents
//! - [`MatchRules`]: Name and type comparisons used during resolution
//! - [`ConstructionPlan`]: Compiled recipe, executed per call
//! - [`PlanStore`] / [`PlanCache`]: Signature-keyed plan storage
//! - [`UpdateWithHelper`]: Facade tying descriptors, rules, cache and diagnostics together
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uw_core::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Named {
//!     name: String,
//! }
//!
//! impl Shaped for Named {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::builder()
//!             .property("Name", |n: &Named| n.name.clone())
//!             .constructor(
//!                 ConstructorDescriptor::builder("new")
//!                     .param::<String>("name")
//!                     .build(|args| Ok(Named { name: args.take()? })),
//!             )
//!             .build()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let helper = UpdateWithHelper::new();
//! let signature = UpdateSignature::builder::<Named>()
//!     .intent::<String>("name")
//!     .build()?;
//!
//! let source = Arc::new(Named { name: "test".into() });
//! let same = helper.update_with(&source, &signature, (OptionalValue::Set("test".to_string()),))?;
//! assert!(Arc::ptr_eq(&same, &source));
//!
//! let renamed = helper.update_with(&source, &signature, (OptionalValue::Set("test-new".to_string()),))?;
//! assert_eq!(renamed.name, "test-new");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod args;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod helper;
pub mod matcher;
pub mod plan;
pub mod selector;
pub mod signature;

// Re-exports for convenience
pub use args::UpdateArgs;
pub use cache::{CacheStats, ErasedPlan, PlanCache, PlanStore};
pub use config::{MatchRules, NameMatching, ResolverConfig, RulesId};
pub use diagnostics::{AmbiguityNotice, DiagnosticSink, NoopSink, RecordingSink, TracingSink};
pub use error::{ConfigError, ResolveError, ResolveResult, UpdateError, UpdateResult};
pub use helper::{UpdateWithHelper, UpdateWithHelperBuilder};
pub use matcher::{match_intent, match_intents, IntentMatch};
pub use plan::{ConstructionPlan, IntentBinding};
pub use selector::{select_constructor, ConstructorScore, ConstructorSelection, ParameterSource};
pub use signature::{CacheKey, SignatureBuilder, UpdateIntentDescriptor, UpdateSignature};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for declaring shapes and update methods
    pub use crate::{
        ConstructionPlan, ResolveError, UpdateError, UpdateSignature, UpdateWithHelper,
    };
    pub use uw_shape::{
        ConstructError, ConstructorDescriptor, OptionalValue, RawUpdate, Shaped, TypeDescriptor,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
