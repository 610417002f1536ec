//! Resolver facade
//!
//! [`UpdateWithHelper`] owns the plan cache, the descriptor registry, the
//! match rules and the diagnostic sink. Update methods call it with their
//! registered [`UpdateSignature`] and the raw values they received.

use crate::args::UpdateArgs;
use crate::cache::{PlanCache, PlanStore};
use crate::config::{MatchRules, ResolverConfig};
use crate::diagnostics::{DiagnosticSink, NoopSink, TracingSink};
use crate::error::{ResolveError, UpdateError};
use crate::plan::ConstructionPlan;
use crate::signature::UpdateSignature;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use uw_shape::{DescriptorRegistry, RawUpdate, Shaped, TypeDescriptor};

/// Resolves, caches and executes construction plans
pub struct UpdateWithHelper {
    rules: MatchRules,
    cache: Arc<dyn PlanStore>,
    sink: Arc<dyn DiagnosticSink>,
    descriptors: DescriptorRegistry,
}

impl UpdateWithHelper {
    /// Create helper with default configuration and a private cache
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&ResolverConfig::default())
    }

    /// Create helper from configuration
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Start building a helper
    #[inline]
    pub fn builder() -> UpdateWithHelperBuilder {
        UpdateWithHelperBuilder::default()
    }

    /// Match rules in use
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Descriptor registry; register descriptors here for types that do not
    /// implement `Shaped`
    #[inline]
    #[must_use]
    pub fn descriptors(&self) -> &DescriptorRegistry {
        &self.descriptors
    }

    /// Cached plan for `signature` against `T`, compiling it on a miss
    ///
    /// # Errors
    /// Returns error if an intent maps to no property or no constructor
    /// qualifies; failures are not cached
    pub fn resolve_plan<T: Shaped>(
        &self,
        signature: &UpdateSignature,
    ) -> Result<Arc<ConstructionPlan<T>>, ResolveError> {
        let descriptor = self.descriptors.describe::<T>();
        self.resolve_plan_with(&descriptor, signature)
    }

    /// Cached plan for `signature` against an explicit descriptor
    ///
    /// # Errors
    /// As [`resolve_plan`](Self::resolve_plan)
    pub fn resolve_plan_with<T: Send + Sync + 'static>(
        &self,
        descriptor: &TypeDescriptor<T>,
        signature: &UpdateSignature,
    ) -> Result<Arc<ConstructionPlan<T>>, ResolveError> {
        let key = signature.cache_key(descriptor.target(), self.rules.id());

        if let Some(plan) = self.cache.lookup::<T>(&key) {
            tracing::debug!("Plan cache hit: {}", key);
            return Ok(plan);
        }
        tracing::debug!("Plan cache miss: {}", key);

        let plan = Arc::new(self.compile(descriptor, signature)?);
        self.cache.store(Arc::clone(&plan));
        tracing::info!(
            "Compiled plan for {} using constructor '{}'",
            key,
            plan.constructor_label()
        );
        Ok(plan)
    }

    /// Compile a fresh plan, bypassing the cache
    ///
    /// # Errors
    /// As [`resolve_plan`](Self::resolve_plan)
    pub fn resolve_uncached<T: Shaped>(
        &self,
        signature: &UpdateSignature,
    ) -> Result<ConstructionPlan<T>, ResolveError> {
        let descriptor = self.descriptors.describe::<T>();
        self.compile(&descriptor, signature)
    }

    /// Apply positional raw values to `source`
    ///
    /// # Errors
    /// Returns resolution errors, arity or value type mismatches, and
    /// constructor failures
    pub fn update<T: Shaped>(
        &self,
        source: &Arc<T>,
        signature: &UpdateSignature,
        values: &[RawUpdate],
    ) -> Result<Arc<T>, UpdateError> {
        let plan = self.resolve_plan::<T>(signature)?;
        plan.execute(source, values)
    }

    /// Apply a tuple of typed values, one per intent
    ///
    /// # Errors
    /// As [`update`](Self::update); the plan is resolved before the tuple's
    /// arity is checked, same as for a slice
    pub fn update_with<T: Shaped, A: UpdateArgs>(
        &self,
        source: &Arc<T>,
        signature: &UpdateSignature,
        args: A,
    ) -> Result<Arc<T>, UpdateError> {
        self.update(source, signature, &args.into_raw())
    }

    /// Array-framed update where source and values may be absent
    ///
    /// # Errors
    /// Returns `NullSource` or `NullValues` before any resolution, otherwise
    /// as [`update`](Self::update)
    pub fn update_array<T: Shaped>(
        &self,
        source: Option<&Arc<T>>,
        signature: &UpdateSignature,
        values: Option<&[RawUpdate]>,
    ) -> Result<Arc<T>, UpdateError> {
        let source = source.ok_or(UpdateError::NullSource)?;
        let values = values.ok_or(UpdateError::NullValues)?;
        self.update(source, signature, values)
    }

    fn compile<T: Send + Sync + 'static>(
        &self,
        descriptor: &TypeDescriptor<T>,
        signature: &UpdateSignature,
    ) -> Result<ConstructionPlan<T>, ResolveError> {
        tracing::debug!("Resolving {} against {}", signature, descriptor.target());
        ConstructionPlan::compile(descriptor, signature, &self.rules, self.sink.as_ref())
    }
}

impl Default for UpdateWithHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for UpdateWithHelper {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateWithHelper")
            .field("rules", &self.rules)
            .field("descriptors", &self.descriptors.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`UpdateWithHelper`]
#[derive(Default)]
#[must_use]
pub struct UpdateWithHelperBuilder {
    config: ResolverConfig,
    rules: Option<MatchRules>,
    cache: Option<Arc<dyn PlanStore>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl UpdateWithHelperBuilder {
    /// Use configuration for rules and default sink
    pub fn config(mut self, config: &ResolverConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Use explicit match rules (overrides `config.name_matching`)
    pub fn rules(mut self, rules: MatchRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Use a shared plan store
    ///
    /// Plans are keyed by the helper's rules as well, so helpers with
    /// different rules can share one store without seeing each other's plans.
    pub fn cache(mut self, cache: Arc<dyn PlanStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use an explicit diagnostic sink (overrides `config.log_ambiguity`)
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> UpdateWithHelper {
        let rules = self
            .rules
            .unwrap_or_else(|| MatchRules::from_config(&self.config));
        let sink: Arc<dyn DiagnosticSink> = match self.sink {
            Some(sink) => sink,
            None if self.config.log_ambiguity => Arc::new(TracingSink),
            None => Arc::new(NoopSink),
        };
        let cache: Arc<dyn PlanStore> = match self.cache {
            Some(cache) => cache,
            None => Arc::new(PlanCache::new()),
        };

        UpdateWithHelper {
            rules,
            cache,
            sink,
            descriptors: DescriptorRegistry::new(),
        }
    }
}

impl Debug for UpdateWithHelperBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateWithHelperBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
