//! Implicit properties - zero-argument methods read as if they were fields.
//!
//! `target.name` asks every method resolver in the context (native first,
//! then implicit) for a zero-argument `name`. A method that needs further
//! arguments is not a property. The verdict is cached per
//! `(runtime type, name)` separately from the method caches. Writes are
//! always rejected.

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::cache::{CacheKey, ResolutionCache};
use crate::runner::plugin::resolver::{PropertyAccessor, SharedMethodExecutor};

pub struct ImplicitPropertyAccessor {
    cache: ResolutionCache<SharedMethodExecutor>,
}

impl ImplicitPropertyAccessor {
    pub fn new() -> Self {
        ImplicitPropertyAccessor {
            cache: ResolutionCache::new(),
        }
    }

    pub fn cache(&self) -> &ResolutionCache<SharedMethodExecutor> {
        &self.cache
    }

    fn executor_for(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
    ) -> EvalResult<Option<SharedMethodExecutor>> {
        let ty = target
            .type_ref()
            .ok_or_else(|| EvalError::InvalidArgument("target is null".to_string()))?;
        self.cache.get_or_compute::<EvalError, _>(CacheKey::new(&ty, name), || {
            for resolver in ctx.method_resolvers() {
                if let Some(executor) = resolver.resolve(ctx, target, name, &[])? {
                    if !executor.accepts_arg_count(0) {
                        continue;
                    }
                    tracing::trace!(receiver = %ty, property = name, resolver = resolver.name(), "implicit property");
                    return Ok(Some(executor));
                }
            }
            Ok(None)
        })
    }
}

impl PropertyAccessor for ImplicitPropertyAccessor {
    /// A null target is a usage error, not a missing property.
    fn can_read(&self, ctx: &EvaluationContext<'_>, target: &Value, name: &str) -> EvalResult<bool> {
        Ok(self.executor_for(ctx, target, name)?.is_some())
    }

    fn read(&self, ctx: &EvaluationContext<'_>, target: &Value, name: &str) -> EvalResult<Value> {
        match self.executor_for(ctx, target, name)? {
            Some(executor) => executor.execute(ctx, target, Vec::new()),
            None => Err(EvalError::PropertyNotFound {
                property: name.to_string(),
                target_type: target.type_name(),
            }),
        }
    }

    fn name(&self) -> &str {
        "implicit-property"
    }
}

impl Default for ImplicitPropertyAccessor {
    fn default() -> Self {
        Self::new()
    }
}
