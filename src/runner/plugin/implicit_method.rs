//! Implicit methods - registered free functions called as if they were
//! methods of their first parameter's type.
//!
//! `receiver.name(a1..an)` dispatches to `function(receiver, a1..an)`. The
//! search walks the receiver type's closure, so the nearest registration
//! wins and a registration on the exact type beats inherited ones. Verdicts
//! are cached per `(runtime type, name)`, including negative ones.

use std::sync::Arc;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::TypeRef;
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::cache::{CacheKey, ResolutionCache};
use crate::runner::plugin::resolver::{MethodExecutor, MethodResolver, SharedMethodExecutor};
use crate::runner::plugin::types::RegisteredFunction;

/// Calls a registered function with exactly the given arguments; the target
/// is ignored.
pub struct FunctionExecutor {
    function: Arc<RegisteredFunction>,
}

impl FunctionExecutor {
    pub fn new(function: Arc<RegisteredFunction>) -> Self {
        FunctionExecutor { function }
    }
}

impl MethodExecutor for FunctionExecutor {
    fn execute(
        &self,
        ctx: &EvaluationContext<'_>,
        _target: &Value,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        self.function.invoke(ctx, args)
    }

    fn accepts_arg_count(&self, count: usize) -> bool {
        let def = &self.function.def;
        if def.variadic {
            count + 1 >= def.params.len()
        } else {
            count == def.params.len()
        }
    }
}

/// Prepends the receiver to the arguments and calls the wrapped executor
/// without a target.
pub struct ImplicitMethodExecutor {
    executor: SharedMethodExecutor,
}

impl ImplicitMethodExecutor {
    pub fn new(executor: SharedMethodExecutor) -> Self {
        ImplicitMethodExecutor { executor }
    }
}

impl MethodExecutor for ImplicitMethodExecutor {
    fn execute(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(target.clone());
        full.extend(args);
        self.executor.execute(ctx, &Value::Null, full)
    }

    fn accepts_arg_count(&self, count: usize) -> bool {
        self.executor.accepts_arg_count(count + 1)
    }
}

pub struct ImplicitMethodResolver {
    cache: ResolutionCache<SharedMethodExecutor>,
}

impl ImplicitMethodResolver {
    pub fn new() -> Self {
        ImplicitMethodResolver {
            cache: ResolutionCache::new(),
        }
    }

    pub fn cache(&self) -> &ResolutionCache<SharedMethodExecutor> {
        &self.cache
    }

    /// Nearest registration for `name` along the closure of `ty`.
    fn lookup_method(
        ctx: &EvaluationContext<'_>,
        ty: &TypeRef,
        name: &str,
    ) -> Option<Arc<RegisteredFunction>> {
        ctx.types()
            .closure(ty)
            .iter()
            .find_map(|ancestor| ctx.registry().lookup_method_for(ancestor, name))
    }

    fn find(ctx: &EvaluationContext<'_>, ty: &TypeRef, name: &str) -> Option<SharedMethodExecutor> {
        let function = Self::lookup_method(ctx, ty, name)?;
        let def = &function.def;
        let accepts_receiver = def
            .receiver_type()
            .map(|receiver| ctx.types().is_assignable(receiver, ty))
            .unwrap_or(false);
        if !(def.is_visible() && def.is_static() && accepts_receiver) {
            tracing::trace!(
                receiver = %ty,
                function = %function.qualified_name(),
                "implicit method rejected"
            );
            return None;
        }
        tracing::trace!(
            receiver = %ty,
            function = %function.qualified_name(),
            "implicit method resolved"
        );
        let inner: SharedMethodExecutor = Arc::new(FunctionExecutor::new(function));
        Some(Arc::new(ImplicitMethodExecutor::new(inner)))
    }
}

impl MethodResolver for ImplicitMethodResolver {
    /// Argument types beyond the receiver are checked when the executor runs,
    /// so a zero-argument lookup never caches a verdict against an n-ary
    /// call. Callers that need a given arity ask the executor.
    fn resolve(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        _arg_types: &[TypeRef],
    ) -> EvalResult<Option<SharedMethodExecutor>> {
        let ty = match target.type_ref() {
            Some(ty) => ty,
            None => return Ok(None),
        };
        self.cache
            .get_or_compute::<EvalError, _>(CacheKey::new(&ty, name), || Ok(Self::find(ctx, &ty, name)))
    }

    fn name(&self) -> &str {
        "implicit-method"
    }
}

impl Default for ImplicitMethodResolver {
    fn default() -> Self {
        Self::new()
    }
}
