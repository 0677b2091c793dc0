//! Resolver traits for methods, properties and constructors.
//!
//! The engine consults each resolver chain in priority order. A resolver
//! either returns a handle, declines with `Ok(None)` so the chain continues,
//! or fails with an error. Handles are shared and may be cached.

use std::sync::Arc;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::TypeRef;
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;

/// Something that can run a resolved method against a receiver.
pub trait MethodExecutor: Send + Sync {
    fn execute(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        args: Vec<Value>,
    ) -> EvalResult<Value>;

    /// Can this executor be called with `count` arguments after the target?
    fn accepts_arg_count(&self, _count: usize) -> bool {
        true
    }
}

/// Something that can run a resolved constructor.
pub trait ConstructorExecutor: Send + Sync {
    fn execute(&self, ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value>;
}

pub type SharedMethodExecutor = Arc<dyn MethodExecutor>;
pub type SharedConstructorExecutor = Arc<dyn ConstructorExecutor>;

pub trait MethodResolver: Send + Sync {
    /// Find an executor for `target.name(args)` given the argument types.
    fn resolve(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<Option<SharedMethodExecutor>>;

    /// Human-readable name for this resolver (for debugging/logging).
    fn name(&self) -> &str;
}

pub trait ConstructorResolver: Send + Sync {
    /// Find an executor for `new type_name(args)` given the argument types.
    fn resolve(
        &self,
        ctx: &EvaluationContext<'_>,
        type_name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<Option<SharedConstructorExecutor>>;

    fn name(&self) -> &str;
}

/// Reads (and possibly writes) named properties of a target.
///
/// Writing defaults to unsupported; accessors are read-only unless they
/// override both write methods.
pub trait PropertyAccessor: Send + Sync {
    fn can_read(&self, ctx: &EvaluationContext<'_>, target: &Value, name: &str) -> EvalResult<bool>;

    fn read(&self, ctx: &EvaluationContext<'_>, target: &Value, name: &str) -> EvalResult<Value>;

    fn can_write(
        &self,
        _ctx: &EvaluationContext<'_>,
        _target: &Value,
        _name: &str,
    ) -> EvalResult<bool> {
        Ok(false)
    }

    fn write(
        &self,
        _ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        _value: Value,
    ) -> EvalResult<()> {
        Err(EvalError::WriteNotSupported {
            property: name.to_string(),
            target_type: target.type_name(),
        })
    }

    fn name(&self) -> &str;
}
