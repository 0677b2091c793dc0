//! Native resolvers - dispatch to the methods and constructors declared on
//! type descriptors.
//!
//! These sit first in their chains, so a type's own members always shadow
//! implicit ones of the same name.

use std::sync::Arc;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::{
    render_signature, NativeConstructor, NativeMethod, TypeKind, TypeRef, Visibility,
};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::resolver::{
    ConstructorExecutor, ConstructorResolver, MethodExecutor, MethodResolver,
    SharedConstructorExecutor, SharedMethodExecutor,
};
use crate::runner::plugin::types::check_arguments;

/// Runs a native instance method on the receiver.
pub struct NativeMethodExecutor {
    method: Arc<NativeMethod>,
}

impl MethodExecutor for NativeMethodExecutor {
    fn execute(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        check_arguments(ctx.types(), &self.method.name, &self.method.params, false, &args)?;
        (self.method.body)(ctx, target, args)
    }
}

/// Resolves methods declared on the receiver's type or any of its ancestors,
/// nearest declaration first. Ancestors the receiver is not assignable to
/// (the component type of an array) are skipped.
pub struct NativeMethodResolver;

impl MethodResolver for NativeMethodResolver {
    fn resolve(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<Option<SharedMethodExecutor>> {
        let ty = match target.type_ref() {
            Some(ty) => ty,
            None => return Ok(None),
        };
        let types = ctx.types();
        for ancestor in types.closure(&ty).iter() {
            if !types.is_assignable(ancestor, &ty) {
                continue;
            }
            let descriptor = match types.descriptor_of(ancestor) {
                Some(descriptor) => descriptor,
                None => continue,
            };
            let found = descriptor.methods().iter().find(|m| {
                m.name == name
                    && m.visibility == Visibility::Public
                    && types.accepts_arguments(&m.params, false, arg_types)
            });
            if let Some(method) = found {
                tracing::trace!(receiver = %ty, declared_on = %ancestor, method = name, "native method");
                let executor: SharedMethodExecutor = Arc::new(NativeMethodExecutor {
                    method: method.clone(),
                });
                return Ok(Some(executor));
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        "native-method"
    }
}

/// Runs a native constructor for its declaring type.
pub struct NativeConstructorExecutor {
    ty: TypeRef,
    constructor: Arc<NativeConstructor>,
}

impl ConstructorExecutor for NativeConstructorExecutor {
    fn execute(&self, ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
        let what = format!("new {}", self.ty);
        check_arguments(ctx.types(), &what, &self.constructor.params, false, &args)?;
        (self.constructor.body)(ctx, &self.ty, args)
    }
}

/// Resolves constructors by fully qualified type name.
///
/// An unknown type is an error; a known type with no matching public
/// constructor declines.
pub struct NativeConstructorResolver;

impl ConstructorResolver for NativeConstructorResolver {
    fn resolve(
        &self,
        ctx: &EvaluationContext<'_>,
        type_name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<Option<SharedConstructorExecutor>> {
        let types = ctx.types();
        let descriptor = types
            .descriptor(type_name)
            .ok_or_else(|| EvalError::TypeNotFound(type_name.to_string()))?;
        if descriptor.kind() != TypeKind::Class {
            return Err(EvalError::ConstructorNotFound {
                type_name: type_name.to_string(),
                signature: render_signature(arg_types),
            });
        }
        let found = descriptor.constructors().iter().find(|c| {
            c.visibility == Visibility::Public && types.accepts_arguments(&c.params, false, arg_types)
        });
        Ok(found.map(|constructor| {
            let executor: SharedConstructorExecutor = Arc::new(NativeConstructorExecutor {
                ty: descriptor.type_ref().clone(),
                constructor: constructor.clone(),
            });
            executor
        }))
    }

    fn name(&self) -> &str {
        "native-constructor"
    }
}
