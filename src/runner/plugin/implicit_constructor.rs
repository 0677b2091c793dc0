//! Implicit constructors - registered types constructible by simple name.
//!
//! Only the name is shortened. Once an alias matches, construction is
//! re-issued through the native resolver under the declaring type's fully
//! qualified name, which still does the overload selection.

use crate::runner::ds::error::EvalResult;
use crate::runner::ds::types::TypeRef;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::core_resolver::NativeConstructorResolver;
use crate::runner::plugin::resolver::{ConstructorResolver, SharedConstructorExecutor};

pub struct ImplicitConstructorResolver {
    delegate: NativeConstructorResolver,
}

impl ImplicitConstructorResolver {
    pub fn new() -> Self {
        ImplicitConstructorResolver {
            delegate: NativeConstructorResolver,
        }
    }
}

impl ConstructorResolver for ImplicitConstructorResolver {
    fn resolve(
        &self,
        ctx: &EvaluationContext<'_>,
        type_name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<Option<SharedConstructorExecutor>> {
        let native_error = match self.delegate.resolve(ctx, type_name, arg_types) {
            Ok(resolved) => return Ok(resolved),
            Err(err) => err,
        };
        match ctx.registry().lookup_constructor_for(type_name, arg_types) {
            Some(constructor) => {
                tracing::trace!(
                    alias = type_name,
                    declaring_type = %constructor.declaring_type,
                    "implicit constructor"
                );
                self.delegate
                    .resolve(ctx, &constructor.declaring_type.to_string(), arg_types)
            }
            None => {
                tracing::trace!(type_name, error = %native_error, "no implicit constructor");
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "implicit-constructor"
    }
}

impl Default for ImplicitConstructorResolver {
    fn default() -> Self {
        Self::new()
    }
}
