//! Resolver chains - ordered resolvers consulted until one accepts.
//!
//! ## How It Works
//!
//! ```text
//! receiver.sorted()
//!      ↓
//! 1. native-method resolver    → declined (List has no `sorted`)
//! 2. implicit-method resolver  → util.List.sorted found
//!      ↓
//! 3. Execute sorted(receiver)
//! ```
//!
//! A resolver that declines (`Ok(None)`) lets the chain continue. A resolver
//! that fails has its error remembered and the chain still continues; the
//! first remembered error is reported only when nobody accepts.

use std::sync::Arc;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::{render_signature, TypeRef};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::resolver::{
    ConstructorResolver, MethodResolver, PropertyAccessor, SharedConstructorExecutor,
    SharedMethodExecutor,
};

pub struct ResolverChains {
    method_resolvers: Vec<Arc<dyn MethodResolver>>,
    property_accessors: Vec<Arc<dyn PropertyAccessor>>,
    constructor_resolvers: Vec<Arc<dyn ConstructorResolver>>,
}

impl ResolverChains {
    pub fn new() -> Self {
        ResolverChains {
            method_resolvers: Vec::new(),
            property_accessors: Vec::new(),
            constructor_resolvers: Vec::new(),
        }
    }

    /// Append a method resolver. Resolvers are queried in registration order.
    pub fn add_method_resolver(&mut self, resolver: Arc<dyn MethodResolver>) {
        self.method_resolvers.push(resolver);
    }

    pub fn add_property_accessor(&mut self, accessor: Arc<dyn PropertyAccessor>) {
        self.property_accessors.push(accessor);
    }

    pub fn add_constructor_resolver(&mut self, resolver: Arc<dyn ConstructorResolver>) {
        self.constructor_resolvers.push(resolver);
    }

    pub fn method_resolvers(&self) -> &[Arc<dyn MethodResolver>] {
        &self.method_resolvers
    }

    pub fn property_accessors(&self) -> &[Arc<dyn PropertyAccessor>] {
        &self.property_accessors
    }

    pub fn constructor_resolvers(&self) -> &[Arc<dyn ConstructorResolver>] {
        &self.constructor_resolvers
    }

    pub fn resolve_method(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<SharedMethodExecutor> {
        let mut first_error = None;
        for resolver in &self.method_resolvers {
            match resolver.resolve(ctx, target, name, arg_types) {
                Ok(Some(executor)) => return Ok(executor),
                Ok(None) => {}
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| EvalError::MethodNotFound {
            method: name.to_string(),
            target_type: target.type_name(),
        }))
    }

    pub fn invoke_method(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        let arg_types: Vec<TypeRef> = args.iter().map(Value::arg_type).collect();
        let executor = self.resolve_method(ctx, target, name, &arg_types)?;
        executor.execute(ctx, target, args)
    }

    /// The first accessor that can read the property reads it.
    pub fn read_property(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
    ) -> EvalResult<Value> {
        for accessor in &self.property_accessors {
            if accessor.can_read(ctx, target, name)? {
                return accessor.read(ctx, target, name);
            }
        }
        Err(EvalError::PropertyNotFound {
            property: name.to_string(),
            target_type: target.type_name(),
        })
    }

    pub fn write_property(
        &self,
        ctx: &EvaluationContext<'_>,
        target: &Value,
        name: &str,
        value: Value,
    ) -> EvalResult<()> {
        for accessor in &self.property_accessors {
            if accessor.can_write(ctx, target, name)? {
                return accessor.write(ctx, target, name, value);
            }
        }
        Err(EvalError::WriteNotSupported {
            property: name.to_string(),
            target_type: target.type_name(),
        })
    }

    pub fn resolve_constructor(
        &self,
        ctx: &EvaluationContext<'_>,
        type_name: &str,
        arg_types: &[TypeRef],
    ) -> EvalResult<SharedConstructorExecutor> {
        let mut first_error = None;
        for resolver in &self.constructor_resolvers {
            match resolver.resolve(ctx, type_name, arg_types) {
                Ok(Some(executor)) => return Ok(executor),
                Ok(None) => {}
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| EvalError::ConstructorNotFound {
            type_name: type_name.to_string(),
            signature: render_signature(arg_types),
        }))
    }

    pub fn construct(
        &self,
        ctx: &EvaluationContext<'_>,
        type_name: &str,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        let arg_types: Vec<TypeRef> = args.iter().map(Value::arg_type).collect();
        let executor = self.resolve_constructor(ctx, type_name, &arg_types)?;
        executor.execute(ctx, args)
    }
}

impl Default for ResolverChains {
    fn default() -> Self {
        Self::new()
    }
}
