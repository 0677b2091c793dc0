//! Per-evaluation context.
//!
//! A context borrows the helper that created it, carries the root object
//! and variables of one evaluation, and is the entry point the engine uses
//! for every member access, call and construction. Extension function
//! bodies receive it as their first argument.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::runner::api::ExprHelper;
use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::TypeSystem;
use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::ImplicitRegistry;
use crate::runner::plugin::resolver::{ConstructorResolver, MethodResolver, PropertyAccessor};

pub struct EvaluationContext<'h> {
    id: Uuid,
    helper: &'h ExprHelper,
    root: Value,
    variables: FxHashMap<String, Value>,
}

impl<'h> EvaluationContext<'h> {
    pub fn new(helper: &'h ExprHelper, root: Value) -> Self {
        EvaluationContext {
            id: Uuid::new_v4(),
            helper,
            root,
            variables: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn helper(&self) -> &'h ExprHelper {
        self.helper
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn types(&self) -> &'h TypeSystem {
        self.helper.types()
    }

    pub fn registry(&self) -> &'h ImplicitRegistry {
        self.helper.registry()
    }

    pub fn method_resolvers(&self) -> &'h [Arc<dyn MethodResolver>] {
        self.helper.chains().method_resolvers()
    }

    pub fn property_accessors(&self) -> &'h [Arc<dyn PropertyAccessor>] {
        self.helper.chains().property_accessors()
    }

    pub fn constructor_resolvers(&self) -> &'h [Arc<dyn ConstructorResolver>] {
        self.helper.chains().constructor_resolvers()
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn invoke_method(&self, target: &Value, name: &str, args: Vec<Value>) -> EvalResult<Value> {
        self.helper.chains().invoke_method(self, target, name, args)
    }

    pub fn read_property(&self, target: &Value, name: &str) -> EvalResult<Value> {
        self.helper.chains().read_property(self, target, name)
    }

    pub fn write_property(&self, target: &Value, name: &str, value: Value) -> EvalResult<()> {
        self.helper.chains().write_property(self, target, name, value)
    }

    pub fn construct(&self, type_name: &str, args: Vec<Value>) -> EvalResult<Value> {
        self.helper.chains().construct(self, type_name, args)
    }

    /// Call an extension function by its registered name.
    pub fn call_function(&self, name: &str, args: Vec<Value>) -> EvalResult<Value> {
        let function = self
            .registry()
            .lookup_function(name)
            .ok_or_else(|| EvalError::FunctionNotFound(name.to_string()))?;
        function.invoke(self, args)
    }

    /// Mark this context active until the returned guard drops. Entries are
    /// counted, so nested or concurrent evaluations of one context keep it
    /// active until the last guard drops.
    pub fn enter(&self) -> ActiveEvaluation<'_, 'h> {
        let mut active = self.helper.active_evaluations().lock();
        let count = active.entry(self.id).or_insert(0);
        *count += 1;
        if *count == 1 {
            tracing::trace!(evaluation = %self.id, "evaluation started");
        }
        ActiveEvaluation { ctx: self }
    }

    /// Is an evaluation currently running on this context?
    pub fn is_active(&self) -> bool {
        self.helper.active_evaluations().lock().contains_key(&self.id)
    }
}

/// Scope guard for one evaluation. Releases on every exit path, including
/// early returns and unwinding.
pub struct ActiveEvaluation<'c, 'h> {
    ctx: &'c EvaluationContext<'h>,
}

impl Drop for ActiveEvaluation<'_, '_> {
    fn drop(&mut self) {
        let id = self.ctx.id;
        let mut active = self.ctx.helper.active_evaluations().lock();
        let finished = match active.get_mut(&id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            _ => true,
        };
        if finished {
            active.remove(&id);
            tracing::trace!(evaluation = %id, "evaluation finished");
        }
    }
}
