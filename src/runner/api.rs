//! The coordinator.
//!
//! `ExprHelper` owns the type system, the registry, the resolver chains and
//! the resolution caches. Registration needs `&mut self`, so nothing can be
//! evaluating while the registry changes; every registration also drops
//! both resolution caches. Evaluation only needs `&self` and may run from
//! many threads at once.
//!
//! ```text
//! ExprHelper
//!   ├── TypeSystem          (descriptors + memoized closures)
//!   ├── ImplicitRegistry    (methods, functions, constructor aliases)
//!   └── ResolverChains
//!         methods:       native-method → implicit-method
//!         properties:    implicit-property
//!         constructors:  native-constructor → implicit-constructor
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::{TypeDescriptor, TypeSystem};
use crate::runner::ds::value::{FromValue, Value};
use crate::runner::eval::context::EvaluationContext;
use crate::runner::eval::expression::{evaluate_expression, Expr};
use crate::runner::plugin::chain::ResolverChains;
use crate::runner::plugin::config::HelperConfig;
use crate::runner::plugin::core_resolver::{NativeConstructorResolver, NativeMethodResolver};
use crate::runner::plugin::implicit_constructor::ImplicitConstructorResolver;
use crate::runner::plugin::implicit_method::ImplicitMethodResolver;
use crate::runner::plugin::implicit_property::ImplicitPropertyAccessor;
use crate::runner::plugin::registry::ImplicitRegistry;
use crate::runner::plugin::resolver::{ConstructorResolver, MethodResolver, PropertyAccessor};
use crate::runner::plugin::types::{FunctionLibrary, RegisteredConstructor, RegisteredFunction};
use crate::runner::std_lib::{register_core_libraries, register_core_types};

pub struct ExprHelper {
    config: HelperConfig,
    types: TypeSystem,
    registry: ImplicitRegistry,
    chains: ResolverChains,
    implicit_methods: Arc<ImplicitMethodResolver>,
    implicit_properties: Arc<ImplicitPropertyAccessor>,
    active: Mutex<FxHashMap<Uuid, usize>>,
}

impl ExprHelper {
    /// A helper with the built-in types, the default libraries and every
    /// implicit resolver installed.
    pub fn new() -> Self {
        Self::with_config(HelperConfig::default())
    }

    pub fn with_config(config: HelperConfig) -> Self {
        let mut types = TypeSystem::new();
        register_core_types(&mut types);

        let registry = ImplicitRegistry::new();
        register_core_libraries(&registry, &config.defaults);

        let implicit_methods = Arc::new(ImplicitMethodResolver::new());
        let implicit_properties = Arc::new(ImplicitPropertyAccessor::new());

        let mut chains = ResolverChains::new();
        chains.add_method_resolver(Arc::new(NativeMethodResolver));
        chains.add_method_resolver(implicit_methods.clone());
        if config.resolution.implicit_properties {
            chains.add_property_accessor(implicit_properties.clone());
        }
        chains.add_constructor_resolver(Arc::new(NativeConstructorResolver));
        if config.resolution.implicit_constructors {
            chains.add_constructor_resolver(Arc::new(ImplicitConstructorResolver::new()));
        }

        tracing::debug!(
            types = types.len(),
            functions = registry.function_names().len(),
            implicit_methods = registry.method_keys().len(),
            "helper initialized"
        );

        ExprHelper {
            config,
            types,
            registry,
            chains,
            implicit_methods,
            implicit_properties,
            active: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeSystem {
        &self.types
    }

    pub fn registry(&self) -> &ImplicitRegistry {
        &self.registry
    }

    pub fn chains(&self) -> &ResolverChains {
        &self.chains
    }

    /// Contexts currently inside an evaluation, with the number of
    /// evaluations running on each.
    pub fn active_evaluations(&self) -> &Mutex<FxHashMap<Uuid, usize>> {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Number of `(type, name)` verdicts held by the implicit-method cache.
    pub fn method_cache_len(&self) -> usize {
        self.implicit_methods.cache().len()
    }

    /// Number of `(type, name)` verdicts held by the implicit-property cache.
    pub fn property_cache_len(&self) -> usize {
        self.implicit_properties.cache().len()
    }

    // ── Registration ──────────────────────────────────────────────

    /// Register the eligible functions of `library` as implicit methods on
    /// the type of their first parameter.
    pub fn register_implicit_methods(&mut self, library: &FunctionLibrary) -> &mut Self {
        self.registry.register_implicit_methods(library);
        self.clear_caches();
        self
    }

    /// Register the eligible functions of `library` as extension functions.
    pub fn register_functions(&mut self, library: &FunctionLibrary) -> &mut Self {
        self.registry.register_functions(library);
        self.clear_caches();
        self
    }

    /// Define the type and make its public constructors reachable by its
    /// simple name.
    pub fn register_constructors(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.registry.register_constructors(&descriptor);
        self.types.define(descriptor);
        self.clear_caches();
        self
    }

    /// Define a type without registering any alias.
    pub fn define_type(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.define(descriptor);
        self.clear_caches();
        self
    }

    pub fn add_method_resolver(&mut self, resolver: Arc<dyn MethodResolver>) -> &mut Self {
        self.chains.add_method_resolver(resolver);
        self.clear_caches();
        self
    }

    pub fn add_property_accessor(&mut self, accessor: Arc<dyn PropertyAccessor>) -> &mut Self {
        self.chains.add_property_accessor(accessor);
        self
    }

    pub fn add_constructor_resolver(&mut self, resolver: Arc<dyn ConstructorResolver>) -> &mut Self {
        self.chains.add_constructor_resolver(resolver);
        self
    }

    /// Look up an implicit method by its `receiverType.name` key.
    pub fn lookup_implicit_method(&self, key: &str) -> Option<Arc<RegisteredFunction>> {
        self.registry.lookup_method(key)
    }

    /// Look up a constructor alias by its `Alias[param, ...]` key.
    pub fn lookup_implicit_constructor(&self, key: &str) -> Option<Arc<RegisteredConstructor>> {
        self.registry.lookup_constructor(key)
    }

    fn clear_caches(&self) {
        self.implicit_methods.cache().clear();
        self.implicit_properties.cache().clear();
    }

    // ── Evaluation ────────────────────────────────────────────────

    pub fn new_context(&self, root: Value) -> EvaluationContext<'_> {
        EvaluationContext::new(self, root)
    }

    /// Evaluate `expr` against `root` in a fresh context.
    pub fn evaluate(&self, expr: &Expr, root: Value) -> EvalResult<Value> {
        let ctx = self.new_context(root);
        self.evaluate_in(expr, &ctx)
    }

    /// Evaluate and convert the result to `T`.
    pub fn evaluate_as<T: FromValue>(&self, expr: &Expr, root: Value) -> EvalResult<T> {
        T::from_value(self.evaluate(expr, root)?)
    }

    /// Evaluate `expr` in an existing context created by this helper. The
    /// context is marked active for the duration.
    pub fn evaluate_in(&self, expr: &Expr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        if !std::ptr::eq(ctx.helper(), self) {
            return Err(EvalError::InvalidArgument(
                "context belongs to another helper".to_string(),
            ));
        }
        let _active = ctx.enter();
        evaluate_expression(expr, ctx)
    }

    /// Evaluate every expression in one shared context and return the last
    /// result.
    pub fn evaluate_all(&self, exprs: &[Expr], root: Value) -> EvalResult<Value> {
        let ctx = self.new_context(root);
        self.evaluate_all_in(exprs, &ctx)
    }

    pub fn evaluate_all_in(&self, exprs: &[Expr], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let (last, init) = exprs.split_last().ok_or_else(|| {
            EvalError::InvalidArgument("at least one expression is required".to_string())
        })?;
        for expr in init {
            self.evaluate_in(expr, ctx)?;
        }
        self.evaluate_in(last, ctx)
    }
}

impl Default for ExprHelper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::plugin::config::{DefaultsConfig, ResolutionConfig};

    #[test]
    fn test_default_chains() {
        let helper = ExprHelper::new();
        let methods: Vec<&str> = helper.chains().method_resolvers().iter().map(|r| r.name()).collect();
        let properties: Vec<&str> =
            helper.chains().property_accessors().iter().map(|a| a.name()).collect();
        let constructors: Vec<&str> =
            helper.chains().constructor_resolvers().iter().map(|r| r.name()).collect();
        assert_eq!(methods, vec!["native-method", "implicit-method"]);
        assert_eq!(properties, vec!["implicit-property"]);
        assert_eq!(constructors, vec!["native-constructor", "implicit-constructor"]);
    }

    #[test]
    fn test_config_disables_features() {
        let helper = ExprHelper::with_config(HelperConfig {
            defaults: DefaultsConfig {
                extension_functions: false,
                implicit_methods: true,
            },
            resolution: ResolutionConfig {
                implicit_properties: false,
                implicit_constructors: false,
            },
        });
        assert!(helper.chains().property_accessors().is_empty());
        assert_eq!(helper.chains().constructor_resolvers().len(), 1);
        assert!(helper.registry().function_names().is_empty());
        assert!(helper.lookup_implicit_method("util.List.sorted").is_some());
    }

    #[test]
    fn test_evaluate_all_requires_an_expression() {
        let helper = ExprHelper::new();
        assert!(matches!(
            helper.evaluate_all(&[], Value::Null),
            Err(EvalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_evaluate_all_returns_last() {
        let helper = ExprHelper::new();
        let result = helper
            .evaluate_all(&[Expr::lit(1), Expr::lit("two")], Value::Null)
            .unwrap();
        assert_eq!(result, Value::string("two"));
    }

    #[test]
    fn test_context_from_another_helper_is_rejected() {
        let a = ExprHelper::new();
        let b = ExprHelper::new();
        let ctx = a.new_context(Value::Null);
        assert!(b.evaluate_in(&Expr::Root, &ctx).is_err());
        assert_eq!(a.evaluate_in(&Expr::Root, &ctx), Ok(Value::Null));
    }

    #[test]
    fn test_registration_clears_caches() {
        let mut helper = ExprHelper::new();
        let expr = Expr::lit(5).method("twice", vec![]);
        assert!(helper.evaluate(&expr, Value::Null).is_err());
        assert_eq!(helper.method_cache_len(), 1);
        helper.register_functions(&FunctionLibrary::new("empty"));
        assert_eq!(helper.method_cache_len(), 0);
    }
}
