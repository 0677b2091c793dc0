//! Registry of implicit methods, extension functions and constructor aliases.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::types::{
    constructor_key, method_key, FunctionLibrary, RegisteredConstructor, RegisteredFunction,
};
use crate::runner::ds::types::{TypeDescriptor, TypeRef, Visibility};

/// Registry for extensions, keyed by normalized strings.
///
/// Reads take a shared lock and may run concurrently with each other.
/// Registration takes the write lock; it is additive, and re-registering an
/// existing key silently replaces the previous entry.
pub struct ImplicitRegistry {
    /// `receiverType.name` -> implicit method.
    methods: RwLock<FxHashMap<String, Arc<RegisteredFunction>>>,

    /// Simple name -> extension function.
    functions: RwLock<FxHashMap<String, Arc<RegisteredFunction>>>,

    /// `Alias[param, ...]` -> constructor.
    constructors: RwLock<FxHashMap<String, Arc<RegisteredConstructor>>>,
}

impl ImplicitRegistry {
    pub fn new() -> Self {
        ImplicitRegistry {
            methods: RwLock::new(FxHashMap::default()),
            functions: RwLock::new(FxHashMap::default()),
            constructors: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register the public, static, value-returning functions of `library`
    /// that take at least one parameter, keyed by the type of that parameter.
    /// Returns how many were registered.
    pub fn register_implicit_methods(&self, library: &FunctionLibrary) -> usize {
        let mut methods = self.methods.write();
        let mut registered = 0;
        for def in &library.functions {
            let receiver = match def.receiver_type() {
                Some(receiver) if is_callable(def) => receiver,
                _ => {
                    tracing::debug!(
                        library = %library.name,
                        function = ?def,
                        "skipped implicit method candidate"
                    );
                    continue;
                }
            };
            let key = method_key(receiver, &def.name);
            methods.insert(key, Arc::new(RegisteredFunction::new(&library.name, def.clone())));
            registered += 1;
        }
        tracing::debug!(library = %library.name, registered, "registered implicit methods");
        registered
    }

    /// Register the public, static, value-returning functions of `library`
    /// under their simple names. Returns how many were registered.
    pub fn register_functions(&self, library: &FunctionLibrary) -> usize {
        let mut functions = self.functions.write();
        let mut registered = 0;
        for def in &library.functions {
            if !is_callable(def) {
                tracing::debug!(
                    library = %library.name,
                    function = ?def,
                    "skipped extension function candidate"
                );
                continue;
            }
            functions.insert(
                def.name.clone(),
                Arc::new(RegisteredFunction::new(&library.name, def.clone())),
            );
            registered += 1;
        }
        tracing::debug!(library = %library.name, registered, "registered extension functions");
        registered
    }

    /// Register every public constructor of `descriptor` under its simple
    /// name plus parameter signature. Returns how many were registered.
    pub fn register_constructors(&self, descriptor: &TypeDescriptor) -> usize {
        let mut constructors = self.constructors.write();
        let mut registered = 0;
        for ctor in descriptor.constructors() {
            if ctor.visibility != Visibility::Public {
                continue;
            }
            let entry = RegisteredConstructor {
                declaring_type: descriptor.type_ref().clone(),
                alias: descriptor.simple_name(),
                params: ctor.params.clone(),
            };
            constructors.insert(entry.key(), Arc::new(entry));
            registered += 1;
        }
        tracing::debug!(type_name = %descriptor.name(), registered, "registered constructors");
        registered
    }

    /// Look up an implicit method by its `receiverType.name` key.
    pub fn lookup_method(&self, key: &str) -> Option<Arc<RegisteredFunction>> {
        self.methods.read().get(key).cloned()
    }

    pub fn lookup_method_for(&self, receiver: &TypeRef, name: &str) -> Option<Arc<RegisteredFunction>> {
        self.lookup_method(&method_key(receiver, name))
    }

    pub fn lookup_function(&self, name: &str) -> Option<Arc<RegisteredFunction>> {
        self.functions.read().get(name).cloned()
    }

    /// Look up a constructor by its `Alias[param, ...]` key.
    pub fn lookup_constructor(&self, key: &str) -> Option<Arc<RegisteredConstructor>> {
        self.constructors.read().get(key).cloned()
    }

    pub fn lookup_constructor_for(
        &self,
        type_name: &str,
        params: &[TypeRef],
    ) -> Option<Arc<RegisteredConstructor>> {
        self.lookup_constructor(&constructor_key(type_name, params))
    }

    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn method_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.methods.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for ImplicitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_callable(def: &super::types::FunctionDef) -> bool {
    def.is_visible() && def.is_static() && def.returns_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::error::EvalResult;
    use crate::runner::ds::value::Value;
    use crate::runner::eval::context::EvaluationContext;
    use crate::runner::plugin::types::FunctionDef;

    fn echo(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
        Ok(args.into_iter().next().unwrap_or(Value::Null))
    }

    fn string() -> TypeRef {
        TypeRef::named("lang.String")
    }

    /// Mirrors a class holding public, private, instance, void and
    /// zero-argument functions.
    fn candidates() -> FunctionLibrary {
        FunctionLibrary::new("test.Functions")
            .add(FunctionDef::native("test", echo).param(string()).returns(string()))
            .add(FunctionDef::native("testNonPublic", echo).param(string()).returns(string()).private())
            .add(FunctionDef::native("testNonStatic", echo).param(string()).returns(string()).bound())
            .add(FunctionDef::native("testVoid", echo).param(string()))
            .add(FunctionDef::native("testNoArg", echo).returns(string()))
    }

    #[test]
    fn test_implicit_method_filtering() {
        let registry = ImplicitRegistry::new();
        assert_eq!(registry.register_implicit_methods(&candidates()), 1);
        assert_eq!(registry.method_keys(), vec!["lang.String.test"]);
        assert!(registry.lookup_method("lang.String.test").is_some());
        assert!(registry.lookup_method("lang.String.testNonPublic").is_none());
        assert!(registry.lookup_method("lang.String.testVoid").is_none());
    }

    #[test]
    fn test_function_filtering_keeps_zero_arg() {
        let registry = ImplicitRegistry::new();
        assert_eq!(registry.register_functions(&candidates()), 2);
        assert_eq!(registry.function_names(), vec!["test", "testNoArg"]);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = ImplicitRegistry::new();
        registry.register_functions(&candidates());
        let replacement = FunctionLibrary::new("other.Functions")
            .add(FunctionDef::native("test", echo).param(string()).returns(string()));
        registry.register_functions(&replacement);
        let function = registry.lookup_function("test").unwrap();
        assert_eq!(function.library, "other.Functions");
    }

    #[test]
    fn test_constructor_registration_skips_private() {
        use crate::runner::ds::types::NativeConstructor;

        fn build(_ctx: &EvaluationContext<'_>, _ty: &TypeRef, _args: Vec<Value>) -> EvalResult<Value> {
            Ok(Value::Null)
        }

        let descriptor = TypeDescriptor::class("org.example.Foo")
            .add_constructor(vec![string()], build)
            .add_constructor(vec![], build)
            .with_constructor(NativeConstructor::public(vec![TypeRef::named("lang.Integer")], build).private());
        let registry = ImplicitRegistry::new();
        assert_eq!(registry.register_constructors(&descriptor), 2);

        let ctor = registry.lookup_constructor_for("Foo", &[string()]).unwrap();
        assert_eq!(ctor.declaring_type, TypeRef::named("org.example.Foo"));
        assert!(registry.lookup_constructor("Foo[]").is_some());
        assert!(registry.lookup_constructor("Foo[lang.Integer]").is_none());
    }
}
