//! Core types for registered extensions.

use std::fmt;
use std::sync::Arc;

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::{render_signature, TypeRef, TypeSystem, Visibility};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;

/// Function signature for compiled-in extension functions.
/// Receives the evaluation context and the full argument list.
pub type NativeFn = fn(ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value>;

/// Closure-backed extension function.
pub type PluginFn = dyn Fn(&EvaluationContext<'_>, Vec<Value>) -> EvalResult<Value> + Send + Sync;

/// Body of an extension function - either compiled-in or plugin-provided.
#[derive(Clone)]
pub enum FunctionBody {
    /// Direct function pointer - zero overhead for compiled-in functions.
    Native(NativeFn),

    /// Plugin-provided closure - small vtable indirection cost.
    Plugin(Arc<PluginFn>),
}

impl FunctionBody {
    pub fn plugin<F>(f: F) -> Self
    where
        F: Fn(&EvaluationContext<'_>, Vec<Value>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        FunctionBody::Plugin(Arc::new(f))
    }

    pub fn call(&self, ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
        match self {
            FunctionBody::Native(f) => f(ctx, args),
            FunctionBody::Plugin(f) => f(ctx, args),
        }
    }
}

/// Whether a function needs an instance to be called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Free function, callable without a receiver.
    Static,
    /// Bound to an instance; never registered.
    Instance,
}

/// A candidate function, before registration filters it.
#[derive(Clone)]
pub struct FunctionDef {
    pub name: String,
    pub visibility: Visibility,
    pub binding: Binding,
    pub params: Vec<TypeRef>,
    /// The last parameter is the element type of any trailing arguments.
    pub variadic: bool,
    /// `None` means the function returns nothing.
    pub return_type: Option<TypeRef>,
    pub body: FunctionBody,
}

impl FunctionDef {
    /// A public, static, non-returning function with no parameters.
    /// Use the builder methods to fill in the rest.
    pub fn new(name: impl Into<String>, body: FunctionBody) -> Self {
        FunctionDef {
            name: name.into(),
            visibility: Visibility::Public,
            binding: Binding::Static,
            params: Vec::new(),
            variadic: false,
            return_type: None,
            body,
        }
    }

    pub fn native(name: impl Into<String>, body: NativeFn) -> Self {
        Self::new(name, FunctionBody::Native(body))
    }

    pub fn param(mut self, ty: TypeRef) -> Self {
        self.params.push(ty);
        self
    }

    /// Trailing arguments of type `ty`, any number of them.
    pub fn rest(mut self, ty: TypeRef) -> Self {
        self.params.push(ty);
        self.variadic = true;
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn bound(mut self) -> Self {
        self.binding = Binding::Instance;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_static(&self) -> bool {
        self.binding == Binding::Static
    }

    pub fn returns_value(&self) -> bool {
        self.return_type.is_some()
    }

    /// The dispatch type for implicit-method purposes.
    pub fn receiver_type(&self) -> Option<&TypeRef> {
        self.params.first()
    }

    pub fn signature(&self) -> String {
        let mut sig = render_signature(&self.params);
        if self.variadic {
            sig.insert_str(sig.len() - 1, "...");
        }
        sig
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature())
    }
}

/// A named batch of candidate functions - the unit functions are declared in.
#[derive(Debug, Clone)]
pub struct FunctionLibrary {
    pub name: String,
    pub functions: Vec<FunctionDef>,
}

impl FunctionLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionLibrary {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn add(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }
}

/// A function that passed registration. Immutable once registered.
#[derive(Debug)]
pub struct RegisteredFunction {
    pub library: String,
    pub def: FunctionDef,
}

impl RegisteredFunction {
    pub fn new(library: impl Into<String>, def: FunctionDef) -> Self {
        RegisteredFunction {
            library: library.into(),
            def,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.library, self.def.name)
    }

    /// Check the arguments against the declared parameters, then run the body.
    pub fn invoke(&self, ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
        check_arguments(
            ctx.types(),
            &self.qualified_name(),
            &self.def.params,
            self.def.variadic,
            &args,
        )?;
        self.def.body.call(ctx, args)
    }
}

/// A constructor reachable under a short alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredConstructor {
    /// Fully qualified type the constructor belongs to.
    pub declaring_type: TypeRef,
    /// Simple name of the declaring type.
    pub alias: String,
    pub params: Vec<TypeRef>,
}

impl RegisteredConstructor {
    /// Registry key: `alias + [param, ...]`.
    pub fn key(&self) -> String {
        constructor_key(&self.alias, &self.params)
    }
}

pub fn constructor_key(type_name: &str, params: &[TypeRef]) -> String {
    format!("{}{}", type_name, render_signature(params))
}

/// Registry key of an implicit method: `receiverType.name`.
pub fn method_key(receiver: &TypeRef, name: &str) -> String {
    format!("{}.{}", receiver, name)
}

/// Arity first, then assignability, so a short call reports the count.
pub fn check_arguments(
    types: &TypeSystem,
    what: &str,
    params: &[TypeRef],
    variadic: bool,
    args: &[Value],
) -> EvalResult<()> {
    let fixed = if variadic { params.len().saturating_sub(1) } else { params.len() };
    if (variadic && args.len() < fixed) || (!variadic && args.len() != fixed) {
        return Err(EvalError::arity(what, fixed, args.len()));
    }
    for (i, arg) in args.iter().enumerate() {
        let param = match params.get(i.min(params.len().saturating_sub(1))) {
            Some(param) => param,
            None => break,
        };
        let actual = arg.arg_type();
        if !types.is_assignable(param, &actual) {
            return Err(EvalError::type_mismatch(param, actual));
        }
    }
    Ok(())
}
