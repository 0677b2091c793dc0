//! Type references, type descriptors and the type system.
//!
//! Types are described explicitly instead of discovered by reflection. A
//! [`TypeDescriptor`] names a class, interface or primitive, its superclass,
//! its declared interfaces, and the native methods and constructors the
//! engine can call directly. The [`TypeSystem`] owns every descriptor and
//! answers closure and assignability queries.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::runner::ds::error::EvalResult;
use crate::runner::ds::hierarchy::{type_closure, TypeGraph};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;

/// Fully qualified name of the root class.
pub const OBJECT_TYPE_NAME: &str = "lang.Object";

/// Argument type of a null value.
pub const NULL_TYPE_NAME: &str = "null";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    Named(Arc<str>),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl AsRef<str>) -> Self {
        TypeRef::Named(Arc::from(name.as_ref()))
    }

    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    pub fn object() -> Self {
        TypeRef::named(OBJECT_TYPE_NAME)
    }

    pub fn null() -> Self {
        TypeRef::named(NULL_TYPE_NAME)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TypeRef::Named(name) if name.as_ref() == OBJECT_TYPE_NAME)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeRef::Named(name) if name.as_ref() == NULL_TYPE_NAME)
    }

    /// `lang.Object[]` exactly, one dimension.
    pub fn is_object_array(&self) -> bool {
        matches!(self, TypeRef::Array(component) if component.is_object())
    }

    pub fn component(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(component) => Some(component),
            TypeRef::Named(_) => None,
        }
    }

    /// Deepest non-array component; `self` for named types.
    pub fn innermost_component(&self) -> &TypeRef {
        let mut ty = self;
        while let TypeRef::Array(component) = ty {
            ty = component;
        }
        ty
    }

    /// The segment after the last `.`, keeping any array suffix.
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Named(name) => name.rsplit('.').next().unwrap_or(name.as_ref()).to_string(),
            TypeRef::Array(component) => format!("{}[]", component.simple_name()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::Array(component) => write!(f, "{}[]", component),
        }
    }
}

/// Render an ordered type list the way registry keys expect: `[a.A, b.B]`.
pub fn render_signature(types: &[TypeRef]) -> String {
    let parts: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Primitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Native instance method body: context, receiver, arguments.
pub type NativeMethodFn =
    fn(ctx: &EvaluationContext<'_>, this: &Value, args: Vec<Value>) -> EvalResult<Value>;

/// Native constructor body: context, the type being constructed, arguments.
pub type NativeConstructorFn =
    fn(ctx: &EvaluationContext<'_>, ty: &TypeRef, args: Vec<Value>) -> EvalResult<Value>;

pub struct NativeMethod {
    pub name: String,
    pub visibility: Visibility,
    pub params: Vec<TypeRef>,
    pub body: NativeMethodFn,
}

impl NativeMethod {
    pub fn public(name: impl Into<String>, params: Vec<TypeRef>, body: NativeMethodFn) -> Self {
        NativeMethod {
            name: name.into(),
            visibility: Visibility::Public,
            params,
            body,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, render_signature(&self.params))
    }
}

pub struct NativeConstructor {
    pub visibility: Visibility,
    pub params: Vec<TypeRef>,
    pub body: NativeConstructorFn,
}

impl NativeConstructor {
    pub fn public(params: Vec<TypeRef>, body: NativeConstructorFn) -> Self {
        NativeConstructor {
            visibility: Visibility::Public,
            params,
            body,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

impl fmt::Debug for NativeConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new{}", render_signature(&self.params))
    }
}

/// Definition of a named type.
#[derive(Debug)]
pub struct TypeDescriptor {
    ty: TypeRef,
    kind: TypeKind,
    superclass: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    methods: Vec<Arc<NativeMethod>>,
    constructors: Vec<Arc<NativeConstructor>>,
}

impl TypeDescriptor {
    /// A class extending the root class unless it is the root itself.
    pub fn class(name: impl AsRef<str>) -> Self {
        let ty = TypeRef::named(name);
        let superclass = if ty.is_object() { None } else { Some(TypeRef::object()) };
        Self::with_kind(ty, TypeKind::Class, superclass)
    }

    pub fn interface(name: impl AsRef<str>) -> Self {
        Self::with_kind(TypeRef::named(name), TypeKind::Interface, None)
    }

    pub fn primitive(name: impl AsRef<str>) -> Self {
        Self::with_kind(TypeRef::named(name), TypeKind::Primitive, None)
    }

    fn with_kind(ty: TypeRef, kind: TypeKind, superclass: Option<TypeRef>) -> Self {
        TypeDescriptor {
            ty,
            kind,
            superclass,
            interfaces: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Set the superclass. Ignored for interfaces and primitives.
    pub fn extends(mut self, superclass: TypeRef) -> Self {
        if self.kind == TypeKind::Class {
            self.superclass = Some(superclass);
        }
        self
    }

    /// Append a directly declared interface (for an interface: a super-interface).
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_method(mut self, method: NativeMethod) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    /// Add a public native method.
    pub fn add_method(self, name: &str, params: Vec<TypeRef>, body: NativeMethodFn) -> Self {
        self.with_method(NativeMethod::public(name, params, body))
    }

    pub fn with_constructor(mut self, constructor: NativeConstructor) -> Self {
        self.constructors.push(Arc::new(constructor));
        self
    }

    /// Add a public native constructor.
    pub fn add_constructor(self, params: Vec<TypeRef>, body: NativeConstructorFn) -> Self {
        self.with_constructor(NativeConstructor::public(params, body))
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> String {
        self.ty.to_string()
    }

    pub fn simple_name(&self) -> String {
        self.ty.simple_name()
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn superclass(&self) -> Option<&TypeRef> {
        self.superclass.as_ref()
    }

    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    pub fn methods(&self) -> &[Arc<NativeMethod>] {
        &self.methods
    }

    pub fn constructors(&self) -> &[Arc<NativeConstructor>] {
        &self.constructors
    }
}

/// Every type the engine knows about.
///
/// Mutation requires `&mut self`; queries take `&self` and may run on many
/// threads. Closures are memoized per type and dropped whenever a
/// descriptor is (re)defined.
pub struct TypeSystem {
    descriptors: FxHashMap<Arc<str>, Arc<TypeDescriptor>>,
    closures: DashMap<TypeRef, Arc<[TypeRef]>, FxBuildHasher>,
}

impl TypeSystem {
    pub fn new() -> Self {
        TypeSystem {
            descriptors: FxHashMap::default(),
            closures: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Define a type, replacing any previous definition of the same name.
    pub fn define(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let name: Arc<str> = Arc::from(descriptor.name().as_str());
        let descriptor = Arc::new(descriptor);
        if self
            .descriptors
            .insert(name.clone(), descriptor.clone())
            .is_some()
        {
            tracing::debug!(type_name = %name, "redefined type");
        }
        self.closures.clear();
        descriptor
    }

    pub fn descriptor(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.descriptors.get(name)
    }

    pub fn descriptor_of(&self, ty: &TypeRef) -> Option<&Arc<TypeDescriptor>> {
        match ty {
            TypeRef::Named(name) => self.descriptors.get(name.as_ref()),
            TypeRef::Array(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Memoized [`type_closure`] of `ty`.
    pub fn closure(&self, ty: &TypeRef) -> Arc<[TypeRef]> {
        if let Some(closure) = self.closures.get(ty) {
            return closure.clone();
        }
        let computed: Arc<[TypeRef]> = type_closure(self, ty).into();
        self.closures
            .entry(ty.clone())
            .or_insert(computed)
            .value()
            .clone()
    }

    /// Can a value of type `source` be passed where `target` is declared?
    pub fn is_assignable(&self, target: &TypeRef, source: &TypeRef) -> bool {
        if target.is_object() || target == source {
            return true;
        }
        if source.is_null() {
            return !self.is_primitive(target);
        }
        match (target, source) {
            (TypeRef::Array(target), TypeRef::Array(source)) => {
                self.is_assignable(target, source)
            }
            (TypeRef::Array(_), _) | (_, TypeRef::Array(_)) => false,
            _ => self.closure(source).contains(target),
        }
    }

    /// Do `args` satisfy a parameter list? A variadic list takes any number
    /// of trailing arguments assignable to its last parameter type.
    pub fn accepts_arguments(&self, params: &[TypeRef], variadic: bool, args: &[TypeRef]) -> bool {
        match params.split_last() {
            Some((last, rest)) if variadic => {
                args.len() >= rest.len()
                    && rest
                        .iter()
                        .zip(args)
                        .all(|(param, arg)| self.is_assignable(param, arg))
                    && args[rest.len()..]
                        .iter()
                        .all(|arg| self.is_assignable(last, arg))
            }
            _ => {
                params.len() == args.len()
                    && params
                        .iter()
                        .zip(args)
                        .all(|(param, arg)| self.is_assignable(param, arg))
            }
        }
    }

    fn is_primitive(&self, ty: &TypeRef) -> bool {
        self.descriptor_of(ty)
            .map(|d| d.kind() == TypeKind::Primitive)
            .unwrap_or(false)
    }
}

impl TypeGraph for TypeSystem {
    fn superclass(&self, ty: &TypeRef) -> Option<TypeRef> {
        match ty {
            TypeRef::Array(_) => Some(TypeRef::object()),
            TypeRef::Named(_) => self.descriptor_of(ty).and_then(|d| d.superclass().cloned()),
        }
    }

    fn interfaces(&self, ty: &TypeRef) -> Vec<TypeRef> {
        self.descriptor_of(ty)
            .map(|d| d.interfaces().to_vec())
            .unwrap_or_default()
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}
