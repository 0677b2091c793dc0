//! Built-in type universe.
//!
//! Defines the well-known classes and interfaces every helper starts with,
//! along with their native methods and constructors. Native methods found
//! here take precedence over implicit methods of the same name.

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::types::{TypeDescriptor, TypeRef, TypeSystem};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;

lazy_static! {
    pub static ref OBJECT: TypeRef = TypeRef::object();
    pub static ref COMPARABLE: TypeRef = TypeRef::named("lang.Comparable");
    pub static ref CHAR_SEQUENCE: TypeRef = TypeRef::named("lang.CharSequence");
    pub static ref ITERABLE: TypeRef = TypeRef::named("lang.Iterable");
    pub static ref NUMBER: TypeRef = TypeRef::named("lang.Number");
    pub static ref INTEGER: TypeRef = TypeRef::named("lang.Integer");
    pub static ref DOUBLE: TypeRef = TypeRef::named("lang.Double");
    pub static ref BOOLEAN: TypeRef = TypeRef::named("lang.Boolean");
    pub static ref STRING: TypeRef = TypeRef::named("lang.String");
    pub static ref COLLECTION: TypeRef = TypeRef::named("util.Collection");
    pub static ref LIST: TypeRef = TypeRef::named("util.List");
    pub static ref SET: TypeRef = TypeRef::named("util.Set");
    pub static ref MAP: TypeRef = TypeRef::named("util.Map");
    pub static ref RANDOM_ACCESS: TypeRef = TypeRef::named("util.RandomAccess");
    pub static ref ABSTRACT_COLLECTION: TypeRef = TypeRef::named("util.AbstractCollection");
    pub static ref ABSTRACT_LIST: TypeRef = TypeRef::named("util.AbstractList");
    pub static ref IMMUTABLE_LIST: TypeRef = TypeRef::named("util.ImmutableList");
    pub static ref IMMUTABLE_SET: TypeRef = TypeRef::named("util.ImmutableSet");
    pub static ref IMMUTABLE_MAP: TypeRef = TypeRef::named("util.ImmutableMap");
}

/// Define the built-in types in `types`.
pub fn register(types: &mut TypeSystem) {
    types.define(
        TypeDescriptor::class(OBJECT.to_string()).add_method("toString", vec![], object_to_string),
    );

    types.define(TypeDescriptor::interface(COMPARABLE.to_string()));
    types.define(TypeDescriptor::interface(CHAR_SEQUENCE.to_string()));
    types.define(TypeDescriptor::interface(ITERABLE.to_string()));
    types.define(TypeDescriptor::interface(RANDOM_ACCESS.to_string()));

    types.define(
        TypeDescriptor::interface(COLLECTION.to_string())
            .implements(ITERABLE.clone())
            .add_method("size", vec![], collection_size)
            .add_method("isEmpty", vec![], collection_is_empty)
            .add_method("contains", vec![OBJECT.clone()], collection_contains),
    );
    types.define(
        TypeDescriptor::interface(LIST.to_string())
            .implements(COLLECTION.clone())
            .add_method("get", vec![INTEGER.clone()], list_get),
    );
    types.define(TypeDescriptor::interface(SET.to_string()).implements(COLLECTION.clone()));
    types.define(
        TypeDescriptor::interface(MAP.to_string())
            .add_method("size", vec![], collection_size)
            .add_method("isEmpty", vec![], collection_is_empty)
            .add_method("get", vec![OBJECT.clone()], map_get)
            .add_method("containsKey", vec![OBJECT.clone()], map_contains_key),
    );

    types.define(TypeDescriptor::class(NUMBER.to_string()));
    types.define(
        TypeDescriptor::class(INTEGER.to_string())
            .extends(NUMBER.clone())
            .implements(COMPARABLE.clone()),
    );
    types.define(
        TypeDescriptor::class(DOUBLE.to_string())
            .extends(NUMBER.clone())
            .implements(COMPARABLE.clone()),
    );
    types.define(TypeDescriptor::class(BOOLEAN.to_string()).implements(COMPARABLE.clone()));
    types.define(
        TypeDescriptor::class(STRING.to_string())
            .implements(CHAR_SEQUENCE.clone())
            .implements(COMPARABLE.clone())
            .add_method("length", vec![], string_length)
            .add_method("isEmpty", vec![], string_is_empty)
            .add_method("toUpperCase", vec![], string_to_upper_case)
            .add_method("toLowerCase", vec![], string_to_lower_case)
            .add_constructor(vec![STRING.clone()], string_copy_constructor)
            .add_constructor(vec![], string_empty_constructor),
    );

    types.define(
        TypeDescriptor::class(ABSTRACT_COLLECTION.to_string()).implements(COLLECTION.clone()),
    );
    types.define(
        TypeDescriptor::class(ABSTRACT_LIST.to_string())
            .extends(ABSTRACT_COLLECTION.clone())
            .implements(LIST.clone()),
    );
    types.define(
        TypeDescriptor::class(IMMUTABLE_LIST.to_string())
            .extends(ABSTRACT_LIST.clone())
            .implements(RANDOM_ACCESS.clone()),
    );
    types.define(
        TypeDescriptor::class(IMMUTABLE_SET.to_string())
            .extends(ABSTRACT_COLLECTION.clone())
            .implements(SET.clone()),
    );
    types.define(TypeDescriptor::class(IMMUTABLE_MAP.to_string()).implements(MAP.clone()));
}

fn expect_str<'v>(this: &'v Value) -> EvalResult<&'v str> {
    this.as_str()
        .ok_or_else(|| EvalError::type_mismatch(&*STRING, this.type_name()))
}

fn object_to_string(_ctx: &EvaluationContext<'_>, this: &Value, _args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::string(this.to_string()))
}

fn string_length(_ctx: &EvaluationContext<'_>, this: &Value, _args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::Integer(expect_str(this)?.chars().count() as i64))
}

fn string_is_empty(_ctx: &EvaluationContext<'_>, this: &Value, _args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::Boolean(expect_str(this)?.is_empty()))
}

fn string_to_upper_case(
    _ctx: &EvaluationContext<'_>,
    this: &Value,
    _args: Vec<Value>,
) -> EvalResult<Value> {
    Ok(Value::string(expect_str(this)?.to_uppercase()))
}

fn string_to_lower_case(
    _ctx: &EvaluationContext<'_>,
    this: &Value,
    _args: Vec<Value>,
) -> EvalResult<Value> {
    Ok(Value::string(expect_str(this)?.to_lowercase()))
}

fn string_copy_constructor(
    _ctx: &EvaluationContext<'_>,
    _ty: &TypeRef,
    args: Vec<Value>,
) -> EvalResult<Value> {
    match args.into_iter().next() {
        Some(Value::Str(s)) => Ok(Value::Str(s)),
        Some(other) => Err(EvalError::type_mismatch(&*STRING, other.type_name())),
        None => Err(EvalError::arity("lang.String", 1, 0)),
    }
}

fn string_empty_constructor(
    _ctx: &EvaluationContext<'_>,
    _ty: &TypeRef,
    _args: Vec<Value>,
) -> EvalResult<Value> {
    Ok(Value::string(""))
}

fn collection_size(_ctx: &EvaluationContext<'_>, this: &Value, _args: Vec<Value>) -> EvalResult<Value> {
    let len = match this {
        Value::List(items) => items.len(),
        Value::Set(items) => items.len(),
        Value::Map(entries) => entries.len(),
        Value::Array(array) => array.items.len(),
        other => return Err(EvalError::type_mismatch(&*COLLECTION, other.type_name())),
    };
    Ok(Value::Integer(len as i64))
}

fn collection_is_empty(ctx: &EvaluationContext<'_>, this: &Value, args: Vec<Value>) -> EvalResult<Value> {
    let size = collection_size(ctx, this, args)?;
    Ok(Value::Boolean(size == Value::Integer(0)))
}

fn collection_contains(
    _ctx: &EvaluationContext<'_>,
    this: &Value,
    args: Vec<Value>,
) -> EvalResult<Value> {
    let needle = args.into_iter().next().unwrap_or(Value::Null);
    let found = match this {
        Value::List(items) => items.contains(&needle),
        Value::Set(items) => items.contains(&needle),
        other => return Err(EvalError::type_mismatch(&*COLLECTION, other.type_name())),
    };
    Ok(Value::Boolean(found))
}

fn list_get(_ctx: &EvaluationContext<'_>, this: &Value, args: Vec<Value>) -> EvalResult<Value> {
    let items = this
        .as_list()
        .ok_or_else(|| EvalError::type_mismatch(&*LIST, this.type_name()))?;
    let index = args
        .first()
        .and_then(Value::as_integer)
        .ok_or_else(|| EvalError::InvalidArgument("list index must be an integer".to_string()))?;
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or(EvalError::IndexOutOfBounds {
            index,
            len: items.len(),
        })
}

fn map_get(_ctx: &EvaluationContext<'_>, this: &Value, args: Vec<Value>) -> EvalResult<Value> {
    match (this, args.first()) {
        (Value::Map(entries), Some(key)) => Ok(entries.get(key).cloned().unwrap_or(Value::Null)),
        (Value::Map(_), None) => Err(EvalError::arity("util.Map.get", 1, 0)),
        (other, _) => Err(EvalError::type_mismatch(&*MAP, other.type_name())),
    }
}

fn map_contains_key(
    _ctx: &EvaluationContext<'_>,
    this: &Value,
    args: Vec<Value>,
) -> EvalResult<Value> {
    match (this, args.first()) {
        (Value::Map(entries), Some(key)) => Ok(Value::Boolean(entries.contains_key(key))),
        (Value::Map(_), None) => Err(EvalError::arity("util.Map.containsKey", 1, 0)),
        (other, _) => Err(EvalError::type_mismatch(&*MAP, other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> TypeSystem {
        let mut types = TypeSystem::new();
        register(&mut types);
        types
    }

    #[test]
    fn test_immutable_list_closure() {
        let types = universe();
        let names: Vec<String> = types
            .closure(&IMMUTABLE_LIST)
            .iter()
            .map(TypeRef::to_string)
            .collect();
        assert_eq!(
            names,
            vec![
                "util.ImmutableList",
                "util.AbstractList",
                "util.AbstractCollection",
                "lang.Object",
                "util.Collection",
                "lang.Iterable",
                "util.List",
                "util.RandomAccess",
            ]
        );
    }

    #[test]
    fn test_string_closure() {
        let types = universe();
        let names: Vec<String> = types.closure(&STRING).iter().map(TypeRef::to_string).collect();
        assert_eq!(
            names,
            vec!["lang.String", "lang.Object", "lang.CharSequence", "lang.Comparable"]
        );
    }

    #[test]
    fn test_builtin_assignability() {
        let types = universe();
        assert!(types.is_assignable(&LIST, &IMMUTABLE_LIST));
        assert!(types.is_assignable(&COLLECTION, &IMMUTABLE_SET));
        assert!(types.is_assignable(&NUMBER, &INTEGER));
        assert!(!types.is_assignable(&LIST, &IMMUTABLE_SET));
        assert!(!types.is_assignable(&STRING, &INTEGER));
    }
}
