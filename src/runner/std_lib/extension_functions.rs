//! Default extension functions.
//!
//! Collection literals callable as `#list(...)`, `#set(...)` and
//! `#map(keys, values)`.

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::types::{FunctionDef, FunctionLibrary};

use super::lang;

pub const LIBRARY_NAME: &str = "std.ExtensionFunctions";

pub fn library() -> FunctionLibrary {
    FunctionLibrary::new(LIBRARY_NAME)
        .add(
            FunctionDef::native("list", list)
                .rest(lang::OBJECT.clone())
                .returns(lang::LIST.clone()),
        )
        .add(
            FunctionDef::native("set", set)
                .rest(lang::OBJECT.clone())
                .returns(lang::SET.clone()),
        )
        .add(
            FunctionDef::native("map", map)
                .param(lang::LIST.clone())
                .param(lang::LIST.clone())
                .returns(lang::MAP.clone()),
        )
}

/// Immutable list of the arguments, in order.
fn list(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::list(args))
}

/// Immutable set of the arguments.
fn set(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::set(args))
}

/// Zip two lists into an immutable map. Later duplicate keys win.
fn map(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    let (keys, values) = match args.as_slice() {
        [keys, values] => (list_items(keys)?, list_items(values)?),
        _ => return Err(EvalError::arity("map", 2, args.len())),
    };
    if keys.len() != values.len() {
        return Err(EvalError::arity("map: values", keys.len(), values.len()));
    }
    Ok(Value::map(
        keys.iter().cloned().zip(values.iter().cloned()),
    ))
}

fn list_items(value: &Value) -> EvalResult<&[Value]> {
    value
        .as_list()
        .ok_or_else(|| EvalError::type_mismatch(&*lang::LIST, value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_shape() {
        let library = library();
        let names: Vec<&str> = library.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["list", "set", "map"]);
        assert!(library.functions[0].variadic);
        assert_eq!(library.functions[2].signature(), "[util.List, util.List]");
    }
}
