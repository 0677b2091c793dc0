//! Default implicit methods on lists.
//!
//! Each function takes the list as its first parameter and is reachable as
//! `list.name(...)`, or as a property when it takes nothing else.

use crate::runner::ds::error::{EvalError, EvalResult};
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;
use crate::runner::plugin::types::{FunctionDef, FunctionLibrary};

use super::lang;

pub const LIBRARY_NAME: &str = "std.ImplicitMethods";

pub fn library() -> FunctionLibrary {
    FunctionLibrary::new(LIBRARY_NAME)
        .add(
            FunctionDef::native("distinct", distinct)
                .param(lang::LIST.clone())
                .returns(lang::SET.clone()),
        )
        .add(
            FunctionDef::native("sorted", sorted)
                .param(lang::LIST.clone())
                .returns(lang::LIST.clone()),
        )
        .add(
            FunctionDef::native("reversed", reversed)
                .param(lang::LIST.clone())
                .returns(lang::LIST.clone()),
        )
        .add(
            FunctionDef::native("take", take)
                .param(lang::LIST.clone())
                .param(lang::INTEGER.clone())
                .returns(lang::LIST.clone()),
        )
        .add(
            FunctionDef::native("drop", drop)
                .param(lang::LIST.clone())
                .param(lang::INTEGER.clone())
                .returns(lang::LIST.clone()),
        )
}

fn receiver(args: &[Value]) -> EvalResult<&[Value]> {
    let list = args
        .first()
        .ok_or_else(|| EvalError::InvalidArgument("missing receiver".to_string()))?;
    list.as_list()
        .ok_or_else(|| EvalError::type_mismatch(&*lang::LIST, list.type_name()))
}

/// Validated count argument: `0 <= n <= len`.
fn count(args: &[Value], len: usize) -> EvalResult<usize> {
    let n = args
        .get(1)
        .and_then(Value::as_integer)
        .ok_or_else(|| EvalError::InvalidArgument("count must be an integer".to_string()))?;
    match usize::try_from(n) {
        Ok(k) if k <= len => Ok(k),
        _ => Err(EvalError::IndexOutOfBounds { index: n, len }),
    }
}

fn distinct(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::set(receiver(&args)?.iter().cloned()))
}

/// Stable sort by natural order. With two or more items, every item must be
/// comparable with the first.
fn sorted(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    let items = receiver(&args)?;
    if let Some((first, rest)) = items.split_first() {
        if let Some(item) = rest.iter().find(|item| first.compare(item).is_none()) {
            return Err(EvalError::NotComparable(format!(
                "{} and {}",
                first.type_name(),
                item.type_name()
            )));
        }
    }
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| a.compare(b).unwrap_or_else(|| a.cmp(b)));
    Ok(Value::list(sorted))
}

fn reversed(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::list(receiver(&args)?.iter().rev().cloned().collect()))
}

fn take(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    let items = receiver(&args)?;
    let n = count(&args, items.len())?;
    Ok(Value::list(items[..n].to_vec()))
}

fn drop(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
    let items = receiver(&args)?;
    let n = count(&args, items.len())?;
    Ok(Value::list(items[n..].to_vec()))
}
