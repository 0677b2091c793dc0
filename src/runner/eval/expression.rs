//! Expression evaluation.
//!
//! A minimal expression tree standing in for an engine's parsed AST. It
//! covers only what exercises dispatch: literals, the root object,
//! variables, function calls, method calls, property reads and
//! construction. There is no text syntax.

use crate::runner::ds::error::EvalResult;
use crate::runner::ds::value::Value;
use crate::runner::eval::context::EvaluationContext;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// `#root`
    Root,
    /// `#name`
    Variable(String),
    /// `#name(args)`
    FunctionCall { name: String, args: Vec<Expr> },
    /// `target.name(args)`
    MethodCall {
        target: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    /// `target.name`
    Property { target: Box<Expr>, name: String },
    /// `new TypeName(args)`
    New { type_name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn new_object(type_name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::New {
            type_name: type_name.into(),
            args,
        }
    }

    pub fn method(self, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            target: Box::new(self),
            name: name.into(),
            args,
        }
    }

    pub fn property(self, name: impl Into<String>) -> Self {
        Expr::Property {
            target: Box::new(self),
            name: name.into(),
        }
    }
}

/// Evaluate an expression and return its value.
pub fn evaluate_expression(expr: &Expr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),

        Expr::Root => Ok(ctx.root().clone()),

        Expr::Variable(name) => Ok(ctx.lookup_variable(name).cloned().unwrap_or(Value::Null)),

        Expr::FunctionCall { name, args } => {
            let args = evaluate_arguments(args, ctx)?;
            ctx.call_function(name, args)
        }

        Expr::MethodCall { target, name, args } => {
            let target = evaluate_expression(target, ctx)?;
            let args = evaluate_arguments(args, ctx)?;
            ctx.invoke_method(&target, name, args)
        }

        Expr::Property { target, name } => {
            let target = evaluate_expression(target, ctx)?;
            ctx.read_property(&target, name)
        }

        Expr::New { type_name, args } => {
            let args = evaluate_arguments(args, ctx)?;
            ctx.construct(type_name, args)
        }
    }
}

fn evaluate_arguments(args: &[Expr], ctx: &EvaluationContext<'_>) -> EvalResult<Vec<Value>> {
    args.iter().map(|arg| evaluate_expression(arg, ctx)).collect()
}
