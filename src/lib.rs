//! # implicit-dispatch - Extension dispatch for an expression engine
//!
//! A user-extensible dispatch layer for dynamic expression evaluation:
//! - Implicit methods: register a function and call it as a method on its
//!   first parameter's type
//! - Implicit properties: zero-argument implicit (or native) methods read
//!   as fields
//! - Implicit constructors: construct registered types by simple name
//! - Extension functions: free functions callable by name
//! - Concurrent, negative-caching resolution keyed by runtime type
//!
//! ## Quick Start
//!
//! ### Calling the Default Library
//!
//! ```
//! use implicit_dispatch::runner::api::ExprHelper;
//! use implicit_dispatch::runner::ds::value::Value;
//! use implicit_dispatch::runner::eval::expression::Expr;
//!
//! let helper = ExprHelper::new();
//!
//! // #list(3, 1, 2).sorted()
//! let expr = Expr::call("list", vec![Expr::lit(3), Expr::lit(1), Expr::lit(2)])
//!     .method("sorted", vec![]);
//! let sorted: Vec<Value> = helper.evaluate_as(&expr, Value::Null).unwrap();
//! assert_eq!(sorted, vec![Value::from(1), Value::from(2), Value::from(3)]);
//!
//! // #list(1, 2, 3).reversed (a property read)
//! let expr = Expr::call("list", vec![Expr::lit(1), Expr::lit(2), Expr::lit(3)])
//!     .property("reversed");
//! assert_eq!(helper.evaluate(&expr, Value::Null).unwrap().to_string(), "[3, 2, 1]");
//! ```
//!
//! ### Registering Constructors
//!
//! ```
//! use implicit_dispatch::runner::api::ExprHelper;
//! use implicit_dispatch::runner::ds::error::EvalResult;
//! use implicit_dispatch::runner::ds::types::{TypeDescriptor, TypeRef};
//! use implicit_dispatch::runner::ds::value::{HostObject, Value};
//! use implicit_dispatch::runner::eval::context::EvaluationContext;
//! use implicit_dispatch::runner::eval::expression::Expr;
//!
//! fn new_point(_ctx: &EvaluationContext<'_>, ty: &TypeRef, args: Vec<Value>) -> EvalResult<Value> {
//!     let mut point = HostObject::new(ty.clone());
//!     for (name, value) in ["x", "y"].iter().zip(args) {
//!         point = point.with_field(*name, value);
//!     }
//!     Ok(Value::object(point))
//! }
//!
//! let integer = TypeRef::named("lang.Integer");
//! let mut helper = ExprHelper::new();
//! helper.register_constructors(
//!     TypeDescriptor::class("geo.Point").add_constructor(vec![integer.clone(), integer], new_point),
//! );
//!
//! // new Point(1, 2)
//! let expr = Expr::new_object("Point", vec![Expr::lit(1), Expr::lit(2)]);
//! let point = helper.evaluate(&expr, Value::Null).unwrap();
//! assert_eq!(point.type_name(), "geo.Point");
//! ```
//!
//! ## Resolution Architecture
//!
//! Every member access goes through an ordered resolver chain. The native
//! resolver runs first, so a method the type declares itself always wins
//! over an implicit one of the same name.
//!
//! ### How It Works
//!
//! 1. **Type closure**: the runtime type, its superclass chain, then its
//!    interfaces. This is the search order for implicit methods, so the
//!    nearest registration wins.
//!
//! 2. **Rewriting**: a resolved implicit method is run with the receiver
//!    prepended to the arguments.
//!
//! 3. **Caching**: each `(runtime type, member)` verdict is stored once,
//!    including "nothing found". Caches are shared across threads and
//!    cleared on every registration.
//!
//! 4. **Sealing**: registration takes `&mut ExprHelper`, evaluation takes
//!    `&ExprHelper`, so the registry never changes under a running
//!    evaluation.
//!
//! ## Architecture
//!
//! - **[`runner`]** - Dispatch runtime
//!   - **[`runner::api`]** - The `ExprHelper` coordinator
//!   - **[`runner::plugin`]** - Registry, resolvers, caches and chains
//!   - **[`runner::ds`]** - Data structures (values, types, errors)
//!   - **[`runner::eval`]** - Evaluation context and expression tree
//!   - **[`runner::std_lib`]** - Built-in types and default libraries

#[macro_use]
extern crate lazy_static;

pub mod runner;

pub use runner::api::ExprHelper;
pub use runner::ds::error::{EvalError, EvalResult};
pub use runner::ds::value::Value;
pub use runner::eval::expression::Expr;
