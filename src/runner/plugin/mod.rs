//! Implicit dispatch - registered functions reachable as methods,
//! properties and constructors.
//!
//! This module is the resolution subsystem. It lets callers register plain
//! functions and have expressions reach them as if they were members of the
//! types they operate on.
//!
//! ## Resolver Chains
//!
//! Every member access is answered by an ordered chain of resolvers. Each
//! one accepts, declines, or fails:
//!
//! ```text
//! Method:       native-method → implicit-method
//! Property:     implicit-property
//! Constructor:  native-constructor → implicit-constructor
//! ```
//!
//! ### Key Components
//!
//! - **[`ImplicitRegistry`]**: implicit methods, extension functions and
//!   constructor aliases, keyed by normalized strings
//! - **[`ImplicitMethodResolver`]**: `receiver.name(args)` becomes
//!   `name(receiver, args)` for the nearest registration along the
//!   receiver's type closure
//! - **[`ImplicitPropertyAccessor`]**: `receiver.name` becomes a
//!   zero-argument method call; writes are rejected
//! - **[`ImplicitConstructorResolver`]**: `new Alias(args)` for registered
//!   types, by simple name
//! - **[`ResolutionCache`]**: per `(runtime type, member)` verdicts,
//!   positive and negative, shared by every evaluation
//!
//! ### Resolution Flow
//!
//! When an expression calls `list.sorted()`:
//!
//! 1. **Native lookup**: `util.ImmutableList` and its ancestors declare no
//!    `sorted`, so the native resolver declines
//! 2. **Check cache**: has `(util.ImmutableList, sorted)` been resolved?
//! 3. **Walk the closure**: `util.ImmutableList`, `util.AbstractList`, ...
//!    until `util.List.sorted` is found in the registry
//! 4. **Cache result**: store the executor (or its absence)
//! 5. **Execute**: call `sorted(list)`
//!
//! ## Example: Custom Implicit Method
//!
//! ```
//! use implicit_dispatch::runner::api::ExprHelper;
//! use implicit_dispatch::runner::ds::error::EvalResult;
//! use implicit_dispatch::runner::ds::types::TypeRef;
//! use implicit_dispatch::runner::ds::value::Value;
//! use implicit_dispatch::runner::eval::context::EvaluationContext;
//! use implicit_dispatch::runner::eval::expression::Expr;
//! use implicit_dispatch::runner::plugin::types::{FunctionDef, FunctionLibrary};
//!
//! fn shout(_ctx: &EvaluationContext<'_>, args: Vec<Value>) -> EvalResult<Value> {
//!     let s = args[0].as_str().unwrap_or_default();
//!     Ok(Value::string(format!("{}!", s.to_uppercase())))
//! }
//!
//! let mut helper = ExprHelper::new();
//! helper.register_implicit_methods(
//!     &FunctionLibrary::new("demo.Strings").add(
//!         FunctionDef::native("shout", shout)
//!             .param(TypeRef::named("lang.String"))
//!             .returns(TypeRef::named("lang.String")),
//!     ),
//! );
//!
//! let expr = Expr::lit("hi").property("shout");
//! assert_eq!(helper.evaluate(&expr, Value::Null).unwrap(), Value::string("HI!"));
//! ```

pub mod types;
pub mod registry;
pub mod config;
pub mod cache;
pub mod resolver;
pub mod core_resolver;
pub mod implicit_method;
pub mod implicit_property;
pub mod implicit_constructor;
pub mod chain;

pub use types::{FunctionBody, FunctionDef, FunctionLibrary, NativeFn, RegisteredFunction};
pub use registry::ImplicitRegistry;
pub use config::HelperConfig;
pub use cache::{CacheKey, Resolution, ResolutionCache};
pub use resolver::{ConstructorResolver, MethodResolver, PropertyAccessor};
pub use core_resolver::{NativeConstructorResolver, NativeMethodResolver};
pub use implicit_method::ImplicitMethodResolver;
pub use implicit_property::ImplicitPropertyAccessor;
pub use implicit_constructor::ImplicitConstructorResolver;
pub use chain::ResolverChains;
