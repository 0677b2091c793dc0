//! Standard library.
//!
//! The built-in type universe plus the extension functions and implicit
//! methods every helper installs by default.

pub mod core;
pub mod extension_functions;
pub mod implicit_methods;
pub mod lang;

pub use core::{register_core_libraries, register_core_types};
