//! Core registration.
//!
//! Installs the built-in type universe and the default libraries.

use crate::runner::ds::types::TypeSystem;
use crate::runner::plugin::config::DefaultsConfig;
use crate::runner::plugin::registry::ImplicitRegistry;

use super::extension_functions;
use super::implicit_methods;
use super::lang;

/// Define the built-in types.
pub fn register_core_types(types: &mut TypeSystem) {
    lang::register(types);
}

/// Register the default libraries enabled in `defaults`.
pub fn register_core_libraries(registry: &ImplicitRegistry, defaults: &DefaultsConfig) {
    if defaults.extension_functions {
        registry.register_functions(&extension_functions::library());
    }
    if defaults.implicit_methods {
        registry.register_implicit_methods(&implicit_methods::library());
    }
}
