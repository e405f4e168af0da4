//! Built-in handlers
//!
//! Each handler file exports a name constant, a factory function taking
//! its JSON configuration, and the configuration struct itself. Handlers
//! operate on [`VarContext`](crate::core::VarContext) and are assembled
//! into chains by the loader, in the order the configuration declares.

pub mod counter;
pub mod fault_injection;
pub mod guard;
pub mod request_id;
pub mod respond;
pub mod set_vars;

use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult},
    traits::{ChainHandler, HandlerCreateFn},
};

/// Global registry mapping handler names to their factory functions
static HANDLER_BUILDER_REGISTRY: Lazy<HashMap<&'static str, HandlerCreateFn>> = Lazy::new(|| {
    let arr: Vec<(&str, HandlerCreateFn)> = vec![
        (counter::HANDLER_NAME, counter::create_counter_handler),
        (
            fault_injection::HANDLER_NAME,
            fault_injection::create_fault_injection_handler,
        ),
        (guard::HANDLER_NAME, guard::create_guard_handler),
        (
            request_id::HANDLER_NAME,
            request_id::create_request_id_handler,
        ),
        (respond::HANDLER_NAME, respond::create_respond_handler),
        (set_vars::HANDLER_NAME, set_vars::create_set_vars_handler),
    ];
    arr.into_iter().collect()
});

/// Creates handler instances from configuration using a factory pattern.
///
/// Looks up the handler builder function in the global registry and
/// invokes it with the provided configuration. Fails fast for unknown
/// handler types.
pub fn build_handler(name: &str, cfg: JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let builder = HANDLER_BUILDER_REGISTRY
        .get(name)
        .ok_or_else(|| ChainError::Configuration(format!("unknown handler type `{name}`")))?;
    builder(cfg)
}

/// Names of all registered handler types
pub fn known_handlers() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = HANDLER_BUILDER_REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}
