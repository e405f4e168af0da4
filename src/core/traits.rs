//! Core traits for chainflow components
//!
//! This module defines the fundamental interfaces that decouple the
//! executor from the handlers it runs and from the wiring layer that
//! constructs them.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{
    context::VarContext,
    error::{ChainResult, HandlerFault},
    parts::CallParts,
};

/// A named unit of work in a chain.
///
/// Handlers are supplied pre-constructed, in a fixed order, by the wiring
/// layer; the executor does not own their lifecycle. `supports` must be
/// side-effect free; `handle` may mutate the context and raise a fault.
pub trait ChainHandler<C>: Send + Sync {
    /// Return the name of this handler
    fn name(&self) -> &str;

    /// Decide whether this handler applies to the given context.
    /// Unsupported handlers are skipped without any state change.
    fn supports(&self, _ctx: &C) -> bool {
        true
    }

    /// Do the handler's work, mutating the shared context
    fn handle(&self, ctx: &mut C) -> Result<(), HandlerFault>;
}

/// Caller-supplied factory that builds a context from call parts.
///
/// Any error it returns is surfaced as an unrecoverable initialization
/// fault and the chain never runs.
pub type ContextFactory<C> = Arc<dyn Fn(&CallParts) -> ChainResult<C> + Send + Sync>;

/// Handler factory function type for the config-driven wiring layer
pub type HandlerCreateFn = fn(JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>>;
