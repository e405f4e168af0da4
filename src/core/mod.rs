//! Core abstractions and interfaces for chainflow
//!
//! This module provides the foundational traits, types, and utilities
//! that form the backbone of the chain execution architecture.

pub mod context;
pub mod error;
pub mod loader;
pub mod parts;
pub mod registry;
pub mod traits;


// Re-export commonly used types
pub use context::{ChainContext, VarContext};
pub use error::{ChainError, ChainResult, ErrorContext, HandlerFault};
pub use loader::ChainLoader;
pub use parts::CallParts;
pub use registry::{ChainRegistry, RegistryStats};
pub use traits::{ChainHandler, ContextFactory, HandlerCreateFn};
