//! This module contains the core logic of the chainflow execution engine.
//!
//! It defines the main modules for configuration, chain execution, and
//! the built-in handler set.

pub mod config;
pub mod core;
pub mod engine;
pub mod handlers;
pub mod logging;
