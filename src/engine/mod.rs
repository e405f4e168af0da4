//! Chain execution layer
//!
//! This module provides the executor that runs an ordered handler chain
//! for one invocation, and the result-wrapper hook applied to its outcome.

pub mod executor;
pub mod wrapper;

pub use executor::{ChainEngine, ChainExecutor};
pub use wrapper::{IdentityResultWrapper, ResultWrapper};
