//! Result wrapping
//!
//! A result wrapper is the post-processing hook that sits between the
//! executor and the ultimate caller. It receives either the computed
//! response or the captured chain error, plus the original call parts,
//! and decides what the caller finally sees.

use crate::core::{error::ChainError, parts::CallParts};

/// Post-processing hook for the chain's outcome.
///
/// Exactly one of `response` and `error` is populated. Returning `None`
/// on the error path lets the error propagate to the caller; returning
/// `Some` substitutes a recovery response instead.
pub trait ResultWrapper<R>: Send + Sync {
    fn process(
        &self,
        response: Option<R>,
        error: Option<&ChainError>,
        parts: &CallParts,
    ) -> Option<R>;
}

/// Default wrapper: returns the response as-is, ignoring error and parts
pub struct IdentityResultWrapper;

impl<R> ResultWrapper<R> for IdentityResultWrapper {
    fn process(
        &self,
        response: Option<R>,
        _error: Option<&ChainError>,
        _parts: &CallParts,
    ) -> Option<R> {
        response
    }
}
