//! Unified error handling for chainflow
//!
//! This module provides a centralized error type system: the faults a
//! handler may raise during its turn, and the errors a chain execution
//! surfaces to its caller.

use std::fmt;

/// Fault raised by a handler's `handle` phase.
///
/// The discriminant drives the executor's classification step: a
/// `Continue` fault is swallowed and the chain moves to the next handler,
/// an `Interrupt` fault stops the chain and is propagated with its
/// identity intact, and anything else is normalized into a generic chain
/// failure carrying the original message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerFault {
    /// Benign signal: skip the rest of this handler, keep the chain going
    Continue(Option<String>),

    /// Deliberate early termination of the whole chain
    Interrupt { status: u16, message: String },

    /// Unexpected failure; wrapped into `ChainError::Failed` on propagation
    Other(String),
}

impl HandlerFault {
    /// Continue fault with an optional reason for the trace log
    pub fn continue_with(reason: impl Into<String>) -> Self {
        HandlerFault::Continue(Some(reason.into()))
    }

    /// Interrupt fault carrying a status code and message
    pub fn interrupt(status: u16, message: impl Into<String>) -> Self {
        HandlerFault::Interrupt {
            status,
            message: message.into(),
        }
    }

    /// Unclassified fault from any displayable error
    pub fn other(err: impl fmt::Display) -> Self {
        HandlerFault::Other(err.to_string())
    }
}

impl fmt::Display for HandlerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerFault::Continue(Some(reason)) => write!(f, "continue: {reason}"),
            HandlerFault::Continue(None) => write!(f, "continue"),
            HandlerFault::Interrupt { status, message } => {
                write!(f, "interrupt ({status}): {message}")
            }
            HandlerFault::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for HandlerFault {}

/// Unified error types for chain execution and wiring
#[derive(Debug)]
pub enum ChainError {
    /// Configuration-related errors (bad config file, unknown handler type)
    Configuration(String),

    /// Context construction from call parts failed; the chain never ran
    Initialization(String),

    /// A handler interrupted the chain on purpose; identity preserved
    Interrupted { status: u16, message: String },

    /// An unclassified handler fault, normalized to its message
    Failed(String),

    /// I/O errors from configuration loading
    Io(std::io::Error),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            ChainError::Initialization(msg) => write!(f, "Context initialization failed: {msg}"),
            ChainError::Interrupted { status, message } => {
                write!(f, "Chain interrupted ({status}): {message}")
            }
            ChainError::Failed(msg) => write!(f, "Chain failed: {msg}"),
            ChainError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ChainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChainError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err)
    }
}

/// Result type alias for chain operations
pub type ChainResult<T> = std::result::Result<T, ChainError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn with_context(self, context: &str) -> ChainResult<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: fmt::Display,
{
    fn with_context(self, context: &str) -> ChainResult<T> {
        self.map_err(|e| ChainError::Failed(format!("{context}: {e}")))
    }
}

/// Convenience macro for configuration error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::ChainError::Configuration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::ChainError::Configuration(format!($fmt, $($arg)*))
    };
}
