//! Call parts: the immutable input bundle for one chain execution
//!
//! Call parts are assembled by the entry point before the chain runs and
//! are read-only while it does. They carry the positional arguments, a
//! creation timestamp and a source tag naming the caller.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Milliseconds since the unix epoch
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Immutable input bundle that seeds one chain execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallParts {
    /// Ordered positional arguments, opaque to the executor
    args: Vec<JsonValue>,

    /// Creation timestamp, milliseconds since epoch
    timestamp: i64,

    /// Tag naming the caller or entry point
    source: String,
}

impl CallParts {
    /// Create call parts stamped with the current time
    pub fn new(source: impl Into<String>, args: Vec<JsonValue>) -> Self {
        Self {
            args,
            timestamp: now_millis(),
            source: source.into(),
        }
    }

    /// Override the creation timestamp (replay and tests)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn args(&self) -> &[JsonValue] {
        &self.args
    }

    /// First positional argument, if any. Logged once at chain start for
    /// traceability; plays no role in control flow.
    pub fn first_arg(&self) -> Option<&JsonValue> {
        self.args.first()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Milliseconds elapsed since these parts were created
    pub fn elapsed_ms(&self) -> i64 {
        now_millis() - self.timestamp
    }
}
