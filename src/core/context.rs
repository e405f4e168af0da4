//! Per-invocation context management
//!
//! This module provides the context abstraction that holds per-invocation
//! state and facilitates communication between handlers. Exactly one
//! context exists per chain execution; handlers mutate it in place and
//! can never replace it.

use std::{collections::HashMap, fmt};

use serde_json::Value as JsonValue;

use super::parts::CallParts;

/// Mutable carrier of intermediate and final state for one chain execution.
///
/// Implementations are constructed from [`CallParts`] by a caller-supplied
/// factory, mutated by every handler that runs, and consumed once the
/// response is read.
pub trait ChainContext: fmt::Debug + Send {
    /// Value handed back to the caller when the chain completes
    type Response;

    /// Extract the response, consuming the context
    fn into_response(self) -> Self::Response;
}

/// General-purpose context backed by a JSON variable map.
///
/// This is the context type used by the config-driven wiring layer and
/// the built-in handlers. Handlers communicate through named variables
/// and set the response value explicitly.
#[derive(Debug)]
pub struct VarContext {
    /// The call parts this context was built from
    parts: CallParts,

    /// Named variables available to handlers
    vars: HashMap<String, JsonValue>,

    /// Response value, if any handler produced one
    response: Option<JsonValue>,
}

impl VarContext {
    /// Build a context from call parts
    pub fn from_parts(parts: &CallParts) -> Self {
        Self {
            parts: parts.clone(),
            vars: HashMap::new(),
            response: None,
        }
    }

    pub fn parts(&self) -> &CallParts {
        &self.parts
    }

    /// Store a variable into the context
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Get a variable by name
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.vars.get(key)
    }

    /// Get a string slice if the stored value is a JSON string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer if the stored value is a JSON number
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    /// Check if a variable exists in the context
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Remove a variable from the context
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.vars.remove(key)
    }

    /// Set the response value, replacing any previous one
    pub fn set_response(&mut self, response: JsonValue) {
        self.response = Some(response);
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

impl ChainContext for VarContext {
    type Response = JsonValue;

    fn into_response(self) -> JsonValue {
        self.response.unwrap_or(JsonValue::Null)
    }
}
