use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult, HandlerFault},
    traits::ChainHandler,
};

pub const HANDLER_NAME: &str = "counter";

/// Creates a Counter handler instance with the given configuration.
/// Adds a step to a numeric context variable, creating it at zero.
pub fn create_counter_handler(cfg: JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let config = HandlerConfig::try_from(cfg)?;
    Ok(Arc::new(CounterHandler { config }))
}

/// Configuration for the Counter handler
#[derive(Debug, Serialize, Deserialize)]
struct HandlerConfig {
    /// Name of the counter variable
    #[serde(default = "default_var")]
    var: String,

    /// Amount added per invocation; may be negative
    #[serde(default = "default_step")]
    step: i64,
}

fn default_var() -> String {
    "counter".to_string()
}

fn default_step() -> i64 {
    1
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            var: default_var(),
            step: default_step(),
        }
    }
}

impl TryFrom<JsonValue> for HandlerConfig {
    type Error = ChainError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| ChainError::Configuration(format!("invalid counter handler config: {e}")))
    }
}

/// Counter handler implementation
pub struct CounterHandler {
    config: HandlerConfig,
}

impl ChainHandler<VarContext> for CounterHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
        let current = ctx.get_i64(&self.config.var).unwrap_or(0);
        ctx.set(self.config.var.clone(), current + self.config.step);
        Ok(())
    }
}
