use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult, HandlerFault},
    traits::ChainHandler,
};

pub const HANDLER_NAME: &str = "request_id";

/// Creates a Request ID handler instance with the given configuration.
/// Stores a UUIDv4 under a configurable variable name so later handlers
/// and trace output can correlate the invocation.
pub fn create_request_id_handler(cfg: JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let config = HandlerConfig::try_from(cfg)?;
    Ok(Arc::new(RequestIdHandler { config }))
}

/// Configuration for the Request ID handler
#[derive(Debug, Serialize, Deserialize)]
struct HandlerConfig {
    /// Name of the variable that receives the id
    #[serde(default = "default_var")]
    var: String,
}

fn default_var() -> String {
    "request_id".to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self { var: default_var() }
    }
}

impl TryFrom<JsonValue> for HandlerConfig {
    type Error = ChainError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| {
            ChainError::Configuration(format!("invalid request_id handler config: {e}"))
        })
    }
}

/// Request ID handler implementation
pub struct RequestIdHandler {
    config: HandlerConfig,
}

impl ChainHandler<VarContext> for RequestIdHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    /// An id supplied upstream wins; only generate when absent
    fn supports(&self, ctx: &VarContext) -> bool {
        !ctx.contains(&self.config.var)
    }

    fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
        ctx.set(self.config.var.clone(), Uuid::new_v4().to_string());
        Ok(())
    }
}
