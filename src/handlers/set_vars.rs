use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult, HandlerFault},
    traits::ChainHandler,
};

pub const HANDLER_NAME: &str = "set_vars";

/// Creates a SetVars handler instance with the given configuration.
/// Seeds context variables before later handlers run.
pub fn create_set_vars_handler(cfg: JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let config = HandlerConfig::try_from(cfg)?;
    Ok(Arc::new(SetVarsHandler { config }))
}

/// Configuration for the SetVars handler
#[derive(Debug, Serialize, Deserialize, Validate)]
struct HandlerConfig {
    /// Variables to store into the context, by name
    #[validate(length(min = 1))]
    vars: HashMap<String, JsonValue>,

    /// When false, existing variables are left untouched
    #[serde(default = "default_overwrite")]
    overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

impl TryFrom<JsonValue> for HandlerConfig {
    type Error = ChainError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let config: HandlerConfig = serde_json::from_value(value).map_err(|e| {
            ChainError::Configuration(format!("invalid set_vars handler config: {e}"))
        })?;
        config
            .validate()
            .map_err(|e| ChainError::Configuration(format!("invalid set_vars handler config: {e}")))?;
        Ok(config)
    }
}

/// SetVars handler implementation
pub struct SetVarsHandler {
    config: HandlerConfig,
}

impl ChainHandler<VarContext> for SetVarsHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
        for (key, value) in &self.config.vars {
            if !self.config.overwrite && ctx.contains(key) {
                continue;
            }
            ctx.set(key.clone(), value.clone());
        }
        Ok(())
    }
}
