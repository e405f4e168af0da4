use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult, HandlerFault},
    traits::ChainHandler,
};

pub const HANDLER_NAME: &str = "guard";

/// Creates a Guard handler instance with the given configuration.
/// Interrupts the chain when a required context variable is missing or
/// does not match the configured pattern.
pub fn create_guard_handler(cfg: JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let config = HandlerConfig::try_from(cfg)?;

    let pattern = match &config.pattern {
        Some(raw) => Some(Regex::new(raw).map_err(|e| {
            ChainError::Configuration(format!("invalid guard handler pattern: {e}"))
        })?),
        None => None,
    };

    Ok(Arc::new(GuardHandler { config, pattern }))
}

/// Configuration for the Guard handler
#[derive(Debug, Serialize, Deserialize, Validate)]
struct HandlerConfig {
    /// Name of the context variable to check
    #[validate(length(min = 1))]
    var: String,

    /// Optional regex the variable's string value must match.
    /// Without a pattern the guard only checks for presence.
    #[serde(default)]
    pattern: Option<String>,

    /// Status code carried by the interrupt fault
    #[serde(default = "default_status")]
    #[validate(range(min = 100, max = 599))]
    status: u16,

    /// Message carried by the interrupt fault
    #[serde(default = "default_message")]
    message: String,
}

fn default_status() -> u16 {
    403
}

fn default_message() -> String {
    "request rejected".to_string()
}

impl TryFrom<JsonValue> for HandlerConfig {
    type Error = ChainError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let config: HandlerConfig = serde_json::from_value(value)
            .map_err(|e| ChainError::Configuration(format!("invalid guard handler config: {e}")))?;
        config
            .validate()
            .map_err(|e| ChainError::Configuration(format!("invalid guard handler config: {e}")))?;
        Ok(config)
    }
}

/// Guard handler implementation
pub struct GuardHandler {
    config: HandlerConfig,
    pattern: Option<Regex>,
}

impl ChainHandler<VarContext> for GuardHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
        let reject = || HandlerFault::interrupt(self.config.status, self.config.message.clone());

        let value = ctx.get_str(&self.config.var).ok_or_else(reject)?;

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Err(reject());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::parts::CallParts;

    fn context() -> VarContext {
        VarContext::from_parts(&CallParts::new("test", vec![]))
    }

    #[test]
    fn test_config_rejects_bad_status() {
        let err = HandlerConfig::try_from(json!({ "var": "user", "status": 42 })).unwrap_err();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn test_config_rejects_bad_pattern() {
        let err = create_guard_handler(json!({ "var": "user", "pattern": "(" }))
            .err()
            .unwrap();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn test_missing_var_interrupts_with_defaults() {
        let handler = create_guard_handler(json!({ "var": "user" })).unwrap();
        let mut ctx = context();

        let fault = handler.handle(&mut ctx).unwrap_err();
        assert_eq!(fault, HandlerFault::interrupt(403, "request rejected"));
    }

    #[test]
    fn test_pattern_mismatch_interrupts_with_configured_identity() {
        let handler = create_guard_handler(json!({
            "var": "user",
            "pattern": "^[a-z]+$",
            "status": 401,
            "message": "unauthorized"
        }))
        .unwrap();
        let mut ctx = context();
        ctx.set("user", "Alice7");

        let fault = handler.handle(&mut ctx).unwrap_err();
        assert_eq!(fault, HandlerFault::interrupt(401, "unauthorized"));
    }

    #[test]
    fn test_matching_var_passes() {
        let handler =
            create_guard_handler(json!({ "var": "user", "pattern": "^[a-z]+$" })).unwrap();
        let mut ctx = context();
        ctx.set("user", "alice");

        assert!(handler.handle(&mut ctx).is_ok());
    }
}
