use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult, HandlerFault},
    traits::ChainHandler,
};

pub const HANDLER_NAME: &str = "respond";

/// Creates a Respond handler instance with the given configuration.
/// Sets the chain's response value; by default only when none is set yet,
/// so it can serve as a fallback at the end of a chain.
pub fn create_respond_handler(cfg: JsonValue) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let config = HandlerConfig::try_from(cfg)?;
    Ok(Arc::new(RespondHandler { config }))
}

/// Configuration for the Respond handler
#[derive(Debug, Serialize, Deserialize)]
struct HandlerConfig {
    /// The response value to set
    body: JsonValue,

    /// Replace an already-set response instead of skipping
    #[serde(default)]
    overwrite: bool,
}

impl TryFrom<JsonValue> for HandlerConfig {
    type Error = ChainError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
            .map_err(|e| ChainError::Configuration(format!("invalid respond handler config: {e}")))
    }
}

/// Respond handler implementation
pub struct RespondHandler {
    config: HandlerConfig,
}

impl ChainHandler<VarContext> for RespondHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn supports(&self, ctx: &VarContext) -> bool {
        self.config.overwrite || !ctx.has_response()
    }

    fn handle(&self, ctx: &mut VarContext) -> Result<(), HandlerFault> {
        ctx.set_response(self.config.body.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::{context::ChainContext, parts::CallParts};

    fn context() -> VarContext {
        VarContext::from_parts(&CallParts::new("test", vec![]))
    }

    #[test]
    fn test_config_requires_body() {
        let err = HandlerConfig::try_from(json!({})).unwrap_err();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn test_sets_response() {
        let handler = create_respond_handler(json!({ "body": { "ok": true } })).unwrap();
        let mut ctx = context();

        assert!(handler.supports(&ctx));
        handler.handle(&mut ctx).unwrap();

        assert_eq!(ctx.into_response(), json!({"ok": true}));
    }

    #[test]
    fn test_does_not_support_when_response_present() {
        let handler = create_respond_handler(json!({ "body": "fallback" })).unwrap();
        let mut ctx = context();
        ctx.set_response(json!("primary"));

        assert!(!handler.supports(&ctx));
    }

    #[test]
    fn test_overwrite_replaces_response() {
        let handler =
            create_respond_handler(json!({ "body": "replacement", "overwrite": true })).unwrap();
        let mut ctx = context();
        ctx.set_response(json!("primary"));

        assert!(handler.supports(&ctx));
        handler.handle(&mut ctx).unwrap();

        assert_eq!(ctx.into_response(), json!("replacement"));
    }
}
