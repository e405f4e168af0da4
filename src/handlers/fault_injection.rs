use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::core::{
    context::VarContext,
    error::{ChainError, ChainResult, HandlerFault},
    traits::ChainHandler,
};

pub const HANDLER_NAME: &str = "fault_injection";

/// Creates a Fault Injection handler instance with the given configuration.
/// This handler raises a configured fault kind for a configured percentage
/// of invocations, for exercising the chain's classification policy.
pub fn create_fault_injection_handler(
    cfg: JsonValue,
) -> ChainResult<Arc<dyn ChainHandler<VarContext>>> {
    let config = HandlerConfig::try_from(cfg)?;
    Ok(Arc::new(FaultInjectionHandler { config }))
}

/// Which fault discriminant to raise
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FaultKind {
    Continue,
    Interrupt,
    Other,
}

/// Configuration for the Fault Injection handler
#[derive(Debug, Serialize, Deserialize, Validate)]
struct HandlerConfig {
    /// Fault kind to raise
    kind: FaultKind,

    /// Message carried by the fault
    #[serde(default = "default_message")]
    message: String,

    /// Status code used when kind is `interrupt`
    #[serde(default = "default_status")]
    #[validate(range(min = 100, max = 599))]
    status: u16,

    /// Percentage of invocations to fault (0-100). If not set, faults all.
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    percentage: Option<u32>,
}

fn default_message() -> String {
    "injected fault".to_string()
}

fn default_status() -> u16 {
    500
}

impl TryFrom<JsonValue> for HandlerConfig {
    type Error = ChainError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let config: HandlerConfig = serde_json::from_value(value).map_err(|e| {
            ChainError::Configuration(format!("invalid fault_injection handler config: {e}"))
        })?;
        config.validate().map_err(|e| {
            ChainError::Configuration(format!("invalid fault_injection handler config: {e}"))
        })?;
        Ok(config)
    }
}

/// Fault Injection handler implementation
pub struct FaultInjectionHandler {
    config: HandlerConfig,
}

impl FaultInjectionHandler {
    fn should_fault(&self) -> bool {
        match self.config.percentage {
            Some(percentage) => rand::thread_rng().gen_range(0..100) < percentage,
            None => true,
        }
    }
}

impl ChainHandler<VarContext> for FaultInjectionHandler {
    fn name(&self) -> &str {
        HANDLER_NAME
    }

    fn handle(&self, _ctx: &mut VarContext) -> Result<(), HandlerFault> {
        if !self.should_fault() {
            return Ok(());
        }

        match self.config.kind {
            FaultKind::Continue => Err(HandlerFault::continue_with(self.config.message.clone())),
            FaultKind::Interrupt => Err(HandlerFault::interrupt(
                self.config.status,
                self.config.message.clone(),
            )),
            FaultKind::Other => Err(HandlerFault::Other(self.config.message.clone())),
        }
    }
}
