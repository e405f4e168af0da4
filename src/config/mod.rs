//! Configuration loading and validation
//!
//! Chains are declared in YAML: each chain has an id and an ordered
//! handler list, and each handler reference names a registered handler
//! type plus its type-specific configuration.

use std::fs;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::core::error::{ChainError, ChainResult};

/// Top-level configuration
#[derive(Default, Debug, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    pub log: Log,

    #[validate(length(min = 1))]
    #[validate(nested)]
    pub chains: Vec<Chain>,
}

// Config file load and validation
impl Config {
    pub fn load_from_yaml<P>(path: P) -> ChainResult<Self>
    where
        P: AsRef<std::path::Path> + std::fmt::Display,
    {
        let conf_str = fs::read_to_string(&path)
            .map_err(|e| ChainError::Configuration(format!("unable to read conf file from {path}: {e}")))?;
        debug!("Conf file read from {path}");
        Self::from_yaml(&conf_str)
    }

    pub fn from_yaml(conf_str: &str) -> ChainResult<Self> {
        trace!("Read conf file: {conf_str}");
        let conf: Config = serde_yaml::from_str(conf_str)
            .map_err(|e| ChainError::Configuration(format!("unable to parse yaml conf: {e}")))?;

        trace!("Loaded conf: {conf:?}");

        // use validator to validate conf file
        conf.validate()
            .map_err(|e| ChainError::Configuration(format!("conf file validation failed: {e}")))?;

        Ok(conf)
    }

    #[allow(dead_code)]
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).unwrap()
    }
}

/// One configured chain: an id and its ordered handler list.
/// Declaration order is execution order. An empty handler list is legal;
/// such a chain returns an empty response.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Chain {
    #[validate(length(min = 1))]
    pub id: String,

    #[serde(default)]
    #[validate(nested)]
    pub handlers: Vec<HandlerRef>,
}

/// Reference to a registered handler type plus its configuration
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct HandlerRef {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default)]
    pub config: JsonValue,
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Log {
    /// Log level filter: off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file; stderr when unset
    #[serde(default)]
    pub path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_valid_config_parses() {
        let conf = Config::from_yaml(
            r#"
log:
  level: debug
chains:
  - id: demo
    handlers:
      - name: set_vars
        config:
          vars:
            user: alice
      - name: respond
        config:
          body: ok
"#,
        )
        .unwrap();

        assert_eq!(conf.log.level, "debug");
        assert_eq!(conf.chains.len(), 1);
        assert_eq!(conf.chains[0].id, "demo");
        assert_eq!(conf.chains[0].handlers.len(), 2);
        assert_eq!(conf.chains[0].handlers[1].config, json!({"body": "ok"}));
    }

    #[test]
    fn test_handler_config_defaults_to_null() {
        let conf = Config::from_yaml(
            r#"
chains:
  - id: demo
    handlers:
      - name: counter
"#,
        )
        .unwrap();

        assert!(conf.chains[0].handlers[0].config.is_null());
    }

    #[test]
    fn test_empty_handler_list_is_legal() {
        let conf = Config::from_yaml(
            r#"
chains:
  - id: hollow
"#,
        )
        .unwrap();

        assert!(conf.chains[0].handlers.is_empty());
    }

    #[test]
    fn test_missing_chains_fails_validation() {
        let err = Config::from_yaml("chains: []").unwrap_err();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn test_empty_chain_id_fails_validation() {
        let err = Config::from_yaml(
            r#"
chains:
  - id: ""
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn test_log_defaults() {
        let log = Log::default();
        assert_eq!(log.level, "info");
        assert!(log.path.is_none());
    }
}
