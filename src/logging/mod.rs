//! Logging setup
//!
//! Level filtering lives here, in the observability layer; the executor
//! emits its trace events unconditionally and never checks levels in
//! control flow.

use std::fs::{create_dir_all, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

use crate::{config, core::error::ChainResult};

pub struct Logger {
    config: config::Log,
}

impl Logger {
    pub fn new(config: config::Log) -> Self {
        Self { config }
    }

    fn level_filter(&self) -> LevelFilter {
        match self.config.level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }

    /// Initialize the global logger. Call once at startup.
    pub fn init(&self) -> ChainResult<()> {
        let mut builder = Builder::from_env(Env::default());
        builder.filter(None, self.level_filter());

        if let Some(path) = &self.config.path {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    create_dir_all(parent)?;
                }
            }

            let file = OpenOptions::new().append(true).create(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }

        builder.init();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_parsing() {
        let logger = Logger::new(config::Log {
            level: "DEBUG".to_string(),
            path: None,
        });
        assert_eq!(logger.level_filter(), LevelFilter::Debug);

        let logger = Logger::new(config::Log {
            level: "bogus".to_string(),
            path: None,
        });
        assert_eq!(logger.level_filter(), LevelFilter::Info);
    }
}
