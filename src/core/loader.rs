//! Chain loading utilities
//!
//! This module builds executors from configuration and places them into
//! the registry: for each configured chain, the handler references are
//! resolved through the handler factory registry in declared order.
//! Declaration order is execution order; there is no priority sorting.

use std::sync::Arc;

use log::{info, warn};

use crate::{
    config::Config,
    engine::ChainExecutor,
    handlers::build_handler,
};

use super::{
    context::VarContext,
    error::ChainResult,
    registry::{ChainRegistry, RegistryStats},
    traits::ChainHandler,
};

/// Loader that turns configuration into registered chains
pub struct ChainLoader {
    registry: Arc<ChainRegistry>,
}

impl ChainLoader {
    /// Create a new chain loader
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Load all chains from configuration into the registry.
    ///
    /// Fails on the first handler that cannot be built; chains loaded
    /// before the failure stay registered.
    pub fn load_static_chains(&self, config: &Config) -> ChainResult<()> {
        for chain in &config.chains {
            if self.registry.get_chain(&chain.id).is_some() {
                warn!("Chain `{}` already registered, replacing", chain.id);
            }

            let mut handlers: Vec<Arc<dyn ChainHandler<VarContext>>> =
                Vec::with_capacity(chain.handlers.len());
            for handler_ref in &chain.handlers {
                let handler = build_handler(&handler_ref.name, handler_ref.config.clone())?;
                handlers.push(handler);
            }

            let executor = ChainExecutor::new(chain.id.clone(), handlers, |parts| {
                Ok(VarContext::from_parts(parts))
            });
            self.registry.insert_chain(chain.id.clone(), Arc::new(executor));
        }

        let stats = self.registry.get_stats();
        info!(
            "Loaded {} chains with {} handlers",
            stats.chain_count, stats.handler_count
        );

        Ok(())
    }

    /// Get statistics for the underlying registry
    pub fn get_stats(&self) -> RegistryStats {
        self.registry.get_stats()
    }
}
