//! Centralized chain registry
//!
//! This module provides a unified registry for the chains built by the
//! wiring layer, so entry points can look up executors by id without
//! holding references into the configuration.

use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, info};

use crate::engine::ChainExecutor;

use super::context::VarContext;

/// Registry statistics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub chain_count: usize,
    pub handler_count: usize,
}

/// Centralized registry for configured chains
pub struct ChainRegistry {
    chains: DashMap<String, Arc<ChainExecutor<VarContext>>>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
        }
    }

    /// Get a chain by id
    pub fn get_chain(&self, id: &str) -> Option<Arc<ChainExecutor<VarContext>>> {
        self.chains.get(id).map(|entry| entry.value().clone())
    }

    /// Insert or update a chain
    pub fn insert_chain(&self, id: String, chain: Arc<ChainExecutor<VarContext>>) {
        debug!("Inserting chain with ID: {}", id);
        self.chains.insert(id, chain);
    }

    /// Remove a chain
    pub fn remove_chain(&self, id: &str) -> Option<Arc<ChainExecutor<VarContext>>> {
        debug!("Removing chain with ID: {}", id);
        self.chains.remove(id).map(|(_, chain)| chain)
    }

    /// List all registered chains
    pub fn list_chains(&self) -> Vec<Arc<ChainExecutor<VarContext>>> {
        self.chains
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Bulk reload chains, replacing the current set
    pub fn reload_chains(&self, chains: Vec<(String, Arc<ChainExecutor<VarContext>>)>) {
        info!("Reloading {} chains", chains.len());
        self.chains.clear();
        for (id, chain) in chains {
            self.chains.insert(id, chain);
        }
    }

    /// Get registry statistics
    pub fn get_stats(&self) -> RegistryStats {
        let handler_count = self
            .chains
            .iter()
            .map(|entry| entry.value().handler_count())
            .sum();
        RegistryStats {
            chain_count: self.chains.len(),
            handler_count,
        }
    }
}
