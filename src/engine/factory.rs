// ============================================================================
// Engine Factory
// Creates matching engines with proper configuration
// ============================================================================

use crate::domain::EngineConfig;
use crate::engine::MatchingEngine;
use crate::errors::EngineResult;
use crate::interfaces::{EventHandler, InMemoryLedger, Ledger, NoOpEventHandler};
use crate::store::{KvStore, MemStore};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a matching engine over a fresh in-memory store
///
/// # Example
/// ```
/// use orderwall_engine::prelude::*;
/// use orderwall_engine::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let config = EngineConfig::restricted("dex", ["BTC", "ETH"]);
/// let engine = create_from_config(config, InMemoryLedger::new(), Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(engine.config().namespace, "dex");
/// ```
pub fn create_from_config<L: Ledger>(
    config: EngineConfig,
    ledger: L,
    event_handler: Arc<dyn EventHandler>,
) -> EngineResult<MatchingEngine<L>> {
    MatchingEngine::new(config, Arc::new(MemStore::new()), ledger, event_handler)
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating matching engines with fluent API
///
/// # Example
/// ```
/// use orderwall_engine::prelude::*;
/// use orderwall_engine::engine::factory::MatchingEngineBuilder;
/// use std::sync::Arc;
///
/// let ledger = InMemoryLedger::new().with_balance("alice", Amount::new("BTC", 10));
/// let engine = MatchingEngineBuilder::new("dex")
///     .allowed_units(["BTC", "ETH"])
///     .with_ledger(ledger)
///     .with_event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(engine.ledger().balance(&AccountId::new("alice"), "BTC"), 10);
/// ```
pub struct MatchingEngineBuilder<L: Ledger = InMemoryLedger> {
    config: EngineConfig,
    store: Option<Arc<dyn KvStore>>,
    ledger: L,
    event_handler: Arc<dyn EventHandler>,
}

impl MatchingEngineBuilder<InMemoryLedger> {
    /// Create a new builder writing under `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::from_config(EngineConfig::new(namespace))
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            store: None,
            ledger: InMemoryLedger::new(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }
}

impl<L: Ledger> MatchingEngineBuilder<L> {
    // ========================================================================
    // Market Configuration
    // ========================================================================

    /// Only these units may be traded
    pub fn allowed_units<I, U>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.config = self.config.with_allowed_units(units);
        self
    }

    /// Set maximum unit-name length
    pub fn max_unit_length(mut self, length: usize) -> Self {
        self.config = self.config.with_max_unit_length(length);
        self
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    /// Use an existing store, e.g. one shared with other namespaces
    pub fn with_store(mut self, store: Arc<dyn KvStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Settle against `ledger`
    pub fn with_ledger<M: Ledger>(self, ledger: M) -> MatchingEngineBuilder<M> {
        MatchingEngineBuilder {
            config: self.config,
            store: self.store,
            ledger,
            event_handler: self.event_handler,
        }
    }

    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the matching engine
    pub fn build(self) -> EngineResult<MatchingEngine<L>> {
        match self.store {
            Some(store) => MatchingEngine::new(self.config, store, self.ledger, self.event_handler),
            None => create_from_config(self.config, self.ledger, self.event_handler),
        }
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }
}
