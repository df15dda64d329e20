//! Block monitor
//!
//! Polls the chain for new blocks, scans every invocation transaction for
//! calls to the monitored contract and applies them to the mailbox registry.
//! Blocks are handled one at a time in height order; registrations within a
//! block follow transaction order.

use crate::contract::{
    locate_contract, CallExtractor, ContractIdentity, Disassembler, NeoDisassembler,
};
use crate::core::{Block, Transaction};
use crate::mailbox::{dispatch, MailboxRegistry, Registration};
use crate::monitor::control::{MonitorControl, MonitorState};
use crate::monitor::provider::{ChainProvider, ProviderError};
use crate::storage::{CacheStats, TransactionCache, DEFAULT_CACHE_SIZE};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Default pause between height checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Monitor errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Block {0} is missing from the chain")]
    MissingBlock(u64),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Pause between height checks
    pub poll_interval: Duration,
    /// Last height considered processed; scanning starts at the next one
    pub start_height: u64,
    /// Maximum number of cached transactions
    pub cache_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            start_height: 0,
            cache_capacity: DEFAULT_CACHE_SIZE,
        }
    }
}

/// Scan counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStats {
    pub blocks_processed: u64,
    pub transactions_scanned: u64,
    pub decode_failures: u64,
    pub calls_decoded: u64,
    pub registrations: u64,
    pub registrations_accepted: u64,
}

/// Watches a chain for mailbox registrations
pub struct BlockMonitor<P, D = NeoDisassembler> {
    provider: P,
    disassembler: D,
    contract: Option<ContractIdentity>,
    extractor: CallExtractor,
    registry: MailboxRegistry,
    cache: TransactionCache,
    last_processed_height: u64,
    config: MonitorConfig,
    control: MonitorControl,
    stats: MonitorStats,
}

impl<P: ChainProvider> BlockMonitor<P> {
    /// Build a monitor from the deployment transaction of the contract
    pub fn new(
        provider: P,
        deployment: Option<&Transaction>,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        Self::with_disassembler(provider, NeoDisassembler, deployment, config)
    }

    /// Build a monitor, fetching the deployment transaction by hash
    pub async fn connect(
        provider: P,
        deployment_hash: &str,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let deployment = provider.get_transaction(deployment_hash).await?;
        if deployment.is_none() {
            return Err(MonitorError::InvalidInput(format!(
                "deployment transaction {} not found",
                deployment_hash
            )));
        }
        Self::new(provider, deployment.as_ref(), config)
    }
}

impl<P: ChainProvider, D: Disassembler> BlockMonitor<P, D> {
    /// Build a monitor with a custom disassembler
    pub fn with_disassembler(
        provider: P,
        disassembler: D,
        deployment: Option<&Transaction>,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let deployment = deployment.ok_or_else(|| {
            MonitorError::InvalidInput("deployment transaction is missing".to_string())
        })?;

        let code = disassembler.disassemble(&deployment.script).map_err(|e| {
            MonitorError::InvalidInput(format!(
                "deployment transaction {} does not disassemble: {}",
                deployment.hash, e
            ))
        })?;
        if code.is_empty() {
            return Err(MonitorError::InvalidInput(format!(
                "deployment transaction {} has an empty script",
                deployment.hash
            )));
        }

        let contract = locate_contract(&code);
        match &contract {
            Some(identity) => info!(
                "Monitoring contract {} ({})",
                identity.hash,
                identity.hash.to_address()
            ),
            None => warn!(
                "Deployment transaction {} creates no contract; no calls will match",
                deployment.hash
            ),
        }

        let mut cache = TransactionCache::with_capacity(config.cache_capacity);
        cache.insert(deployment.clone());

        Ok(Self {
            provider,
            disassembler,
            extractor: CallExtractor::new(contract.as_ref().map(|c| c.hash)),
            contract,
            registry: MailboxRegistry::new(),
            cache,
            last_processed_height: config.start_height,
            config,
            control: MonitorControl::new(),
            stats: MonitorStats::default(),
        })
    }

    /// Start the monitor and poll until it is stopped.
    ///
    /// Returns early only on a fatal error: a provider failure or a block
    /// the chain reports but cannot serve. The monitor is Idle again on
    /// every return.
    pub async fn run(&mut self) -> Result<(), MonitorError> {
        let mut state = self.control.subscribe();
        if !self.control.start() {
            debug!("Monitor already running");
        }
        info!("Monitor running from height {}", self.last_processed_height);

        while *state.borrow_and_update() == MonitorState::Running {
            if let Err(e) = self.poll_once().await {
                self.control.stop();
                warn!(
                    "Monitor halted at height {}: {}",
                    self.last_processed_height, e
                );
                return Err(e);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                _ = state.changed() => {}
            }
        }

        info!("Monitor stopped at height {}", self.last_processed_height);
        Ok(())
    }

    /// Check the chain height once and process every block above the cursor.
    /// Returns the number of blocks processed.
    pub async fn poll_once(&mut self) -> Result<u64, MonitorError> {
        let current_height = self.provider.get_block_height().await?;
        let mut processed = 0;

        while self.last_processed_height < current_height {
            let height = self.last_processed_height + 1;
            let block = self
                .provider
                .get_block(height)
                .await?
                .ok_or(MonitorError::MissingBlock(height))?;

            self.process_block(&block);
            self.last_processed_height = height;
            processed += 1;
        }

        Ok(processed)
    }

    /// Scan one block and apply its registrations, in transaction order
    pub fn process_block(&mut self, block: &Block) -> Vec<Registration> {
        let mut registrations = Vec::new();

        for tx in &block.transactions {
            self.cache.insert(tx.clone());
        }

        for tx in block.invocations() {
            self.stats.transactions_scanned += 1;

            let code = match self.disassembler.disassemble(&tx.script) {
                Ok(code) => code,
                Err(e) => {
                    warn!("Skipping transaction {}: {}", tx.hash, e);
                    self.stats.decode_failures += 1;
                    continue;
                }
            };

            let calls = match self.extractor.extract(&code) {
                Ok(calls) => calls,
                Err(e) => {
                    warn!("Skipping transaction {}: {}", tx.hash, e);
                    self.stats.decode_failures += 1;
                    continue;
                }
            };

            for call in &calls {
                self.stats.calls_decoded += 1;
                if let Some(registration) = dispatch(call, &mut self.registry) {
                    self.stats.registrations += 1;
                    if registration.outcome.is_registered() {
                        self.stats.registrations_accepted += 1;
                    }
                    registrations.push(registration);
                }
            }
        }

        self.stats.blocks_processed += 1;
        info!("Processed block {}", block.index);
        registrations
    }

    /// Look up a transaction, consulting the cache before the provider
    pub async fn transaction(&mut self, hash: &str) -> Result<Option<Transaction>, MonitorError> {
        if let Some(tx) = self.cache.get(hash) {
            return Ok(Some(tx));
        }

        let tx = self.provider.get_transaction(hash).await?;
        if let Some(tx) = &tx {
            self.cache.insert(tx.clone());
        }
        Ok(tx)
    }

    /// Seed the transaction cache
    pub fn cache_transaction(&mut self, tx: Transaction) {
        self.cache.insert(tx);
    }

    /// Handle for starting and stopping this monitor from other tasks
    pub fn control(&self) -> MonitorControl {
        self.control.clone()
    }

    pub fn contract(&self) -> Option<&ContractIdentity> {
        self.contract.as_ref()
    }

    pub fn registry(&self) -> &MailboxRegistry {
        &self.registry
    }

    pub fn last_processed_height(&self) -> u64 {
        self.last_processed_height
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}
