//! Shared, lock-serialized handle over a [`LedgerState`].
//!
//! Hosts that already serialize execution can drive `LedgerState` directly.
//! Everywhere else, `Ledger` provides the same guarantees: each mutating call
//! holds the write lock for the whole operation, so no two calls can observe
//! the same next id or a half-applied effect. Queries share the read lock and
//! return owned copies.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::LedgerConfig;
use crate::error::Result;
use crate::state::LedgerState;
use crate::types::*;

/// Cloneable handle; every clone sees the same state.
#[derive(Clone)]
pub struct Ledger {
    state: Arc<RwLock<LedgerState>>,
}

impl Ledger {
    /// Create a ledger from config.
    pub fn new(config: &LedgerConfig) -> Result<Self> {
        Ok(Self::from_state(LedgerState::new(config)?))
    }

    /// Wrap existing state, e.g. one restored from a snapshot.
    pub fn from_state(state: LedgerState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn contract_identity(&self) -> Identity {
        self.state.read().await.contract_identity().clone()
    }

    pub async fn register(&self, ctx: &CallContext, display_name: &str) -> Result<()> {
        self.state.write().await.register(ctx, display_name)
    }

    pub async fn get_profile(&self, identity: &Identity) -> Option<Participant> {
        self.state.read().await.get_profile(identity).cloned()
    }

    pub async fn add_type(&self, ctx: &CallContext, label: &str) -> Result<()> {
        self.state.write().await.add_type(ctx, label)
    }

    pub async fn is_valid_type(&self, label: &str) -> bool {
        self.state.read().await.is_valid_type(label)
    }

    pub async fn types(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.types().iter().map(|l| l.as_str().to_string()).collect()
    }

    pub async fn log_transaction(
        &self,
        ctx: &CallContext,
        tx_type: &str,
        volume: Volume,
        note: Option<&str>,
    ) -> Result<SequenceId> {
        self.state
            .write()
            .await
            .log_transaction(ctx, tx_type, volume, note)
    }

    pub async fn get_transaction(
        &self,
        id: SequenceId,
        participant: &Identity,
    ) -> Option<Transaction> {
        self.state
            .read()
            .await
            .get_transaction(id, participant)
            .cloned()
    }

    pub async fn transaction_count(&self) -> SequenceId {
        self.state.read().await.transaction_count()
    }

    pub async fn create_scan(
        &self,
        ctx: &CallContext,
        name: &str,
        description: &str,
        start_height: BlockHeight,
        end_height: BlockHeight,
    ) -> Result<SequenceId> {
        self.state
            .write()
            .await
            .create_scan(ctx, name, description, start_height, end_height)
    }

    pub async fn start_scan(&self, ctx: &CallContext, scan_id: SequenceId) -> Result<()> {
        self.state.write().await.start_scan(ctx, scan_id)
    }

    pub async fn complete_scan(&self, ctx: &CallContext, scan_id: SequenceId) -> Result<()> {
        self.state.write().await.complete_scan(ctx, scan_id)
    }

    pub async fn get_scan(&self, scan_id: SequenceId) -> Option<Scan> {
        self.state.read().await.get_scan(scan_id).cloned()
    }

    pub async fn is_live(&self, scan_id: SequenceId) -> bool {
        self.state.read().await.is_live(scan_id)
    }

    pub async fn scan_count(&self) -> SequenceId {
        self.state.read().await.scan_count()
    }

    /// Consistent copy of the whole state.
    pub async fn snapshot(&self) -> LedgerState {
        self.state.read().await.clone()
    }

    pub async fn state_hash(&self) -> String {
        self.state.read().await.state_hash()
    }
}
