//! The full ledger state and its public entry points.
//!
//! `LedgerState` composes the identity registry, the type registry, the
//! transaction ledger and the scan manager. Each mutating method validates
//! everything it needs before touching any component, so an error leaves the
//! state exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::identity::IdentityRegistry;
use crate::scans::ScanManager;
use crate::transactions::TransactionLedger;
use crate::tx_types::TypeRegistry;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    identities: IdentityRegistry,
    tx_types: TypeRegistry,
    transactions: TransactionLedger,
    scans: ScanManager,
}

impl LedgerState {
    /// Build an empty ledger from a config.
    pub fn new(config: &LedgerConfig) -> Result<Self> {
        config.validate()?;
        let owner = Identity::new(config.contract_identity.as_str());
        Ok(Self {
            identities: IdentityRegistry::new(),
            tx_types: TypeRegistry::from_config(owner, &config.tx_types)?,
            transactions: TransactionLedger::new(),
            scans: ScanManager::new(),
        })
    }

    /// The contract's own identity, owner of the type registry.
    pub fn contract_identity(&self) -> &Identity {
        self.tx_types.owner()
    }

    /// Create or overwrite the caller's profile.
    pub fn register(&mut self, ctx: &CallContext, display_name: &str) -> Result<()> {
        let display_name = DisplayName::new(display_name)?;
        self.identities.register(ctx, display_name);
        Ok(())
    }

    pub fn get_profile(&self, identity: &Identity) -> Option<&Participant> {
        self.identities.get(identity)
    }

    /// Append a type label. Only the self-call context passes the owner check.
    pub fn add_type(&mut self, ctx: &CallContext, label: &str) -> Result<()> {
        // Non-owners see NotAuthorized even for a malformed label.
        self.tx_types.authorize(ctx)?;
        let label = TxTypeLabel::new(label)?;
        self.tx_types.add(label)
    }

    pub fn is_valid_type(&self, label: &str) -> bool {
        self.tx_types.contains(label)
    }

    /// Current labels, in insertion order.
    pub fn types(&self) -> &[TxTypeLabel] {
        self.tx_types.labels()
    }

    pub fn type_capacity(&self) -> usize {
        self.tx_types.capacity()
    }

    /// Log a transaction for the caller and return its id.
    ///
    /// The type must be in the registry right now. If the caller has a
    /// profile its last activity moves to the current height; otherwise
    /// that step is skipped.
    pub fn log_transaction(
        &mut self,
        ctx: &CallContext,
        tx_type: &str,
        volume: Volume,
        note: Option<&str>,
    ) -> Result<SequenceId> {
        if !self.tx_types.contains(tx_type) {
            return Err(LedgerError::InvalidTxType(tx_type.to_string()));
        }
        let tx_type = TxTypeLabel::new(tx_type)?;
        let note = note.map(Note::new).transpose()?;

        let id = self
            .transactions
            .append(&ctx.caller, tx_type, volume, note, ctx.block_height)?;
        self.identities.touch(&ctx.caller, ctx.block_height);

        info!(
            tx_id = id,
            participant = %ctx.caller,
            volume = %volume,
            height = ctx.block_height,
            "Logged transaction"
        );
        Ok(id)
    }

    pub fn get_transaction(&self, id: SequenceId, participant: &Identity) -> Option<&Transaction> {
        self.transactions.get(id, participant)
    }

    /// Last issued transaction id (0 if none).
    pub fn transaction_count(&self) -> SequenceId {
        self.transactions.counter()
    }

    pub fn create_scan(
        &mut self,
        ctx: &CallContext,
        name: &str,
        description: &str,
        start_height: BlockHeight,
        end_height: BlockHeight,
    ) -> Result<SequenceId> {
        let name = ScanName::new(name)?;
        let description = ScanDescription::new(description)?;
        self.scans
            .create(ctx, name, description, start_height, end_height)
    }

    pub fn start_scan(&mut self, ctx: &CallContext, scan_id: SequenceId) -> Result<()> {
        self.scans.start(ctx, scan_id)
    }

    pub fn complete_scan(&mut self, ctx: &CallContext, scan_id: SequenceId) -> Result<()> {
        self.scans.complete(ctx, scan_id)
    }

    pub fn get_scan(&self, scan_id: SequenceId) -> Option<&Scan> {
        self.scans.get(scan_id)
    }

    pub fn is_live(&self, scan_id: SequenceId) -> bool {
        self.scans.is_live(scan_id)
    }

    /// Last issued scan id (0 if none).
    pub fn scan_count(&self) -> SequenceId {
        self.scans.counter()
    }

    /// Serialize the raw state for the host to persist.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore state written by [`LedgerState::to_json`].
    ///
    /// Snapshots whose counters lag behind their stored ids, or whose type
    /// registry is over capacity, are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.tx_types.check_consistency()?;
        state.transactions.check_consistency()?;
        state.scans.check_consistency()?;

        debug!(
            transactions = state.transactions.len(),
            scans = state.scans.len(),
            "Restored ledger snapshot"
        );
        Ok(state)
    }

    /// Deterministic SHA-256 digest of the whole state, hex encoded.
    ///
    /// Covers counters, registry contents and every record in key order.
    pub fn state_hash(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        hasher.update(self.tx_types.owner().as_str().as_bytes());
        hasher.update((self.tx_types.capacity() as u64).to_be_bytes());
        for label in self.tx_types.labels() {
            hash_field(&mut hasher, label.as_str());
        }

        hasher.update(b"participants");
        for (identity, p) in self.identities.iter() {
            hash_field(&mut hasher, identity.as_str());
            hash_field(&mut hasher, p.display_name.as_str());
            hasher.update(p.registered_at.to_be_bytes());
            hasher.update(p.total_scans.to_be_bytes());
            hash_option(&mut hasher, p.last_activity);
        }

        hasher.update(b"transactions");
        hasher.update(self.transactions.counter().to_be_bytes());
        for (key, tx) in self.transactions.iter() {
            hasher.update(key.id.to_be_bytes());
            hash_field(&mut hasher, key.participant.as_str());
            hash_field(&mut hasher, tx.tx_type.as_str());
            hasher.update(tx.volume.to_be_bytes());
            hasher.update(tx.created_at.to_be_bytes());
            match &tx.note {
                Some(note) => {
                    hasher.update([1u8]);
                    hash_field(&mut hasher, note.as_str());
                }
                None => hasher.update([0u8]),
            }
        }

        hasher.update(b"scans");
        hasher.update(self.scans.counter().to_be_bytes());
        for (id, scan) in self.scans.iter() {
            hasher.update(id.to_be_bytes());
            hash_field(&mut hasher, scan.name.as_str());
            hash_field(&mut hasher, scan.description.as_str());
            hash_field(&mut hasher, scan.creator.as_str());
            hasher.update(scan.start_height.to_be_bytes());
            hasher.update(scan.end_height.to_be_bytes());
            hasher.update(scan.total_transactions.to_be_bytes());
            hash_field(&mut hasher, scan.status.as_str());
            hasher.update([scan.active as u8]);
        }

        hex::encode(hasher.finalize())
    }
}

/// Length-prefixed so adjacent fields cannot run together.
fn hash_field(hasher: &mut sha2::Sha256, value: &str) {
    use sha2::Digest;
    hasher.update((value.len() as u64).to_be_bytes());
    hasher.update(value.as_bytes());
}

fn hash_option(hasher: &mut sha2::Sha256, value: Option<u64>) {
    use sha2::Digest;
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hasher.update(v.to_be_bytes());
        }
        None => hasher.update([0u8]),
    }
}
