//! Core types for the scan ledger.
//!
//! Every record stored by the ledger is defined here, together with the
//! per-call [`CallContext`] the host supplies.
//!
//! With the `typescript` feature enabled, the record types can be exported to
//! TypeScript using ts-rs.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::error::LedgerError;

/// Chain position supplied by the host for the duration of one call.
pub type BlockHeight = u64;

/// Transaction volume. Unsigned, bounded only by the storage width.
pub type Volume = u128;

/// Sequence id issued by one of the global counters.
pub type SequenceId = u64;

/// Maximum characters in a participant display name.
pub const MAX_DISPLAY_NAME_LEN: usize = 50;
/// Maximum characters in a transaction type label.
pub const MAX_TX_TYPE_LEN: usize = 32;
/// Maximum characters in a transaction note.
pub const MAX_NOTE_LEN: usize = 256;
/// Maximum characters in a scan name.
pub const MAX_SCAN_NAME_LEN: usize = 100;
/// Maximum characters in a scan description.
pub const MAX_SCAN_DESCRIPTION_LEN: usize = 500;

pub type DisplayName = BoundedText<MAX_DISPLAY_NAME_LEN>;
pub type TxTypeLabel = BoundedText<MAX_TX_TYPE_LEN>;
pub type Note = BoundedText<MAX_NOTE_LEN>;
pub type ScanName = BoundedText<MAX_SCAN_NAME_LEN>;
pub type ScanDescription = BoundedText<MAX_SCAN_DESCRIPTION_LEN>;

/// Caller / account reference used as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Identity {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// Text with a maximum length in characters, checked on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundedText<const MAX: usize>(String);

impl<const MAX: usize> BoundedText<MAX> {
    /// Build bounded text, rejecting anything longer than `MAX` characters.
    pub fn new(text: impl Into<String>) -> Result<Self, LedgerError> {
        let text = text.into();
        let len = text.chars().count();
        if len > MAX {
            return Err(LedgerError::InvalidParameters(format!(
                "text of {len} characters exceeds limit of {MAX}"
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub const fn max_len() -> usize {
        MAX
    }
}

impl<const MAX: usize> TryFrom<String> for BoundedText<MAX> {
    type Error = LedgerError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl<const MAX: usize> TryFrom<&str> for BoundedText<MAX> {
    type Error = LedgerError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl<const MAX: usize> From<BoundedText<MAX>> for String {
    fn from(text: BoundedText<MAX>) -> Self {
        text.0
    }
}

impl<const MAX: usize> fmt::Display for BoundedText<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context the host hands to every operation: who is calling, and at what height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Calling identity, trusted as supplied
    pub caller: Identity,
    /// Current chain height
    pub block_height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: impl Into<Identity>, block_height: BlockHeight) -> Self {
        Self {
            caller: caller.into(),
            block_height,
        }
    }

    /// The self-call context: the same height, with the contract itself as caller.
    ///
    /// This is the only context that passes the owner check on the type
    /// registry. Ordinary external callers cannot produce it.
    pub fn as_contract(&self, contract: &Identity) -> Self {
        Self {
            caller: contract.clone(),
            block_height: self.block_height,
        }
    }
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Participant {
    /// Human-readable name
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub display_name: DisplayName,
    /// Height of the latest registration call
    pub registered_at: BlockHeight,
    /// Cumulative scans; no exposed operation increments it
    pub total_scans: u64,
    /// Height of the most recent logged transaction since registration
    pub last_activity: Option<BlockHeight>,
}

/// Storage key of a transaction: (sequence id, participant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TxKey {
    pub id: SequenceId,
    pub participant: Identity,
}

/// An immutable transaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Transaction {
    /// Type label, a registry member at write time
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub tx_type: TxTypeLabel,
    pub volume: Volume,
    /// Height at which the transaction was logged
    pub created_at: BlockHeight,
    #[cfg_attr(feature = "typescript", ts(type = "string | null"))]
    pub note: Option<Note>,
}

/// Lifecycle of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    /// Created, not yet started
    Pending,
    /// Started by its creator
    InProgress,
    /// Terminal
    Completed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl Default for ScanStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A creator-owned scan task over a height range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Scan {
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub name: ScanName,
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub description: ScanDescription,
    /// Immutable owner; the only identity allowed to advance the status
    pub creator: Identity,
    pub start_height: BlockHeight,
    pub end_height: BlockHeight,
    /// Never incremented by any exposed operation
    pub total_transactions: u64,
    pub status: ScanStatus,
    /// Set at creation and never toggled
    pub active: bool,
}

impl Scan {
    /// A scan is live while it is in progress and active.
    pub fn is_live(&self) -> bool {
        self.status == ScanStatus::InProgress && self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_text_limits() {
        assert!(BoundedText::<5>::new("hello").is_ok());
        assert!(BoundedText::<5>::new("").is_ok());

        let err = BoundedText::<5>::new("hello!").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParameters(_)));
    }

    #[test]
    fn test_bounded_text_counts_characters() {
        // five characters, more than five bytes
        assert!(BoundedText::<5>::new("héllö").is_ok());
    }

    #[test]
    fn test_bounded_text_rejects_oversized_json() {
        let json = format!("\"{}\"", "x".repeat(MAX_TX_TYPE_LEN + 1));
        assert!(serde_json::from_str::<TxTypeLabel>(&json).is_err());

        let ok: TxTypeLabel = serde_json::from_str("\"vote\"").unwrap();
        assert_eq!(ok.as_str(), "vote");
    }

    #[test]
    fn test_scan_status_labels() {
        assert_eq!(
            serde_json::to_string(&ScanStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(ScanStatus::default(), ScanStatus::Pending);
        assert_eq!(ScanStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_as_contract_keeps_height() {
        let contract = Identity::new("SP000.scan-ledger");
        let ctx = CallContext::new("SP1ALICE", 42);
        let self_call = ctx.as_contract(&contract);

        assert_eq!(self_call.caller, contract);
        assert_eq!(self_call.block_height, 42);
    }
}
