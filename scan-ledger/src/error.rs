//! Error types for ledger operations.
//!
//! Each failed operation yields exactly one of these kinds, and a failure
//! always leaves the ledger untouched.

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Caller failed an identity-equality check
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Scan lookup miss
    #[error("Scan not found: {0}")]
    ScanNotFound(u64),

    /// Transaction lookup miss
    #[error("Transaction not found: {0}")]
    TransactionNotFound(u64),

    /// Type label is not in the registry
    #[error("Invalid transaction type: {0}")]
    InvalidTxType(String),

    /// Scan is already in its terminal state
    #[error("Scan already completed: {0}")]
    ScanAlreadyCompleted(u64),

    /// Scan has not been started yet
    #[error("Scan not started: {0}")]
    ScanNotStarted(u64),

    /// Start/end heights are out of order or the start is in the past
    #[error("Invalid block range: start {start}, end {end}, current {current}")]
    InvalidBlockRange { start: u64, end: u64, current: u64 },

    /// Reserved
    #[error("Duplicate event: {0}")]
    DuplicateEvent(String),

    /// Bad input, including a full type registry
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot (de)serialization failed
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Snapshot parsed but violates a ledger invariant
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl LedgerError {
    /// Stable numeric code for hosts that report errors as integers.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized(_) => 100,
            Self::ScanNotFound(_) => 101,
            Self::TransactionNotFound(_) => 102,
            Self::InvalidTxType(_) => 103,
            Self::ScanAlreadyCompleted(_) => 104,
            Self::ScanNotStarted(_) => 105,
            Self::InvalidBlockRange { .. } => 106,
            Self::DuplicateEvent(_) => 107,
            Self::InvalidParameters(_) => 108,
            Self::Config(_) => 200,
            Self::Snapshot(_) => 201,
            Self::InvalidSnapshot(_) => 202,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
