//! Scan Ledger
//!
//! Deterministic ledger state for network participants, typed transactions
//! and time-bounded scan tasks:
//!
//! - **Identity registry**: caller identity to participant profile
//! - **Transaction type registry**: fixed-capacity set of allowed labels, owner-only
//! - **Transaction ledger**: append-only log keyed by (sequence id, participant)
//! - **Scan manager**: creator-owned tasks moving pending, in-progress, completed
//!
//! The host supplies the caller and the current block height for every call
//! through a [`CallContext`]. Every operation either commits fully or fails
//! with a [`LedgerError`] and leaves the state untouched.
//!
//! # Example
//!
//! ```
//! use scan_ledger::{CallContext, LedgerConfig, LedgerState};
//!
//! let mut ledger = LedgerState::new(&LedgerConfig::default())?;
//! let ctx = CallContext::new("SP1ALICE", 100);
//!
//! ledger.register(&ctx, "Alice")?;
//! let tx_id = ledger.log_transaction(&ctx, "transfer", 5_000, Some("rent"))?;
//! let scan_id = ledger.create_scan(&ctx, "sweep", "large transfers", 100, 200)?;
//! ledger.start_scan(&ctx, scan_id)?;
//!
//! assert_eq!(tx_id, 1);
//! assert!(ledger.is_live(scan_id));
//! # Ok::<(), scan_ledger::LedgerError>(())
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod scans;
pub mod service;
pub mod state;
pub mod transactions;
pub mod tx_types;
pub mod types;

// Re-export main types
pub use config::{LedgerConfig, TxTypeConfig};
pub use error::{LedgerError, Result};
pub use identity::IdentityRegistry;
pub use scans::ScanManager;
pub use service::Ledger;
pub use state::LedgerState;
pub use transactions::TransactionLedger;
pub use tx_types::TypeRegistry;
pub use types::*;
