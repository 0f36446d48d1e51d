//! Transaction type registry.
//!
//! A small ordered set of allowed type labels with a fixed capacity. Only
//! the contract's own identity may append to it, which in practice means a
//! self-call: ordinary external callers always fail the owner check.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::TxTypeConfig;
use crate::error::{LedgerError, Result};
use crate::types::{CallContext, Identity, TxTypeLabel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    /// The only identity allowed to append
    owner: Identity,
    capacity: usize,
    labels: Vec<TxTypeLabel>,
}

impl TypeRegistry {
    /// Build a registry from config. The config is expected to be validated.
    pub fn from_config(owner: Identity, config: &TxTypeConfig) -> Result<Self> {
        let labels = config
            .seed
            .iter()
            .map(|label| TxTypeLabel::new(label.as_str()))
            .collect::<Result<Vec<_>>>()?;

        if labels.len() > config.capacity {
            return Err(LedgerError::Config(format!(
                "{} seeded types exceed capacity {}",
                labels.len(),
                config.capacity
            )));
        }

        Ok(Self {
            owner,
            capacity: config.capacity,
            labels,
        })
    }

    /// Append a label; duplicates are not filtered.
    ///
    /// The caller must already have passed [`TypeRegistry::authorize`].
    pub(crate) fn add(&mut self, label: TxTypeLabel) -> Result<()> {
        if self.labels.len() >= self.capacity {
            return Err(LedgerError::InvalidParameters(format!(
                "type registry is at capacity ({})",
                self.capacity
            )));
        }

        info!(label = %label, size = self.labels.len() + 1, "Added transaction type");
        self.labels.push(label);
        Ok(())
    }

    /// Owner check: the caller must be the contract itself.
    pub fn authorize(&self, ctx: &CallContext) -> Result<()> {
        if ctx.caller != self.owner {
            warn!(caller = %ctx.caller, "Rejected type registry change from non-owner");
            return Err(LedgerError::NotAuthorized(format!(
                "{} is not the registry owner",
                ctx.caller
            )));
        }
        Ok(())
    }

    /// Reject restored contents that could not have been produced by `add`.
    pub(crate) fn check_consistency(&self) -> Result<()> {
        if self.labels.len() > self.capacity {
            return Err(LedgerError::InvalidSnapshot(format!(
                "{} type labels exceed capacity {}",
                self.labels.len(),
                self.capacity
            )));
        }
        Ok(())
    }

    /// Membership test against the current set.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == label)
    }

    pub fn labels(&self) -> &[TxTypeLabel] {
        &self.labels
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
