//! Scan manager.
//!
//! Scans move `pending -> in-progress -> completed`. Only the identity that
//! created a scan may advance it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::types::{BlockHeight, CallContext, Scan, ScanDescription, ScanName, ScanStatus, SequenceId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanManager {
    /// Last issued id; 0 before the first scan
    counter: SequenceId,
    scans: BTreeMap<SequenceId, Scan>,
}

impl ScanManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending scan owned by the caller.
    ///
    /// The range must be non-empty and must not start before the current height.
    pub fn create(
        &mut self,
        ctx: &CallContext,
        name: ScanName,
        description: ScanDescription,
        start_height: BlockHeight,
        end_height: BlockHeight,
    ) -> Result<SequenceId> {
        if start_height >= end_height || start_height < ctx.block_height {
            return Err(LedgerError::InvalidBlockRange {
                start: start_height,
                end: end_height,
                current: ctx.block_height,
            });
        }

        let id = self
            .counter
            .checked_add(1)
            .ok_or_else(|| LedgerError::InvalidParameters("scan counter exhausted".to_string()))?;
        self.scans.insert(
            id,
            Scan {
                name,
                description,
                creator: ctx.caller.clone(),
                start_height,
                end_height,
                total_transactions: 0,
                status: ScanStatus::Pending,
                active: true,
            },
        );
        self.counter = id;

        info!(
            scan_id = id,
            creator = %ctx.caller,
            start_height,
            end_height,
            "Created scan"
        );
        Ok(id)
    }

    /// Move a scan to `in-progress`.
    ///
    /// Starting an in-progress scan again is a no-op success. A completed
    /// scan cannot be restarted.
    pub fn start(&mut self, ctx: &CallContext, scan_id: SequenceId) -> Result<()> {
        let scan = self.owned_mut(ctx, scan_id)?;
        if scan.status == ScanStatus::Completed {
            return Err(LedgerError::ScanAlreadyCompleted(scan_id));
        }

        scan.status = ScanStatus::InProgress;
        info!(scan_id, creator = %ctx.caller, "Started scan");
        Ok(())
    }

    /// Move an in-progress scan to `completed`.
    pub fn complete(&mut self, ctx: &CallContext, scan_id: SequenceId) -> Result<()> {
        let scan = self.owned_mut(ctx, scan_id)?;
        match scan.status {
            ScanStatus::Pending => return Err(LedgerError::ScanNotStarted(scan_id)),
            ScanStatus::Completed => return Err(LedgerError::ScanAlreadyCompleted(scan_id)),
            ScanStatus::InProgress => {}
        }

        scan.status = ScanStatus::Completed;
        info!(scan_id, creator = %ctx.caller, "Completed scan");
        Ok(())
    }

    pub fn get(&self, scan_id: SequenceId) -> Option<&Scan> {
        self.scans.get(&scan_id)
    }

    /// Whether the scan exists and is live (in progress and active).
    pub fn is_live(&self, scan_id: SequenceId) -> bool {
        self.scans.get(&scan_id).is_some_and(Scan::is_live)
    }

    /// Reject restored contents whose counter lags behind a stored id.
    pub(crate) fn check_consistency(&self) -> Result<()> {
        if let Some(&max_id) = self.scans.keys().next_back() {
            if max_id > self.counter {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "scan counter {} is behind stored id {}",
                    self.counter, max_id
                )));
            }
        }
        Ok(())
    }

    /// Last issued scan id.
    pub fn counter(&self) -> SequenceId {
        self.counter
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&SequenceId, &Scan)> {
        self.scans.iter()
    }

    /// Look up a scan for mutation, checking the caller is its creator.
    fn owned_mut(&mut self, ctx: &CallContext, scan_id: SequenceId) -> Result<&mut Scan> {
        let scan = self
            .scans
            .get_mut(&scan_id)
            .ok_or(LedgerError::ScanNotFound(scan_id))?;

        if scan.creator != ctx.caller {
            warn!(
                scan_id,
                caller = %ctx.caller,
                creator = %scan.creator,
                "Rejected scan transition from non-creator"
            );
            return Err(LedgerError::NotAuthorized(format!(
                "{} did not create scan {}",
                ctx.caller, scan_id
            )));
        }

        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(manager: &mut ScanManager, ctx: &CallContext, start: u64, end: u64) -> Result<u64> {
        manager.create(
            ctx,
            ScanName::new("mempool sweep").unwrap(),
            ScanDescription::new("watch for large transfers").unwrap(),
            start,
            end,
        )
    }

    #[test]
    fn test_create_sets_defaults() {
        let mut manager = ScanManager::new();
        let ctx = CallContext::new("SP1ALICE", 10);
        let id = create(&mut manager, &ctx, 10, 20).unwrap();
        assert_eq!(id, 1);

        let scan = manager.get(id).unwrap();
        assert_eq!(scan.creator, ctx.caller);
        assert_eq!(scan.status, ScanStatus::Pending);
        assert!(scan.active);
        assert_eq!(scan.total_transactions, 0);
        assert!(!manager.is_live(id));
    }

    #[test]
    fn test_range_rules() {
        let mut manager = ScanManager::new();
        let ctx = CallContext::new("SP1ALICE", 10);

        // empty range
        assert!(matches!(
            create(&mut manager, &ctx, 15, 15),
            Err(LedgerError::InvalidBlockRange { .. })
        ));
        // start already passed
        assert!(matches!(
            create(&mut manager, &ctx, 9, 15),
            Err(LedgerError::InvalidBlockRange { .. })
        ));
        assert_eq!(manager.counter(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_lifecycle() {
        let mut manager = ScanManager::new();
        let ctx = CallContext::new("SP1ALICE", 1);
        let id = create(&mut manager, &ctx, 5, 50).unwrap();

        assert!(matches!(
            manager.complete(&ctx, id),
            Err(LedgerError::ScanNotStarted(_))
        ));

        manager.start(&ctx, id).unwrap();
        assert!(manager.is_live(id));
        // restarting is harmless
        manager.start(&ctx, id).unwrap();

        manager.complete(&ctx, id).unwrap();
        let scan = manager.get(id).unwrap();
        assert_eq!(scan.status, ScanStatus::Completed);
        assert!(scan.active);
        assert!(!manager.is_live(id));

        assert!(matches!(
            manager.complete(&ctx, id),
            Err(LedgerError::ScanAlreadyCompleted(_))
        ));
        assert!(matches!(
            manager.start(&ctx, id),
            Err(LedgerError::ScanAlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_only_creator_may_advance() {
        let mut manager = ScanManager::new();
        let alice = CallContext::new("SP1ALICE", 1);
        let bob = CallContext::new("SP2BOB", 1);
        let id = create(&mut manager, &alice, 5, 50).unwrap();

        assert!(matches!(
            manager.start(&bob, id),
            Err(LedgerError::NotAuthorized(_))
        ));
        assert_eq!(manager.get(id).unwrap().status, ScanStatus::Pending);

        manager.start(&alice, id).unwrap();
        assert!(matches!(
            manager.complete(&bob, id),
            Err(LedgerError::NotAuthorized(_))
        ));
        assert_eq!(manager.get(id).unwrap().status, ScanStatus::InProgress);
    }

    #[test]
    fn test_exhausted_counter_is_an_error() {
        let mut manager = ScanManager::new();
        manager.counter = SequenceId::MAX;
        let ctx = CallContext::new("SP1ALICE", 1);

        assert!(matches!(
            create(&mut manager, &ctx, 5, 50),
            Err(LedgerError::InvalidParameters(_))
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_consistency_detects_lagging_counter() {
        let mut manager = ScanManager::new();
        let ctx = CallContext::new("SP1ALICE", 1);
        create(&mut manager, &ctx, 5, 50).unwrap();
        assert!(manager.check_consistency().is_ok());

        manager.counter = 0;
        assert!(matches!(
            manager.check_consistency(),
            Err(LedgerError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_missing_scan() {
        let mut manager = ScanManager::new();
        let ctx = CallContext::new("SP1ALICE", 1);
        assert!(matches!(
            manager.start(&ctx, 3),
            Err(LedgerError::ScanNotFound(3))
        ));
        assert!(!manager.is_live(3));
    }
}
