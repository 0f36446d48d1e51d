//! Identity registry: caller identity to participant profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{BlockHeight, CallContext, DisplayName, Identity, Participant};

/// Participant profiles keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistry {
    participants: BTreeMap<Identity, Participant>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the caller's profile.
    ///
    /// Replacement is total: a re-registration drops the previous
    /// `last_activity` and resets `total_scans`.
    pub fn register(&mut self, ctx: &CallContext, display_name: DisplayName) {
        let replaced = self.participants.insert(
            ctx.caller.clone(),
            Participant {
                display_name,
                registered_at: ctx.block_height,
                total_scans: 0,
                last_activity: None,
            },
        );

        info!(
            participant = %ctx.caller,
            height = ctx.block_height,
            replaced = replaced.is_some(),
            "Registered participant"
        );
    }

    pub fn get(&self, identity: &Identity) -> Option<&Participant> {
        self.participants.get(identity)
    }

    /// Record activity for a registered participant. Unknown identities are skipped.
    pub(crate) fn touch(&mut self, identity: &Identity, height: BlockHeight) {
        match self.participants.get_mut(identity) {
            Some(participant) => participant.last_activity = Some(height),
            None => debug!(participant = %identity, "No profile to update, skipping"),
        }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Identity, &Participant)> {
        self.participants.iter()
    }
}
