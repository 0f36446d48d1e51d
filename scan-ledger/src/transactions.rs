//! Append-only transaction ledger.
//!
//! Records are keyed by `(sequence id, participant)`. Ids come from one
//! global counter shared by every participant, so they are unique ledger-wide,
//! yet a lookup still needs both halves of the key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::types::{BlockHeight, Identity, Note, SequenceId, Transaction, TxKey, TxTypeLabel, Volume};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLedger {
    /// Last issued id; 0 before the first transaction
    counter: SequenceId,
    #[serde(with = "entries")]
    records: BTreeMap<TxKey, Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id and store the record under it in one step.
    ///
    /// Type validation happens before this is called. The only failure is
    /// an exhausted counter, which leaves the ledger unchanged.
    pub(crate) fn append(
        &mut self,
        participant: &Identity,
        tx_type: TxTypeLabel,
        volume: Volume,
        note: Option<Note>,
        height: BlockHeight,
    ) -> Result<SequenceId> {
        let id = self.counter.checked_add(1).ok_or_else(|| {
            LedgerError::InvalidParameters("transaction counter exhausted".to_string())
        })?;
        self.records.insert(
            TxKey {
                id,
                participant: participant.clone(),
            },
            Transaction {
                tx_type,
                volume,
                created_at: height,
                note,
            },
        );
        self.counter = id;
        Ok(id)
    }

    pub fn get(&self, id: SequenceId, participant: &Identity) -> Option<&Transaction> {
        let key = TxKey {
            id,
            participant: participant.clone(),
        };
        let found = self.records.get(&key);
        if found.is_none() {
            debug!(tx_id = id, participant = %participant, "Transaction lookup miss");
        }
        found
    }

    /// Reject restored contents whose counter lags behind a stored id.
    ///
    /// Such a counter would hand out an existing id and overwrite its record.
    pub(crate) fn check_consistency(&self) -> Result<()> {
        if let Some(max_id) = self.records.keys().map(|k| k.id).max() {
            if max_id > self.counter {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "transaction counter {} is behind stored id {}",
                    self.counter, max_id
                )));
            }
        }
        Ok(())
    }

    /// Last issued transaction id.
    pub fn counter(&self) -> SequenceId {
        self.counter
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&TxKey, &Transaction)> {
        self.records.iter()
    }
}

/// JSON object keys must be strings, so the map is stored as a list of entries.
mod entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::{Transaction, TxKey};

    #[derive(Serialize)]
    struct EntryRef<'a> {
        key: &'a TxKey,
        record: &'a Transaction,
    }

    #[derive(Deserialize)]
    struct Entry {
        key: TxKey,
        record: Transaction,
    }

    pub fn serialize<S: Serializer>(
        records: &BTreeMap<TxKey, Transaction>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            records
                .iter()
                .map(|(key, record)| EntryRef { key, record }),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<TxKey, Transaction>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.key, e.record)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> TxTypeLabel {
        TxTypeLabel::new("transfer").unwrap()
    }

    #[test]
    fn test_ids_are_global() {
        let mut ledger = TransactionLedger::new();
        let alice = Identity::new("SP1ALICE");
        let bob = Identity::new("SP2BOB");

        assert_eq!(ledger.append(&alice, transfer(), 10, None, 1).unwrap(), 1);
        assert_eq!(ledger.append(&bob, transfer(), 20, None, 1).unwrap(), 2);
        assert_eq!(ledger.append(&alice, transfer(), 30, None, 2).unwrap(), 3);
        assert_eq!(ledger.counter(), 3);
    }

    #[test]
    fn test_lookup_needs_matching_participant() {
        let mut ledger = TransactionLedger::new();
        let alice = Identity::new("SP1ALICE");
        let bob = Identity::new("SP2BOB");

        let id = ledger
            .append(&alice, transfer(), 500, Some(Note::new("rent").unwrap()), 12)
            .unwrap();

        let tx = ledger.get(id, &alice).unwrap();
        assert_eq!(tx.volume, 500);
        assert_eq!(tx.created_at, 12);
        assert_eq!(tx.note.as_ref().unwrap().as_str(), "rent");

        assert!(ledger.get(id, &bob).is_none());
        assert!(ledger.get(id + 1, &alice).is_none());
    }

    #[test]
    fn test_exhausted_counter_is_an_error() {
        let mut ledger = TransactionLedger::new();
        ledger.counter = SequenceId::MAX;

        let err = ledger
            .append(&Identity::new("SP1ALICE"), transfer(), 1, None, 1)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParameters(_)));
        assert!(ledger.is_empty());
        assert_eq!(ledger.counter(), SequenceId::MAX);
    }

    #[test]
    fn test_consistency_detects_lagging_counter() {
        let mut ledger = TransactionLedger::new();
        let alice = Identity::new("SP1ALICE");
        ledger.append(&alice, transfer(), 1, None, 1).unwrap();
        ledger.append(&alice, transfer(), 2, None, 1).unwrap();
        assert!(ledger.check_consistency().is_ok());

        ledger.counter = 1;
        assert!(matches!(
            ledger.check_consistency(),
            Err(LedgerError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip_keeps_keys() {
        let mut ledger = TransactionLedger::new();
        ledger
            .append(&Identity::new("SP1ALICE"), transfer(), u128::MAX, None, 3)
            .unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: TransactionLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
    }
}
