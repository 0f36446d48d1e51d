//! Configuration for a ledger instance.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::types::MAX_TX_TYPE_LEN;

/// Default number of slots in the transaction type registry.
pub const DEFAULT_TYPE_CAPACITY: usize = 9;

/// Labels the type registry starts with.
pub const DEFAULT_TX_TYPES: [&str; 5] = ["transfer", "contract-call", "vote", "stake", "swap"];

/// Configuration for a [`LedgerState`](crate::LedgerState).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The contract's own identity; the owner of the type registry
    pub contract_identity: String,
    /// Type registry settings
    pub tx_types: TxTypeConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_identity: "SP000000000000000000002Q6VF78.scan-ledger".to_string(),
            tx_types: TxTypeConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Create a new config with the given contract identity.
    pub fn new(contract_identity: impl Into<String>) -> Self {
        Self {
            contract_identity: contract_identity.into(),
            ..Default::default()
        }
    }

    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Check that the config can seed a ledger.
    pub fn validate(&self) -> Result<()> {
        if self.contract_identity.trim().is_empty() {
            return Err(LedgerError::Config(
                "contract_identity must not be empty".to_string(),
            ));
        }

        let types = &self.tx_types;
        if types.capacity == 0 {
            return Err(LedgerError::Config("type capacity must be at least 1".to_string()));
        }
        if types.seed.len() > types.capacity {
            return Err(LedgerError::Config(format!(
                "{} seeded types exceed capacity {}",
                types.seed.len(),
                types.capacity
            )));
        }
        for label in &types.seed {
            if label.is_empty() || label.chars().count() > MAX_TX_TYPE_LEN {
                return Err(LedgerError::Config(format!(
                    "seeded type label {label:?} must be 1-{MAX_TX_TYPE_LEN} characters"
                )));
            }
        }

        Ok(())
    }
}

/// Type registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxTypeConfig {
    /// Maximum number of labels
    pub capacity: usize,
    /// Initial labels, in order
    pub seed: Vec<String>,
}

impl Default for TxTypeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_TYPE_CAPACITY,
            seed: DEFAULT_TX_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.tx_types.capacity, 9);
        assert_eq!(config.tx_types.seed[0], "transfer");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = LedgerConfig::new("SP1TEST.scan-ledger");
        let yaml = config.to_yaml().unwrap();
        let parsed = LedgerConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_rejects_overfull_seed() {
        let yaml = r#"
contract_identity: SP1TEST.scan-ledger
tx_types:
  capacity: 2
  seed: [transfer, vote, stake]
"#;
        let err = LedgerConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_rejects_empty_identity() {
        let config = LedgerConfig::new("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_label() {
        let mut config = LedgerConfig::default();
        config.tx_types.seed.push("x".repeat(MAX_TX_TYPE_LEN + 1));
        assert!(config.validate().is_err());
    }
}
