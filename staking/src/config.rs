//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use vault_types::{AccountId, Timestamp};

use crate::LedgerError;

/// Configuration for a staking ledger.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Account that holds staked units. The ledger does not pass it to
    /// custody; the injected custody must be built for this same account.
    #[serde(default = "default_custodian")]
    pub custodian: AccountId,

    /// Start of the initial staking condition.
    #[serde(default)]
    pub genesis: Timestamp,

    /// Time unit of the initial staking condition, in seconds.
    #[serde(default = "default_time_unit")]
    pub initial_time_unit: u64,

    /// Reward per staked unit per time unit under the initial condition.
    #[serde(default)]
    pub initial_reward_rate: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_custodian() -> AccountId {
    AccountId::new("vault")
}

fn default_time_unit() -> u64 {
    1
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, LedgerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LedgerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.initial_time_unit == 0 {
            return Err(LedgerError::Config(
                "initial_time_unit must be non-zero".to_string(),
            ));
        }
        if !self.custodian.is_valid() {
            return Err(LedgerError::Config(format!(
                "invalid custodian account: {:?}",
                self.custodian.as_str()
            )));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            custodian: default_custodian(),
            genesis: Timestamp::EPOCH,
            initial_time_unit: default_time_unit(),
            initial_reward_rate: 0,
        }
    }
}
