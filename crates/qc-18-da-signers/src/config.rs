//! # Configuration
//!
//! Defaults plus `QC_DA_*` environment overrides.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `QC_DA_CHAIN_ID` | `chain_id` |
//! | `QC_DA_AUTHORITY` | `authority` |
//! | `QC_DA_GENESIS` | path to a JSON [`GenesisState`] |

use crate::adapters::FixedAuthority;
use crate::domain::GenesisState;
use crate::error::{DaSignersError, DaSignersResult};
use tracing::{info, warn};

/// DA Signers configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaSignersConfig {
    /// Chain id bound into every registration signature
    pub chain_id: u64,
    /// Address allowed to change parameters
    pub authority: String,
    /// State written on first start
    pub genesis: GenesisState,
}

impl Default for DaSignersConfig {
    fn default() -> Self {
        Self {
            chain_id: 8888,
            authority: "gov".to_string(),
            genesis: GenesisState::default(),
        }
    }
}

impl DaSignersConfig {
    pub fn validate(&self) -> DaSignersResult<()> {
        if self.authority.is_empty() {
            return Err(DaSignersError::InvalidParams {
                reason: "authority must not be empty".to_string(),
            });
        }
        self.genesis.validate()
    }

    /// Authority predicate for the configured address.
    pub fn authority_check(&self) -> FixedAuthority {
        FixedAuthority::new(self.authority.clone())
    }

    /// Defaults overridden from the environment.
    pub fn from_env() -> DaSignersResult<Self> {
        let mut config = Self::default();

        if let Ok(chain_id) = std::env::var("QC_DA_CHAIN_ID") {
            match chain_id.parse() {
                Ok(id) => config.chain_id = id,
                Err(_) => warn!("[qc-18] Ignoring invalid QC_DA_CHAIN_ID: {}", chain_id),
            }
        }

        if let Ok(authority) = std::env::var("QC_DA_AUTHORITY") {
            config.authority = authority;
        }

        if let Ok(path) = std::env::var("QC_DA_GENESIS") {
            let raw = std::fs::read_to_string(&path).map_err(|e| DaSignersError::InvalidGenesis {
                reason: format!("{}: {}", path, e),
            })?;
            config.genesis = Self::genesis_from_json(&raw)?;
            info!("[qc-18] Loaded genesis from {}", path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON genesis document.
    pub fn genesis_from_json(raw: &str) -> DaSignersResult<GenesisState> {
        serde_json::from_str(raw).map_err(|e| DaSignersError::InvalidGenesis {
            reason: e.to_string(),
        })
    }
}
