//! Genesis state.

use super::bn254::{deserialize_g1, deserialize_g2};
use super::entities::{QuorumSet, Signer};
use super::params::Params;
use crate::error::{DaSignersError, DaSignersResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Both key encodings must decode to non-identity points.
fn validate_signer_keys(signer: &Signer) -> DaSignersResult<()> {
    let invalid = |what: &str, detail: String| DaSignersError::InvalidGenesis {
        reason: format!("signer {} has invalid {} key: {}", signer.account, what, detail),
    };
    let g1 = deserialize_g1(&signer.pubkey_g1).map_err(|e| invalid("G1", e.to_string()))?;
    let g2 = deserialize_g2(&signer.pubkey_g2).map_err(|e| invalid("G2", e.to_string()))?;
    if g1.infinity || g2.infinity {
        return Err(invalid("identity", "point at infinity".to_string()));
    }
    Ok(())
}

/// Complete module state at chain start or export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    pub epoch_number: u64,
    pub signers: Vec<Signer>,
    /// Quorum sets for every epoch from 0 to `epoch_number`
    pub quorums_by_epoch: Vec<QuorumSet>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            epoch_number: 0,
            signers: Vec::new(),
            quorums_by_epoch: vec![QuorumSet::default()],
        }
    }
}

impl GenesisState {
    pub fn validate(&self) -> DaSignersResult<()> {
        self.params
            .validate()
            .map_err(|e| DaSignersError::InvalidGenesis {
                reason: e.to_string(),
            })?;

        let expected = self.epoch_number.checked_add(1);
        if expected != Some(self.quorums_by_epoch.len() as u64) {
            return Err(DaSignersError::InvalidGenesis {
                reason: format!(
                    "expected {} quorum sets for epoch {}, got {}",
                    self.epoch_number.saturating_add(1),
                    self.epoch_number,
                    self.quorums_by_epoch.len()
                ),
            });
        }

        let mut seen = BTreeSet::new();
        for signer in &self.signers {
            if !seen.insert(signer.account) {
                return Err(DaSignersError::InvalidGenesis {
                    reason: format!("duplicate signer {}", signer.account),
                });
            }
            validate_signer_keys(signer)?;
        }

        for (epoch, set) in self.quorums_by_epoch.iter().enumerate() {
            for quorum in &set.quorums {
                if let Some(unknown) = quorum.signers.iter().find(|a| !seen.contains(*a)) {
                    return Err(DaSignersError::InvalidGenesis {
                        reason: format!("quorum in epoch {} references unknown signer {}", epoch, unknown),
                    });
                }
            }
        }
        Ok(())
    }
}
