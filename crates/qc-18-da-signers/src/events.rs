//! Events emitted by the DA Signers subsystem.

use crate::domain::{Params, Signer};
use serde::{Deserialize, Serialize};

/// Outgoing events, published through [`crate::ports::outbound::EventSink`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaSignersEvent {
    /// A signer was registered or changed its socket
    SignerUpdated {
        account: String,
        socket: String,
        /// Hex encoded
        pubkey_g1: String,
        /// Hex encoded
        pubkey_g2: String,
    },
    /// Governance replaced the parameters
    ParamsUpdated { block_height: u64, params: Params },
    /// A new quorum set was committed
    EpochRotated {
        epoch: u64,
        quorum_count: u64,
        block_height: u64,
    },
}

impl DaSignersEvent {
    pub fn signer_updated(signer: &Signer) -> Self {
        DaSignersEvent::SignerUpdated {
            account: signer.account.to_string(),
            socket: signer.socket.clone(),
            pubkey_g1: hex::encode(signer.pubkey_g1),
            pubkey_g2: hex::encode(signer.pubkey_g2),
        }
    }

    /// Event type name.
    pub fn name(&self) -> &'static str {
        match self {
            DaSignersEvent::SignerUpdated { .. } => "update_signer",
            DaSignersEvent::ParamsUpdated { .. } => "update_params",
            DaSignersEvent::EpochRotated { .. } => "new_epoch",
        }
    }
}
