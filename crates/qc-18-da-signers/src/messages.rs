//! # Messages
//!
//! Transactions handled by the subsystem. `validate_basic` performs the
//! stateless checks; the service runs them before touching the store.

use crate::domain::{Account, G1Bytes, Params, Signer};
use crate::error::{DaSignersError, DaSignersResult};
use serde::{Deserialize, Serialize};

fn parse_signature(bytes: &[u8]) -> DaSignersResult<G1Bytes> {
    bytes
        .try_into()
        .map_err(|_| DaSignersError::InvalidSignature {
            reason: format!("signature must be 64 bytes, got {}", bytes.len()),
        })
}

/// Register a new signer with a proof of key ownership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterSigner {
    pub signer: Signer,
    /// Signature over the pubkey registration hash
    pub signature: Vec<u8>,
}

impl MsgRegisterSigner {
    pub fn new(signer: Signer, signature: G1Bytes) -> Self {
        Self {
            signer,
            signature: signature.to_vec(),
        }
    }

    pub fn validate_basic(&self) -> DaSignersResult<()> {
        self.signature_bytes().map(|_| ())
    }

    pub fn signature_bytes(&self) -> DaSignersResult<G1Bytes> {
        parse_signature(&self.signature)
    }

    pub fn signers(&self) -> Vec<String> {
        vec![self.signer.account.to_string()]
    }
}

/// Change the socket of an existing signer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateSocket {
    pub account: String,
    pub socket: String,
}

impl MsgUpdateSocket {
    pub fn validate_basic(&self) -> DaSignersResult<()> {
        self.account().map(|_| ())
    }

    pub fn account(&self) -> DaSignersResult<Account> {
        Account::parse(&self.account)
    }

    pub fn signers(&self) -> Vec<String> {
        vec![self.account.clone()]
    }
}

/// Declare availability for the next epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterNextEpoch {
    pub account: String,
    /// Signature over the epoch registration hash of `current + 1`
    pub signature: Vec<u8>,
}

impl MsgRegisterNextEpoch {
    pub fn validate_basic(&self) -> DaSignersResult<()> {
        self.account()?;
        self.signature_bytes().map(|_| ())
    }

    pub fn account(&self) -> DaSignersResult<Account> {
        Account::parse(&self.account)
    }

    pub fn signature_bytes(&self) -> DaSignersResult<G1Bytes> {
        parse_signature(&self.signature)
    }

    pub fn signers(&self) -> Vec<String> {
        vec![self.account.clone()]
    }
}

/// Replace the module parameters. Governance only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgChangeParams {
    pub authority: String,
    pub params: Params,
}

impl MsgChangeParams {
    pub fn validate_basic(&self) -> DaSignersResult<()> {
        if self.authority.is_empty() {
            return Err(DaSignersError::Unauthorized {
                expected: "governance authority".to_string(),
                actual: String::new(),
            });
        }
        self.params.validate()
    }

    pub fn signers(&self) -> Vec<String> {
        vec![self.authority.clone()]
    }
}
