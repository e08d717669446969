//! # Domain Entities
//!
//! Signer identities, per-epoch registrations and committed quorum sets.

use super::bn254::{G1Bytes, G2Bytes};
use crate::error::{DaSignersError, DaSignersResult};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;
use std::str::FromStr;

/// 20-byte operator address.
///
/// Parsed from exactly 40 hex characters without a `0x` prefix and always
/// rendered in lowercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account(pub [u8; 20]);

impl Account {
    pub const LEN: usize = 20;

    /// Parse the canonical hex form.
    pub fn parse(s: &str) -> DaSignersResult<Self> {
        let invalid = || DaSignersError::InvalidAccount {
            account: s.to_string(),
        };

        if s.len() != Self::LEN * 2 {
            return Err(invalid());
        }
        let bytes = hex::decode(s).map_err(|_| invalid())?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Account(out))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Account {
    type Err = DaSignersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Account::parse(s)
    }
}

impl TryFrom<String> for Account {
    type Error = DaSignersError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Account::parse(&s)
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.to_string()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self)
    }
}

/// Registered DA signer.
///
/// Immutable after registration except for `socket`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub account: Account,
    /// Network address the signer serves from
    pub socket: String,
    #[serde_as(as = "Bytes")]
    pub pubkey_g1: G1Bytes,
    #[serde_as(as = "Bytes")]
    pub pubkey_g2: G2Bytes,
}

impl Signer {
    /// Build a signer from wire-level parts, checking account format and
    /// key lengths. Curve membership is checked at registration.
    pub fn from_parts(
        account: &str,
        socket: impl Into<String>,
        pubkey_g1: &[u8],
        pubkey_g2: &[u8],
    ) -> DaSignersResult<Self> {
        let account = Account::parse(account)?;
        let pubkey_g1: G1Bytes =
            pubkey_g1
                .try_into()
                .map_err(|_| DaSignersError::InvalidPubkey {
                    reason: format!("G1 key must be 64 bytes, got {}", pubkey_g1.len()),
                })?;
        let pubkey_g2: G2Bytes =
            pubkey_g2
                .try_into()
                .map_err(|_| DaSignersError::InvalidPubkey {
                    reason: format!("G2 key must be 128 bytes, got {}", pubkey_g2.len()),
                })?;

        Ok(Self {
            account,
            socket: socket.into(),
            pubkey_g1,
            pubkey_g2,
        })
    }
}

/// A signer's proof of availability for one epoch.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub epoch: u64,
    pub account: Account,
    #[serde_as(as = "Bytes")]
    pub signature: G1Bytes,
}

/// One quorum: exactly `encoded_slices` row assignments.
///
/// An account appears once per row it was allotted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quorum {
    pub signers: Vec<Account>,
}

impl Quorum {
    /// Number of rows held by `account`.
    pub fn rows_of(&self, account: &Account) -> usize {
        self.signers.iter().filter(|a| *a == account).count()
    }
}

/// All quorums committed for an epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumSet {
    pub quorums: Vec<Quorum>,
}

impl QuorumSet {
    pub fn quorum_count(&self) -> u64 {
        self.quorums.len() as u64
    }
}

/// Result of aggregating the attesting operators of a quorum.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatePubkey {
    /// Sum of the G1 keys of distinct attesting operators
    #[serde_as(as = "Bytes")]
    pub aggregate_pubkey_g1: G1Bytes,
    /// Rows in the quorum
    pub total: u64,
    /// Rows held by the attesting operators
    pub hit: u64,
}
