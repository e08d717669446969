//! Error types for the DA Signers subsystem

use thiserror::Error;

/// Coarse classification of a failure, used by the host to decide whether a
/// failed call is an ordinary rejected transaction or aborts the whole block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any state access
    Validation,
    /// Unknown signer, quorum or row
    NotFound,
    /// Caller is not allowed to perform the operation
    Authorization,
    /// Configuration or accounting bug; fatal to the block
    StateInvariant,
}

/// DA Signers subsystem errors
#[derive(Debug, Error)]
pub enum DaSignersError {
    /// Account already has a signer record
    #[error("Signer already exists: {account}")]
    SignerExists { account: String },

    /// No signer record for the account
    #[error("Signer not found: {account}")]
    SignerNotFound { account: String },

    /// Account has no bonded stake
    #[error("Insufficient bonded stake for {account}")]
    InsufficientStake { account: String },

    /// Signature failed the pairing check or is malformed
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// Public key encoding is malformed, off-curve or the identity
    #[error("Invalid public key: {reason}")]
    InvalidPubkey { reason: String },

    /// Quorum id beyond the quorum count of the epoch
    #[error("Quorum id {quorum_id} out of bound for epoch {epoch} ({quorum_count} quorums)")]
    QuorumIdOutOfBound {
        epoch: u64,
        quorum_id: u64,
        quorum_count: u64,
    },

    /// Row index beyond the quorum width
    #[error("Row index {row_index} out of bound ({encoded_slices} rows)")]
    RowIndexOutOfBound { row_index: u64, encoded_slices: u64 },

    /// Bitmap does not cover exactly the rows of a quorum
    #[error("Quorum bitmap length mismatch: expected {expected} bytes, got {actual}")]
    QuorumBitmapLengthMismatch { expected: usize, actual: usize },

    /// No quorum set has been committed for the epoch
    #[error("No quorum set for epoch {epoch}")]
    EpochNotFound { epoch: u64 },

    /// Message was not authorized by the required account
    #[error("Unauthorized: expected {expected}, got {actual}")]
    Unauthorized { expected: String, actual: String },

    /// Account is not 40 hex characters
    #[error("Invalid account: {account}")]
    InvalidAccount { account: String },

    /// Parameter set violates the positivity invariant
    #[error("Invalid params: {reason}")]
    InvalidParams { reason: String },

    /// Sum of ballots does not fit in u64
    #[error("Ballot sum overflow at epoch {epoch}")]
    BallotOverflow { epoch: u64 },

    /// Quorum width is zero
    #[error("Encoded slices must be positive")]
    ZeroEncodedSlices,

    /// Epoch length is zero
    #[error("Epoch blocks must be positive")]
    ZeroEpochBlocks,

    /// Rows of one epoch exceed the placement limit
    #[error("Epoch {epoch} needs {rows} rows, limit is {limit}")]
    RowLimitExceeded { epoch: u64, rows: u128, limit: u64 },

    /// Key-value store failure
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    /// Record could not be encoded or decoded
    #[error("Codec error: {reason}")]
    Codec { reason: String },

    /// Genesis state failed validation
    #[error("Invalid genesis: {reason}")]
    InvalidGenesis { reason: String },
}

impl DaSignersError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DaSignersError::InvalidSignature { .. }
            | DaSignersError::InvalidPubkey { .. }
            | DaSignersError::InvalidAccount { .. }
            | DaSignersError::InvalidParams { .. }
            | DaSignersError::QuorumBitmapLengthMismatch { .. }
            | DaSignersError::InsufficientStake { .. }
            | DaSignersError::SignerExists { .. }
            | DaSignersError::InvalidGenesis { .. } => ErrorKind::Validation,
            DaSignersError::SignerNotFound { .. }
            | DaSignersError::QuorumIdOutOfBound { .. }
            | DaSignersError::RowIndexOutOfBound { .. }
            | DaSignersError::EpochNotFound { .. } => ErrorKind::NotFound,
            DaSignersError::Unauthorized { .. } => ErrorKind::Authorization,
            DaSignersError::BallotOverflow { .. }
            | DaSignersError::ZeroEncodedSlices
            | DaSignersError::ZeroEpochBlocks
            | DaSignersError::RowLimitExceeded { .. }
            | DaSignersError::Storage { .. }
            | DaSignersError::Codec { .. } => ErrorKind::StateInvariant,
        }
    }

    /// Short snake_case name, used as a metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            DaSignersError::SignerExists { .. } => "signer_exists",
            DaSignersError::SignerNotFound { .. } => "signer_not_found",
            DaSignersError::InsufficientStake { .. } => "insufficient_stake",
            DaSignersError::InvalidSignature { .. } => "invalid_signature",
            DaSignersError::InvalidPubkey { .. } => "invalid_pubkey",
            DaSignersError::QuorumIdOutOfBound { .. } => "quorum_id_out_of_bound",
            DaSignersError::RowIndexOutOfBound { .. } => "row_index_out_of_bound",
            DaSignersError::QuorumBitmapLengthMismatch { .. } => "quorum_bitmap_length_mismatch",
            DaSignersError::EpochNotFound { .. } => "epoch_not_found",
            DaSignersError::Unauthorized { .. } => "unauthorized",
            DaSignersError::InvalidAccount { .. } => "invalid_account",
            DaSignersError::InvalidParams { .. } => "invalid_params",
            DaSignersError::BallotOverflow { .. } => "ballot_overflow",
            DaSignersError::ZeroEncodedSlices => "zero_encoded_slices",
            DaSignersError::ZeroEpochBlocks => "zero_epoch_blocks",
            DaSignersError::RowLimitExceeded { .. } => "row_limit_exceeded",
            DaSignersError::Storage { .. } => "storage",
            DaSignersError::Codec { .. } => "codec",
            DaSignersError::InvalidGenesis { .. } => "invalid_genesis",
        }
    }

    /// True if the error must abort the enclosing block.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::StateInvariant
    }
}

/// Result type for DA Signers operations
pub type DaSignersResult<T> = Result<T, DaSignersError>;
