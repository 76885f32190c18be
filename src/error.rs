// Error types for genesis construction and verification

use thiserror::Error;

/// Errors raised while building, mining or verifying a genesis block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    /// OP_RETURN payloads of 0x4c bytes or more need OP_PUSHDATA1
    #[error("OP_RETURN payload too long: {len} bytes (max {max})", max = crate::core::MAX_OP_RETURN_PUSH)]
    OpReturnTooLong { len: usize },

    /// Compact target has the sign bit set
    #[error("negative compact target 0x{bits:08x}")]
    NegativeTarget { bits: u32 },

    /// Compact target does not fit in 256 bits
    #[error("compact target 0x{bits:08x} overflows 256 bits")]
    TargetOverflow { bits: u32 },

    /// Compact target decodes to zero
    #[error("compact target 0x{bits:08x} is zero")]
    ZeroTarget { bits: u32 },

    /// Compact target is easier than the network allows
    #[error("compact target 0x{bits:08x} is above the proof-of-work limit")]
    TargetAboveLimit { bits: u32 },

    /// Nonce search bounds leave nothing to hash
    #[error("empty nonce range: start {start} is not below limit {end}")]
    EmptyNonceRange { start: u32, end: u64 },

    /// Network name not present in the profile table
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// Recomputed genesis value differs from the hard-coded one
    #[error("{network}: {field} mismatch (expected {expected}, got {actual})")]
    GenesisMismatch {
        network: String,
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// Malformed hex hash literal
    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

pub type Result<T> = std::result::Result<T, GenesisError>;
