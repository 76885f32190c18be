// Proof of Work: compact target codec and hash/target comparison

use crate::core::Hash256;
use crate::error::{GenesisError, Result};
use std::cmp::Ordering;

/// Mantissa bits of a compact target (sign bit excluded)
const MANTISSA_MASK: u32 = 0x007fffff;
/// Sign bit of a compact target
const SIGN_BIT: u32 = 0x00800000;

/// Convert compact bits to a 32-byte big-endian target
/// Formula: target = mantissa * 256^(exponent - 3)
///
/// Mantissa bytes that would land above bit 255 are dropped.
pub fn bits_to_target(bits: u32) -> [u8; 32] {
    let exponent = (bits >> 24) as usize;
    let mantissa = bits & MANTISSA_MASK;

    let mut target = [0u8; 32];

    if exponent <= 3 {
        let value = mantissa >> (8 * (3 - exponent));
        target[28..].copy_from_slice(&value.to_be_bytes());
    } else {
        let mantissa_bytes = mantissa.to_be_bytes();
        for (i, byte) in mantissa_bytes[1..].iter().enumerate() {
            if let Some(slot) = (32 + i).checked_sub(exponent).and_then(|pos| target.get_mut(pos)) {
                *slot = *byte;
            }
        }
    }

    target
}

/// Check whether a header hash satisfies a big-endian target
///
/// The hash is read as a little-endian integer, so its bytes are compared
/// in reverse against the target, most significant first. Equality counts.
#[inline]
pub fn meets_target(hash: &Hash256, target: &[u8; 32]) -> bool {
    hash.as_bytes().iter().rev().cmp(target.iter()) != Ordering::Greater
}

/// Full consensus proof-of-work check
///
/// Rejects malformed `bits` (negative, zero, overflowing) and targets easier
/// than `pow_limit` before comparing the hash.
pub fn check_proof_of_work(hash: &Hash256, bits: u32, pow_limit: &Target) -> bool {
    match Target::from_compact_checked(bits).and_then(|target| target.check_limit(pow_limit).map(|()| target)) {
        Ok(target) => target.is_met_by(hash),
        Err(e) => {
            log::debug!("rejecting bits: {}", e);
            false
        }
    }
}

/// Difficulty target representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Compact representation (bits field in block header)
    bits: u32,
    /// Expanded 256-bit target, big-endian
    bytes: [u8; 32],
}

impl Target {
    /// Create a target from bits (compact format), ignoring the sign bit
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            bytes: bits_to_target(bits),
        }
    }

    /// Create a target from bits, rejecting encodings consensus refuses
    pub fn from_compact_checked(bits: u32) -> Result<Self> {
        let exponent = bits >> 24;
        let mantissa = bits & MANTISSA_MASK;

        if mantissa != 0 && bits & SIGN_BIT != 0 {
            return Err(GenesisError::NegativeTarget { bits });
        }
        let overflow = mantissa != 0
            && (exponent > 34
                || (mantissa > 0xff && exponent > 33)
                || (mantissa > 0xffff && exponent > 32));
        if overflow {
            return Err(GenesisError::TargetOverflow { bits });
        }

        let target = Self::from_bits(bits);
        if target.is_zero() {
            return Err(GenesisError::ZeroTarget { bits });
        }
        Ok(target)
    }

    /// Create a target from a big-endian 256-bit value
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut target = Self { bits: 0, bytes };
        target.bits = target.to_compact();
        target
    }

    /// Compact bits this target was built from
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Expanded target, big-endian
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Check if a hash meets this target (hash <= target)
    #[inline]
    pub fn is_met_by(&self, hash: &Hash256) -> bool {
        meets_target(hash, &self.bytes)
    }

    /// Re-encode the expanded target in compact form
    ///
    /// Precision beyond three significant bytes is truncated, and a mantissa
    /// with the sign bit set is shifted into the next exponent.
    pub fn to_compact(&self) -> u32 {
        let Some(first) = self.bytes.iter().position(|&b| b != 0) else {
            return 0;
        };

        let mut size = (32 - first) as u32;
        let mut compact = if size <= 3 {
            let value = self.bytes[first..]
                .iter()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32);
            value << (8 * (3 - size))
        } else {
            u32::from_be_bytes([0, self.bytes[first], self.bytes[first + 1], self.bytes[first + 2]])
        };

        if compact & SIGN_BIT != 0 {
            compact >>= 8;
            size += 1;
        }

        compact | (size << 24)
    }

    /// Fail if this target is easier than `limit`
    pub fn check_limit(&self, limit: &Target) -> Result<()> {
        if self.bytes > limit.bytes {
            return Err(GenesisError::TargetAboveLimit { bits: self.bits });
        }
        Ok(())
    }

    /// Hex of the big-endian target
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}
