// Script builders for the genesis coinbase

use crate::error::{GenesisError, Result};

/// Largest payload a single direct push opcode can carry
pub const MAX_OP_RETURN_PUSH: usize = 0x4b;

/// Genesis scriptSig prefix: push 4 bytes `ffff001d` (0x1d00ffff), push 1 byte `04`
pub const GENESIS_SCRIPT_SIG_PREFIX: [u8; 7] = [0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04];

/// Opcodes used by the genesis scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Push the next 4 bytes
    OpPushBytes4 = 0x04,
    /// Mark the output provably unspendable
    OpReturn = 0x6a,
    /// First opcode that is not a direct push
    OpPushData1 = 0x4c,
}

/// Script builder
pub struct Script;

impl Script {
    /// `OP_RETURN <data>` output script
    ///
    /// Only direct pushes are supported, so payloads of `OP_PUSHDATA1` size
    /// or more are rejected.
    pub fn op_return(data: &[u8]) -> Result<Vec<u8>> {
        if data.len() >= OpCode::OpPushData1 as usize {
            return Err(GenesisError::OpReturnTooLong { len: data.len() });
        }

        let mut script = Vec::with_capacity(data.len() + 2);
        script.push(OpCode::OpReturn as u8);
        script.push(data.len() as u8);
        script.extend_from_slice(data);
        Ok(script)
    }

    /// Genesis coinbase scriptSig
    /// prefix ++ message [++ OP_PUSHBYTES_4 ++ extra_nonce(LE)]
    ///
    /// The message bytes follow the prefix raw, exactly as the node's chain
    /// parameters rebuild them.
    pub fn genesis_script_sig(message: &str, extra_nonce: Option<u32>) -> Vec<u8> {
        let mut script = Vec::with_capacity(GENESIS_SCRIPT_SIG_PREFIX.len() + message.len() + 5);
        script.extend_from_slice(&GENESIS_SCRIPT_SIG_PREFIX);
        script.extend_from_slice(message.as_bytes());
        if let Some(extra_nonce) = extra_nonce {
            script.push(OpCode::OpPushBytes4 as u8);
            script.extend_from_slice(&extra_nonce.to_le_bytes());
        }
        script
    }
}
