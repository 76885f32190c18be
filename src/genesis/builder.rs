// Genesis block assembly

use super::NetworkProfile;
use crate::core::{Block, BlockHeader, Hash256, Script, Transaction, TxOutput};
use crate::error::Result;

/// Base units per coin
pub const COIN: i64 = 100_000_000;
/// Genesis coinbase value
pub const GENESIS_REWARD: i64 = 50 * COIN;
/// Marker carried by the unspendable genesis output
pub const GENESIS_OUTPUT_MARKER: &str = "Hylium genesis";
/// Header version of every genesis block
pub const GENESIS_VERSION: u32 = 1;

/// Builds the coinbase, merkle root and header of a network's genesis block
#[derive(Debug, Clone)]
pub struct GenesisBuilder {
    message: String,
    time: u32,
    bits: u32,
    reward: i64,
    script_pubkey: Vec<u8>,
}

impl GenesisBuilder {
    /// Builder for `profile` with the standard OP_RETURN output
    pub fn new(profile: &NetworkProfile) -> Result<Self> {
        Self::with_output(profile, GENESIS_REWARD, GENESIS_OUTPUT_MARKER)
    }

    /// Builder with a custom reward and OP_RETURN marker
    pub fn with_output(profile: &NetworkProfile, reward: i64, marker: &str) -> Result<Self> {
        Ok(Self {
            message: profile.message.clone(),
            time: profile.time,
            bits: profile.bits,
            reward,
            script_pubkey: Script::op_return(marker.as_bytes())?,
        })
    }

    /// Coinbase transaction, with the extra-nonce field when given
    pub fn coinbase(&self, extra_nonce: Option<u32>) -> Transaction {
        let script_sig = Script::genesis_script_sig(&self.message, extra_nonce);
        Transaction::coinbase(script_sig, TxOutput::new(self.reward, self.script_pubkey.clone()))
    }

    /// Header over `merkle_root`; the parent hash is always null
    pub fn header(&self, merkle_root: Hash256, nonce: u32) -> BlockHeader {
        BlockHeader::new(GENESIS_VERSION, Hash256::zero(), merkle_root, self.time, self.bits, nonce)
    }

    /// Complete single-transaction genesis block
    pub fn block(&self, extra_nonce: Option<u32>, nonce: u32) -> Block {
        let coinbase = self.coinbase(extra_nonce);
        let merkle_root = Block::calculate_merkle_root(std::slice::from_ref(&coinbase));
        Block::new(self.header(merkle_root, nonce), vec![coinbase])
    }
}
