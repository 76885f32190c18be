// Genesis tuples hard-coded in the node's chain parameters

use super::{GenesisBuilder, NetworkProfile};
use crate::consensus::{Target, check_proof_of_work};
use crate::core::{Block, Hash256};
use crate::error::{GenesisError, Result};

/// Main network proof-of-work limit: 00000000ffff...ff
const MAIN_POW_LIMIT: [u8; 32] = {
    let mut limit = [0xff; 32];
    limit[0] = 0;
    limit[1] = 0;
    limit[2] = 0;
    limit[3] = 0;
    limit
};

/// Test/dev proof-of-work limit: 7fff...ff
const EASY_POW_LIMIT: [u8; 32] = {
    let mut limit = [0xff; 32];
    limit[0] = 0x7f;
    limit
};

/// A mined genesis as pasted into chain parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainGenesis {
    pub network: &'static str,
    pub nonce: u32,
    /// Present when the scriptSig carries an extra-nonce
    pub extra_nonce: Option<u32>,
    /// Expected header hash, display order
    pub hash: &'static str,
    /// Expected merkle root, display order
    pub merkle_root: &'static str,
    pub pow_limit: [u8; 32],
}

pub static CHAIN_GENESIS: [ChainGenesis; 4] = [
    ChainGenesis {
        network: "main",
        nonce: 3204028577,
        extra_nonce: Some(0),
        hash: "0000000092231d99339b168144703e3e36cceee158fce4eb70f93883a53b4fc8",
        merkle_root: "0dc9b3e16f9d34e8d9d698dd1c73c6a1ac40640b96ec3774bfad535d393dff44",
        pow_limit: MAIN_POW_LIMIT,
    },
    ChainGenesis {
        network: "testnet",
        nonce: 0,
        extra_nonce: None,
        hash: "58ff356066b8fd4c2b606d0b0fb3f8f787fefcbb5ec6147858cc0b0f1ccd9aec",
        merkle_root: "04a76e1b6d70a2470e65295d0a30045f5cc00f4758b0df4039faedc54253ee53",
        pow_limit: EASY_POW_LIMIT,
    },
    ChainGenesis {
        network: "test4",
        nonce: 10,
        extra_nonce: None,
        hash: "74b2e981c72c326ba6d640900a3d951928105e1b48c13ceffcdc729540c32273",
        merkle_root: "ca27b679d9c2785c54094b0dfcba36a948fbf05373c432afbfffa90ecfb515f3",
        pow_limit: EASY_POW_LIMIT,
    },
    ChainGenesis {
        network: "regtest",
        nonce: 10,
        extra_nonce: None,
        hash: "4c71cdd1f53d32f70ac707c4caff62341e15f7b2a3154cbd184be632d944aa2a",
        merkle_root: "348a580fe27f335304305faa3aa108ea85f1036ffc0ee6ee9f087bbf7e023ecf",
        pow_limit: EASY_POW_LIMIT,
    },
];

impl ChainGenesis {
    /// Look up the hard-coded genesis for a network
    pub fn find(network: &str) -> Result<&'static ChainGenesis> {
        CHAIN_GENESIS
            .iter()
            .find(|g| g.network == network)
            .ok_or_else(|| GenesisError::UnknownNetwork(network.to_string()))
    }

    pub fn pow_limit(&self) -> Target {
        Target::from_be_bytes(self.pow_limit)
    }

    /// Rebuild the genesis block from the profile table
    pub fn build(&self) -> Result<Block> {
        let profile = NetworkProfile::by_name(self.network)?;
        Ok(GenesisBuilder::new(&profile)?.block(self.extra_nonce, self.nonce))
    }

    /// Rebuild the block and check it against the expected literals
    ///
    /// Bits that fail to decode or exceed the pow limit surface as their own
    /// target errors rather than a mismatch.
    pub fn verify(&self) -> Result<Block> {
        let block = self.build()?;

        let single_coinbase = block.transactions.len() == 1 && block.transactions[0].is_coinbase();
        if !block.is_genesis() || !single_coinbase {
            return Err(GenesisError::GenesisMismatch {
                network: self.network.to_string(),
                field: "block shape",
                expected: "null parent and a lone coinbase".to_string(),
                actual: format!("{} transactions", block.transactions.len()),
            });
        }

        check_hash(self.network, "merkle root", self.merkle_root, &block.header.merkle_root)?;
        check_hash(self.network, "block hash", self.hash, &block.hash())?;

        let target = Target::from_compact_checked(block.header.bits)?;
        target.check_limit(&self.pow_limit())?;
        if !check_proof_of_work(&block.hash(), block.header.bits, &self.pow_limit()) {
            return Err(GenesisError::GenesisMismatch {
                network: self.network.to_string(),
                field: "proof of work",
                expected: format!("hash <= {}", target.to_hex()),
                actual: block.hash().to_hex(),
            });
        }

        log::debug!("{} genesis verified: {}", self.network, block.hash());
        Ok(block)
    }
}

fn check_hash(network: &str, field: &'static str, expected: &str, actual: &Hash256) -> Result<()> {
    if Hash256::from_hex(expected)? == *actual {
        Ok(())
    } else {
        Err(GenesisError::GenesisMismatch {
            network: network.to_string(),
            field,
            expected: expected.to_string(),
            actual: actual.to_hex(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chain_genesis_verifies() {
        for genesis in &CHAIN_GENESIS {
            let block = genesis.verify().unwrap();
            assert_eq!(block.header.nonce, genesis.nonce);
        }
    }

    #[test]
    fn test_table_covers_every_profile() {
        for profile in NetworkProfile::table() {
            assert!(ChainGenesis::find(&profile.name).is_ok());
        }
        assert!(ChainGenesis::find("signet").is_err());
    }

    #[test]
    fn test_main_genesis_needs_extra_nonce() {
        let mut main = ChainGenesis::find("main").unwrap().clone();
        main.extra_nonce = None;
        assert!(matches!(
            main.verify(),
            Err(GenesisError::GenesisMismatch { field: "merkle root", .. })
        ));
    }

    #[test]
    fn test_wrong_nonce_is_reported() {
        let mut regtest = ChainGenesis::find("regtest").unwrap().clone();
        regtest.nonce = 11;
        assert!(matches!(
            regtest.verify(),
            Err(GenesisError::GenesisMismatch { field: "block hash", .. })
        ));
    }

    #[test]
    fn test_main_pow_limit() {
        let limit = ChainGenesis::find("main").unwrap().pow_limit();
        assert_eq!(limit.bits(), 0x1d00ffff);
        assert_eq!(ChainGenesis::find("regtest").unwrap().pow_limit().bits(), 0x207fffff);
    }

    #[test]
    fn test_easy_bits_above_main_limit() {
        let mut regtest = ChainGenesis::find("regtest").unwrap().clone();
        regtest.pow_limit = MAIN_POW_LIMIT;
        assert_eq!(
            regtest.verify().unwrap_err(),
            GenesisError::TargetAboveLimit { bits: 0x207fffff }
        );
    }
}
