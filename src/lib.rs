// Hylium genesis block miner

pub mod cli;
pub mod consensus;
pub mod core;
pub mod error;
pub mod genesis;

// Re-exports for convenience
pub use crate::cli::{Cli, Commands, MineArgs};
pub use crate::consensus::{NonceRange, NonceSearch, SearchOutcome, Target};
pub use crate::core::{Block, BlockHeader, Hash256, Script, Transaction, TxInput, TxOutput};
pub use crate::error::{GenesisError, Result};
pub use crate::genesis::{
    CHAIN_GENESIS, ChainGenesis, GenesisBuilder, GenesisMiner, MineOutcome, MinerConfig, MiningReport,
    NetworkProfile, SearchResult,
};
