// Genesis block construction, mining and verification

mod builder;
pub mod chain;
pub mod miner;
mod profile;

pub use builder::{COIN, GENESIS_OUTPUT_MARKER, GENESIS_REWARD, GENESIS_VERSION, GenesisBuilder};
pub use chain::{CHAIN_GENESIS, ChainGenesis};
pub use miner::{GenesisMiner, MineOutcome, MinerConfig, MiningReport, Round, SearchResult};
pub use profile::{BITS_EASY, BITS_STANDARD, MAIN_TIME, NetworkProfile, REGTEST_TIME};
