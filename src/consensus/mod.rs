// Consensus proof-of-work and nonce search

pub mod pow;
pub mod search;

pub use pow::{Target, bits_to_target, check_proof_of_work, meets_target};
pub use search::{NonceRange, NonceSearch, SearchOutcome, SearchStats, SearchStatus, NONCE_SPACE};
