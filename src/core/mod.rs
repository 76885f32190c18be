// Core blockchain data structures

mod block;
mod hash;
pub mod script;
mod serialize;
mod transaction;
mod types;

pub use block::*;
pub use hash::*;
pub use script::{GENESIS_SCRIPT_SIG_PREFIX, MAX_OP_RETURN_PUSH, Script};
pub use serialize::*;
pub use transaction::*;
pub use types::*;
