/// Ledger access: ABI codec and read-only contract queries
pub mod abi;
pub mod reader;

pub use reader::{ChainFacts, ChainReader};
