pub mod block;
pub mod consensus;
pub mod ledger;
pub mod pow;

pub use block::{Block, Transaction};
pub use consensus::{resolve_conflicts, ChainResponse};
pub use ledger::Ledger;
