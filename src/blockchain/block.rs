use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single word entry recorded on the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub word: String,
    pub value: i64,
    pub sender: String,
    pub recipient: String,
}

/// A sealed unit of the ledger. Field order matters: the block hash is
/// computed over the JSON serialization in exactly this order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Block {
        let timestamp = Utc::now().timestamp_millis() as f64 / 1000.0;

        Block {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        }
    }
}
