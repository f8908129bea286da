use std::collections::HashSet;

use url::Url;

use super::pow;
use super::{Block, Transaction};
use crate::error::WordchainError;
use crate::utils::word_value;

/// Proof the genesis block is sealed with.
pub const GENESIS_PROOF: u64 = 100;
/// Sentinel standing in for the hash of the (nonexistent) block before genesis.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// In-memory chain of word transactions plus the pool of transactions
/// waiting for the next block, and the set of known peer nodes.
#[derive(Debug)]
pub struct Ledger {
    pub chain: Vec<Block>,
    pub pending: Vec<Transaction>,
    pub peers: HashSet<String>,
}

impl Ledger {
    /// Create a ledger with its genesis block already sealed, so the chain
    /// is never observed empty.
    pub fn new() -> Self {
        let mut ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
            peers: HashSet::new(),
        };
        ledger.new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        ledger
    }

    /// Queue a transaction for the next block. When `value` is omitted it is
    /// derived from the word's letters.
    ///
    /// Returns the index of the block expected to contain the transaction.
    /// This is advisory: another seal may land first and push it further out.
    pub fn new_transaction(
        &mut self,
        word: String,
        sender: String,
        recipient: String,
        value: Option<i64>,
    ) -> u64 {
        let value = value.unwrap_or_else(|| word_value(&word));

        self.pending.push(Transaction {
            word,
            value,
            sender,
            recipient,
        });

        self.last_block().index + 1
    }

    /// Seal everything in the pending pool into a new block and append it.
    /// `previous_hash` defaults to the hash of the current last block.
    ///
    /// The proof is taken as given; finding and checking it is the miner's
    /// job, which also lets genesis be sealed with an arbitrary constant.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => pow::hash_block(self.last_block()),
        };

        let block = Block::new(
            self.chain.len() as u64 + 1,
            std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        );
        self.chain.push(block);

        self.chain.last().expect("chain cannot be empty after push")
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Add a peer address to the known set, normalized to `host:port`.
    /// Registering the same peer twice is a no-op.
    pub fn register_node(&mut self, address: &str) -> Result<(), WordchainError> {
        let normalized = normalize_peer_address(address)?;
        self.peers.insert(normalized);
        Ok(())
    }

    /// Check a candidate chain's hash links and proofs from the second block
    /// onward. The first block is trusted as given; a single-block chain is
    /// vacuously valid.
    pub fn valid_chain(candidate: &[Block]) -> bool {
        for pair in candidate.windows(2) {
            let (prev, block) = (&pair[0], &pair[1]);
            let prev_hash = pow::hash_block(prev);

            if block.previous_hash != prev_hash {
                return false;
            }
            if !pow::valid_proof(prev.proof, block.proof, &prev_hash) {
                return false;
            }
        }
        true
    }
}

/// Accepts `http://host:port`, `host:port` and bare `host` forms; everything
/// else is an [`WordchainError::InvalidAddress`].
fn normalize_peer_address(address: &str) -> Result<String, WordchainError> {
    let url = match Url::parse(address) {
        Ok(url) if url.host_str().is_some() => url,
        // No scheme (or a scheme-less "host:port" that parsed weird):
        // retry as a plain http address.
        _ => Url::parse(&format!("http://{address}"))
            .map_err(|_| WordchainError::InvalidAddress(address.to_string()))?,
    };

    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => Ok(format!("{host}:{port}")),
        (Some(host), None) => Ok(host.to_string()),
        (None, _) => Err(WordchainError::InvalidAddress(address.to_string())),
    }
}
