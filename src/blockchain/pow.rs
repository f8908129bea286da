use hex;
use sha2::{Digest, Sha256};

use super::Block;

/// Hex-zero prefix a block digest must carry. Fixed, no adjustment.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// SHA-256 digest of a block's canonical JSON serialization, lowercase hex.
/// The serialization follows the struct's field order, so two blocks with
/// the same logical content always hash identically.
pub fn hash_block(block: &Block) -> String {
    let serialized = serde_json::to_string(block).expect("block serialization cannot fail");

    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());

    hex::encode(hasher.finalize())
}

/// Whether `proof` solves the puzzle posed by the previous block: the digest
/// of `{last_proof}{proof}{last_hash}` must start with [`DIFFICULTY_PREFIX`].
pub fn valid_proof(last_proof: u64, proof: u64, last_hash: &str) -> bool {
    let guess = format!("{last_proof}{proof}{last_hash}");
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));

    digest.starts_with(DIFFICULTY_PREFIX)
}

/// Brute-force search for a valid proof, counting up from zero.
///
/// Deliberately blocking and unbounded (expected ~65536 attempts at the
/// fixed difficulty); run it off any lock, e.g. via `spawn_blocking`.
pub fn proof_of_work(last_proof: u64, last_hash: &str) -> u64 {
    let mut proof = 0u64;
    while !valid_proof(last_proof, proof, last_hash) {
        proof += 1;
    }
    proof
}
