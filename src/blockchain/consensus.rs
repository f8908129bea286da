use std::future::Future;
use std::sync::Mutex;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Block, Ledger};

/// Chain listing exchanged between nodes. Decoding is strict: a record with
/// a missing field or a wrong type fails the whole response, and the peer is
/// treated as having no usable chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Longest-valid-chain consensus.
///
/// Fetches every registered peer's chain through `fetch` and adopts the
/// longest candidate that is strictly longer than the local chain and passes
/// [`Ledger::valid_chain`]. Per-peer failures (`fetch` returning `None`) are
/// skipped; ties go to the first peer seen. Returns whether the local chain
/// was replaced.
///
/// The ledger lock is only held to snapshot peers and to swap the chain in,
/// never across a fetch, so transaction submission and chain reads stay
/// available while peers are being polled.
pub async fn resolve_conflicts<F, Fut>(ledger: &Mutex<Ledger>, fetch: F) -> bool
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<ChainResponse>>,
{
    let (peers, local_len) = {
        let ledger = ledger.lock().unwrap();
        (ledger.peers.clone(), ledger.chain.len())
    };

    let mut max_length = local_len;
    let mut best_chain: Option<Vec<Block>> = None;

    for peer in peers {
        let Some(response) = fetch(peer.clone()).await else {
            debug!("Peer {peer} had no usable chain, skipping");
            continue;
        };
        // A reported length that disagrees with the payload is malformed.
        if response.length != response.chain.len() {
            debug!("Peer {peer} reported length {} for {} blocks, skipping",
                response.length, response.chain.len());
            continue;
        }
        if response.length > max_length && Ledger::valid_chain(&response.chain) {
            max_length = response.length;
            best_chain = Some(response.chain);
        }
    }

    if let Some(new_chain) = best_chain {
        let mut ledger = ledger.lock().unwrap();
        // The local chain may have grown while we were fetching.
        if new_chain.len() > ledger.chain.len() {
            info!("Replacing local chain ({} blocks) with peer chain ({} blocks)",
                ledger.chain.len(), new_chain.len());
            ledger.chain = new_chain;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::pow;

    fn mined_ledger(blocks: usize) -> Ledger {
        let mut ledger = Ledger::new();
        for _ in 1..blocks {
            let (last_proof, last_hash) = {
                let last = ledger.last_block();
                (last.proof, pow::hash_block(last))
            };
            let proof = pow::proof_of_work(last_proof, &last_hash);
            ledger.new_block(proof, Some(last_hash));
        }
        ledger
    }

    fn with_peer(mut ledger: Ledger) -> Mutex<Ledger> {
        ledger.register_node("10.0.0.1:5000").unwrap();
        Mutex::new(ledger)
    }

    #[tokio::test]
    async fn adopts_longer_valid_peer_chain() {
        let peer_chain = mined_ledger(5).chain;
        let ledger = with_peer(mined_ledger(3));

        let replaced = resolve_conflicts(&ledger, |_peer| {
            let chain = peer_chain.clone();
            async move {
                Some(ChainResponse {
                    length: chain.len(),
                    chain,
                })
            }
        })
        .await;

        assert!(replaced);
        assert_eq!(ledger.lock().unwrap().chain.len(), 5);
    }

    #[tokio::test]
    async fn rejects_longer_but_invalid_peer_chain() {
        let mut peer_chain = mined_ledger(5).chain;
        peer_chain[3].previous_hash = "deadbeef".to_string();

        let ledger = with_peer(mined_ledger(3));

        let replaced = resolve_conflicts(&ledger, |_peer| {
            let chain = peer_chain.clone();
            async move {
                Some(ChainResponse {
                    length: chain.len(),
                    chain,
                })
            }
        })
        .await;

        assert!(!replaced);
        assert_eq!(ledger.lock().unwrap().chain.len(), 3);
    }

    #[tokio::test]
    async fn rejects_length_that_disagrees_with_payload() {
        let peer_chain = mined_ledger(2).chain;
        let ledger = with_peer(mined_ledger(3));

        let replaced = resolve_conflicts(&ledger, |_peer| {
            let chain = peer_chain.clone();
            async move { Some(ChainResponse { length: 10, chain }) }
        })
        .await;

        assert!(!replaced);
        assert_eq!(ledger.lock().unwrap().chain.len(), 3);
    }

    #[tokio::test]
    async fn unreachable_peer_is_skipped() {
        let ledger = with_peer(mined_ledger(2));

        let replaced = resolve_conflicts(&ledger, |_peer| async move { None }).await;

        assert!(!replaced);
        assert_eq!(ledger.lock().unwrap().chain.len(), 2);
    }

    #[tokio::test]
    async fn shorter_peer_chain_leaves_local_untouched() {
        let peer_chain = mined_ledger(2).chain;
        let ledger = with_peer(mined_ledger(4));

        let replaced = resolve_conflicts(&ledger, |_peer| {
            let chain = peer_chain.clone();
            async move {
                Some(ChainResponse {
                    length: chain.len(),
                    chain,
                })
            }
        })
        .await;

        assert!(!replaced);
        assert_eq!(ledger.lock().unwrap().chain.len(), 4);
    }
}
