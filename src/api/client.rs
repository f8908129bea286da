use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::blockchain::ChainResponse;

const PEER_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch a peer's full chain. Any failure along the way (client setup,
/// network error, non-success status, malformed body) yields `None`: during
/// consensus a broken peer is simply a peer with no usable chain.
pub async fn fetch_chain(peer: &str) -> Option<ChainResponse> {
    let client = Client::builder().timeout(PEER_FETCH_TIMEOUT).build().ok()?;

    let response = client
        .get(format!("http://{peer}/chain"))
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        debug!("Peer {peer} answered {}", response.status());
        return None;
    }

    response.json::<ChainResponse>().await.ok()
}
