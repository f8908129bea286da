mod api;
mod blockchain;
mod error;
mod utils;

use clap::Parser;
use log::warn;

use api::server::run_server;
use blockchain::Ledger;

/// A single wordchain node: mines word transactions into a proof-of-work
/// chain and reconciles with peers via longest-valid-chain consensus.
#[derive(Parser)]
#[command(name = "wordchain")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Peer address to register at startup, e.g. 127.0.0.1:5001 (repeatable)
    #[arg(long = "peer")]
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut ledger = Ledger::new();
    for peer in &args.peers {
        if let Err(e) = ledger.register_node(peer) {
            warn!("Skipping peer {peer}: {e}");
        }
    }

    let address = format!("0.0.0.0:{}", args.port);
    println!("Starting wordchain node on {address}");
    run_server(ledger, &address).await
}
