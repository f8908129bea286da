use std::sync::Mutex;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::client;
use crate::blockchain::{consensus, pow, Ledger};

/// How often the background task polls peers for a longer chain.
const SYNC_INTERVAL_SECS: u64 = 10;

/// Recipient of this node's mining rewards, generated once per process.
pub struct NodeIdentity(pub String);

impl NodeIdentity {
    pub fn generate() -> Self {
        NodeIdentity(Uuid::new_v4().simple().to_string())
    }
}

#[derive(Deserialize)]
pub struct TransactionRequest {
    word: String,
    sender: String,
    recipient: String,
    value: Option<i64>,
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    nodes: Vec<String>,
}

// GET /mine : solve the puzzle against the last block, seal a new one
pub async fn mine(
    ledger: web::Data<Mutex<Ledger>>,
    identity: web::Data<NodeIdentity>,
) -> impl Responder {
    // Snapshot what the search needs, then release the lock: the search can
    // take a while and submissions/reads must stay available meanwhile.
    let (last_proof, last_hash) = {
        let ledger = ledger.lock().unwrap();
        let last = ledger.last_block();
        (last.proof, pow::hash_block(last))
    };

    let search_hash = last_hash.clone();
    let proof =
        match tokio::task::spawn_blocking(move || pow::proof_of_work(last_proof, &search_hash))
            .await
        {
            Ok(proof) => proof,
            Err(e) => {
                error!("Mining task panicked: {e}");
                return HttpResponse::InternalServerError().body("Mining failed");
            }
        };

    // Reward for finding the proof: one fixed-value transaction from "0".
    let block = {
        let mut ledger = ledger.lock().unwrap();
        ledger.new_transaction(
            "MINING".to_string(),
            "0".to_string(),
            identity.0.clone(),
            Some(1),
        );
        ledger.new_block(proof, Some(last_hash)).clone()
    };
    info!("Forged block {} with proof {}", block.index, block.proof);

    HttpResponse::Ok().json(json!({
        "message": "New Block Forged",
        "index": block.index,
        "transactions": block.transactions,
        "proof": block.proof,
        "previous_hash": block.previous_hash,
    }))
}

// POST /transactions/new : queue a word transaction for the next block
pub async fn new_transaction(
    ledger: web::Data<Mutex<Ledger>>,
    req: web::Json<TransactionRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let index = {
        let mut ledger = ledger.lock().unwrap();
        ledger.new_transaction(req.word, req.sender, req.recipient, req.value)
    };

    HttpResponse::Created().json(json!({
        "message": format!("Transaction will be added to Block {index}"),
    }))
}

// GET /chain : full chain listing, also consumed by peers during consensus
pub async fn full_chain(ledger: web::Data<Mutex<Ledger>>) -> impl Responder {
    let chain = ledger.lock().unwrap().chain.clone();
    let length = chain.len();

    HttpResponse::Ok().json(consensus::ChainResponse { length, chain })
}

// POST /nodes/register : add peer addresses to the known set
pub async fn register_nodes(
    ledger: web::Data<Mutex<Ledger>>,
    req: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if req.nodes.is_empty() {
        return HttpResponse::BadRequest().body("Error: Please supply a valid list of nodes");
    }

    let mut ledger = ledger.lock().unwrap();
    for address in &req.nodes {
        if let Err(e) = ledger.register_node(address) {
            return HttpResponse::BadRequest().body(e.to_string());
        }
    }

    let total_nodes: Vec<&String> = ledger.peers.iter().collect();
    HttpResponse::Created().json(json!({
        "message": "New nodes have been added",
        "total_nodes": total_nodes,
    }))
}

// GET /nodes/resolve : run longest-valid-chain consensus against all peers
pub async fn resolve(ledger: web::Data<Mutex<Ledger>>) -> impl Responder {
    let replaced = consensus::resolve_conflicts(ledger.get_ref(), |peer| async move {
        client::fetch_chain(&peer).await
    })
    .await;

    let chain = ledger.lock().unwrap().chain.clone();
    let body = if replaced {
        json!({ "message": "Our chain was replaced", "new_chain": chain })
    } else {
        json!({ "message": "Our chain is authoritative", "chain": chain })
    };

    HttpResponse::Ok().json(body)
}

fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/mine", web::get().to(mine))
        .route("/transactions/new", web::post().to(new_transaction))
        .route("/chain", web::get().to(full_chain))
        .route("/nodes/register", web::post().to(register_nodes))
        .route("/nodes/resolve", web::get().to(resolve));
}

// Start the node on the given address with a periodic consensus task
pub async fn run_server(ledger: Ledger, address: &str) -> std::io::Result<()> {
    let ledger_data = web::Data::new(Mutex::new(ledger));
    let identity = web::Data::new(NodeIdentity::generate());
    info!(
        "Starting wordchain node on {address}, miner identity {}",
        identity.0
    );

    let sync_data = ledger_data.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(SYNC_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let replaced = consensus::resolve_conflicts(sync_data.get_ref(), |peer| async move {
                client::fetch_chain(&peer).await
            })
            .await;
            if replaced {
                info!("Periodic sync adopted a longer chain from the network");
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(ledger_data.clone())
            .app_data(identity.clone())
            .configure(configure_routes)
    })
    .bind(address)?
    .run()
    .await
}
