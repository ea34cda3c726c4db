use crate::crm::leads::LeadClient;
use crate::router::{handle, AppContext};
use crate::store::Store;
use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;

mod crm;
mod domain;
mod errors;
mod format;
mod ingest;
mod reports;
mod responses;
mod router;
mod store;
mod templates;

#[cfg(test)]
mod tests;

const DEFAULT_CRM_BASE_URL: &str = "https://api.close.com";

fn main() {
    // 1️⃣ Per-session in-memory portfolio store
    let store = Store::new();

    // 2️⃣ Optional CRM lead enrichment; without a key the dashboard hides it
    let lead_client = match std::env::var("CRM_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let base_url = std::env::var("CRM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CRM_BASE_URL.to_string());
            match LeadClient::new(base_url, key) {
                Ok(client) => {
                    println!("✅ CRM lead enrichment enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    eprintln!("❌ CRM client initialization failed: {e}");
                    None
                }
            }
        }
        _ => None,
    };

    let ctx = AppContext { store, lead_client };

    // 3️⃣ Start the server
    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("❌ Invalid BIND_ADDR {bind:?}: {e}");
            std::process::exit(1);
        }
    };
    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    // 4️⃣ Serve requests, passing the context into the closure
    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => responses::html_error_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
