// src/stub_server.rs
// Local stand-in for the bingo core API. Press Ctrl+C to stop.

use std::sync::atomic::Ordering;

use alfarha::config::ServerConfig;
use alfarha::logging::{log_error, log_info};
use alfarha::stub;

#[tokio::main]
async fn main() {
    let config = ServerConfig::load_or_default();

    let (server_handle, shutdown_signal, addr) = match stub::start_server(config).await {
        Ok(started) => started,
        Err(e) => {
            log_error(&format!("Failed to start stub server: {e}"));
            std::process::exit(1);
        }
    };
    log_info(&format!("Serving GET http://{addr}/balance/{{shop_id}} and POST http://{addr}/startgame"));

    if let Err(e) = tokio::signal::ctrl_c().await {
        log_error(&format!("Unable to listen for shutdown signal: {e}"));
    }

    shutdown_signal.store(true, Ordering::Relaxed);
    if let Err(e) = server_handle.await {
        log_error(&format!("Stub server task failed: {e}"));
    }
}
