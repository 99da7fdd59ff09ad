//! matchday CLI entry point
//!
//! Nearby football games and community - CLI + API server

use matchday::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
