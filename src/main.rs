//! uatgate entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment (secrets are mandatory)
//! 2. Connect to Redis
//! 3. Build signer, session authority and share tokens
//! 4. Build router with edge guard and security headers
//! 5. Start Axum server
//!
//! Also supports a `hash-password` subcommand for producing ADMIN_PASSWORD_HASH.

use std::net::SocketAddr;
use std::sync::Arc;
use uatgate::{
    auth::{middleware::AppState, password::hash_password},
    config::Config,
    routes,
    storage::RedisProjectStore,
};

fn print_hash_usage() {
    eprintln!("Usage: uatgate hash-password <password>");
    eprintln!();
    eprintln!("Print an Argon2id hash of the admin password for ADMIN_PASSWORD_HASH.");
    eprintln!();
    eprintln!("Then set in .env:");
    eprintln!("  ADMIN_PASSWORD_HASH=<output>");
}

/// Log a fatal startup error and exit.
fn fatal(context: &str, error: impl std::fmt::Display) -> ! {
    tracing::error!(error = %error, "{}", context);
    eprintln!("{}: {}", context, error);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    // Check for hash-password subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "hash-password" {
        if args.len() != 3 {
            print_hash_usage();
            std::process::exit(1);
        }

        match hash_password(&args[2]) {
            Ok(hash) => println!("{}", hash),
            Err(e) => {
                eprintln!("Error hashing password: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Missing secrets stop the process before anything is served
    let config = Config::from_env().unwrap_or_else(|e| fatal("Failed to load config", e));
    let bind_addr = config.bind_addr;
    tracing::info!("Starting uatgate on {}", bind_addr);

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str())
        .unwrap_or_else(|e| fatal("Invalid Redis URL", e));

    // Verify Redis connection
    if let Err(e) = redis_client.get_multiplexed_async_connection().await {
        fatal("Failed to connect to Redis", e);
    }

    let store = Arc::new(RedisProjectStore::new(redis_client));
    let state =
        AppState::new(config, store).unwrap_or_else(|e| fatal("Invalid auth configuration", e));

    let app = routes::app(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|e| fatal("Failed to bind", e));
    tracing::info!("Listening on {}", bind_addr);

    // ConnectInfo is needed for per-IP login rate limiting
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        fatal("Server error", e);
    }
}
