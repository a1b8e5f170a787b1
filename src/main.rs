//! Cloud export server - drives the directory picker and create form over HTTP
//!
//! # Usage
//! ```bash
//! dropbox-export /path/to/cloud                  # Serve a folder as the cloud root
//! dropbox-export /path/to/cloud --local-root dir # Separate local mirror
//! dropbox-export /path/to/cloud --unlinked       # No linked account
//! ```

use std::sync::Arc;

use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dropbox_export::cloud::{LocalFsCloud, NetworkActivity, SharedClient};
use dropbox_export::config::Cli;
use dropbox_export::local::LocalDirectory;
use dropbox_export::navigation::Session;
use dropbox_export::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client: Option<SharedClient> = if config.linked {
        Some(Arc::new(LocalFsCloud::new(&config.cloud_root)))
    } else {
        None
    };

    let session = Arc::new(Session::new(
        client,
        Arc::new(LocalDirectory::new(&config.local_root)),
        NetworkActivity::global().clone(),
    ));
    session.push_host("editor")?;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(session)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", config.addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │             Cloud Export Server             │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Cloud root: {}", config.cloud_root.display());
    println!("  Local root: {}", config.local_root.display());
    if !config.linked {
        println!("  Account:    not linked");
    }
    println!("  Server:     http://{}", config.addr);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
