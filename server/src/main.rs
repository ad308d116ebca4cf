#![allow(missing_docs)]

use clap::Parser;
use confserve_config::ConfserveConfig;
use confserve_core::LocalRepository;
use confserve_server::api;
use confserve_server::state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Confserve - labeled configuration server.
#[derive(Parser)]
#[command(name = "confserve-server")]
#[command(about = "Confserve configuration server")]
struct Args {
    /// Path to configuration file
    #[arg(short = 'c', long = "config", env = "CONFSERVE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => confserve_config::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: Failed to load config from {path}: {e}");
            std::process::exit(1);
        }),
        None => confserve_config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}, using defaults");
            ConfserveConfig::default()
        }),
    };

    init_logging(&config);

    let repository = LocalRepository::new(&config.repository.root).unwrap_or_else(|e| {
        eprintln!(
            "Error: Failed to open repository at {}: {e}",
            config.repository.root
        );
        std::process::exit(1);
    });

    tracing::info!(
        root = %config.repository.root,
        default_label = %config.repository.default_label,
        "Repository mounted"
    );

    let state = Arc::new(AppState::new(
        Arc::new(repository),
        config.repository.default_label.clone(),
    ));

    let app = api::create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Confserve listening on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}

fn init_logging(config: &ConfserveConfig) {
    let filter = if config.logging.filter.is_empty() {
        config.logging.level.as_str().to_string()
    } else {
        config.logging.filter.clone()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
