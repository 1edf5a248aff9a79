//! Tandoor server binary — webhook endpoints for the voice-agent ordering
//! platform.
//!
//! Starts an axum HTTP server with structured logging, menu catalog
//! loading, and graceful shutdown on SIGTERM/SIGINT.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tandoor_ai::{AiConfig, OpenAiParser};
use tandoor_cart::CartStore;
use tandoor_menu::MenuCatalog;
use tandoor_server::config::{self, Config};
use tandoor_server::hours::WeeklyHours;
use tandoor_server::pos::PosClient;
use tandoor_server::{app, AppState};

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("TANDOOR_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn build_state(config: &Config) -> AppState {
    let catalog = MenuCatalog::load(config.menu.path.as_deref())
        .expect("failed to load menu catalog — check menu.path in config");

    let hours = WeeklyHours::from_config(&config.hours)
        .expect("failed to parse opening hours — check [hours] in config");

    let ai_parser = if config.ai.enabled {
        let api_key = config::ai_api_key_from_env();
        if api_key.is_none() {
            tracing::warn!("ai parsing enabled but no api key in environment; collaborator will be unavailable");
        }
        Some(Arc::new(OpenAiParser::new(AiConfig {
            base_url: config.ai.base_url.clone(),
            model: config.ai.model.clone(),
            api_key,
            timeout_secs: config.ai.timeout_secs,
        })) as Arc<dyn tandoor_ai::OrderTextParser>)
    } else {
        None
    };

    let pos = match &config.pos.url {
        Some(url) => Some(PosClient::new(url.clone(), config.pos.api_key.clone())),
        None => {
            tracing::info!("no pos url configured, orders will not be forwarded");
            None
        }
    };

    AppState {
        carts: CartStore::new(
            config.cart.capacity,
            chrono::Duration::minutes(config.cart.retention_minutes),
        ),
        ai_parser,
        pos,
        voice: config.voice.clone(),
        hours,
        ..AppState::new(catalog)
    }
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("tandoor.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    // Build application
    let state = build_state(&config);
    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting tandoor server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("tandoor server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
