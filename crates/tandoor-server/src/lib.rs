//! Tandoor server library logic.

pub mod api_orders;
pub mod api_voice;
pub mod api_webhooks;
pub mod config;
pub mod hours;
pub mod pos;

use std::sync::{Arc, RwLock};

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Extension, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tandoor_ai::OrderTextParser;
use tandoor_cart::{CartStore, ProcessedCalls};
use tandoor_menu::MenuCatalog;
use tandoor_types::Order;

use config::VoiceConfig;
use hours::WeeklyHours;
use pos::PosClient;

/// Maximum request body size (2 MiB). Protects against OOM from oversized
/// transcripts.
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state shared across all request handlers.
pub struct AppState {
    /// The static menu catalog.
    pub catalog: Arc<MenuCatalog>,
    /// Most recent live cart per call.
    pub carts: CartStore,
    /// Duplicate call-ID bookkeeping.
    pub processed: ProcessedCalls,
    /// The most recent complete order, for `/orders/latest`.
    ///
    /// Uses `std::sync::RwLock` intentionally: lock acquisitions are brief
    /// clone/replace operations that never span `.await` points, making a
    /// synchronous lock safe here.
    pub latest_order: RwLock<Option<Order>>,
    /// Optional AI-assisted parsing collaborator.
    pub ai_parser: Option<Arc<dyn OrderTextParser>>,
    /// Optional POS forwarding client.
    pub pos: Option<PosClient>,
    /// Voice-agent routing for `/voice`.
    pub voice: VoiceConfig,
    /// Opening hours driving the `/voice` agent choice.
    pub hours: WeeklyHours,
}

impl AppState {
    /// State with the given catalog and defaults everywhere else: no AI
    /// collaborator, no POS forwarding, default cache bounds and hours.
    pub fn new(catalog: MenuCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            carts: CartStore::default(),
            processed: ProcessedCalls::default(),
            latest_order: RwLock::new(None),
            ai_parser: None,
            pos: None,
            voice: VoiceConfig::default(),
            hours: WeeklyHours::default(),
        }
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/post-call", post(api_webhooks::post_call_handler))
        .route("/webhooks/live-cart", post(api_webhooks::live_cart_handler))
        .route("/orders/latest", get(api_orders::latest_order_handler))
        .route("/voice", get(api_voice::voice_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
