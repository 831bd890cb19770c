//! Chat relay service - FAQ-first conversation backend.
//!
//! This crate provides a small HTTP backend that relays chat turns to an
//! upstream completion API:
//! - Per-conversation turn history, created lazily and held in memory
//! - A static FAQ table consulted before the upstream model
//! - A streaming completion client that assembles the reply server-side
//!
//! ## Architecture
//!
//! ```text
//! Client → POST /chat/ (session check → FAQ lookup → completion API)
//!                              ↓
//!                     Conversation store
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod completion;
pub mod faq;
pub mod routes;
pub mod store;

pub use completion::{CompletionClient, GroqClient};
pub use faq::FaqTable;
pub use routes::{AppState, ChatRequest, ChatResponse, ErrorResponse};
pub use store::{Conversation, ConversationStore, Turn, SYSTEM_PREAMBLE};

use axum::Router;
use relay_common::{Config, Error};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Assemble application state from configuration.
///
/// Fails with `Error::Config` when the API key is missing or the FAQ table
/// cannot be loaded; both are required at startup.
pub fn build_state(config: &Config) -> relay_common::Result<AppState> {
    let api_key = config
        .groq_api_key()
        .ok_or_else(|| Error::Config("GROQ_API_KEY is not set".into()))?;

    let faq = FaqTable::load(&config.faq.path)?;
    tracing::info!(
        path = %config.faq.path.display(),
        entries = faq.len(),
        "FAQ table loaded"
    );

    Ok(AppState {
        store: ConversationStore::new(),
        faq: Arc::new(faq),
        completion: Arc::new(GroqClient::new(api_key, &config.llm)),
    })
}

/// Build the relay router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Credentialed CORS cannot use wildcards; mirror the request instead
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(routes::chat_routes(state))
        .merge(routes::health_routes())
        .layer(cors)
}

/// Start the relay server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let state = build_state(config)?;

    let addr = SocketAddr::from((
        config.bind_address().parse::<std::net::IpAddr>()?,
        config.port(),
    ));

    let router = build_router(state);

    tracing::info!("Starting chat relay on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
