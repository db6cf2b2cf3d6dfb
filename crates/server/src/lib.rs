//! HTTP and WebSocket transport for the shared world.
//!
//! The server owns no game logic. Account bootstrap endpoints go straight to
//! the runtime's [`runtime::AccountStore`]; every WebSocket becomes one
//! runtime connection whose frames are relayed verbatim in both directions.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod ws;

use axum::Router;
use axum::routing::{get, post};

use runtime::RuntimeHandle;

pub use config::ServerConfig;
pub use error::ApiError;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub runtime: RuntimeHandle,
}

impl AppState {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(http::login))
        .route("/signup", post(http::signup))
        .route("/update-score", post(http::update_score))
        .route("/update-respawn", post(http::update_respawn))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}
