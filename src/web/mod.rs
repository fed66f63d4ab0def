//! Web layer
//!
//! HTTP interface for the contest service. Handlers stay thin: they parse
//! the request, delegate to the store or the refresh service, and map
//! failures to plain status codes.

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, services::RefreshService, store::ContestStore};

pub mod api;

pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config, store: ContestStore, refresher: RefreshService) -> Result<Self> {
        let app = Self::create_router(AppState { store, refresher });
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Build the full router. Public so tests can drive it without binding
    /// a socket.
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(api::health_check))
            .nest("/api/v1", Self::api_v1_routes())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    fn api_v1_routes() -> Router<AppState> {
        Router::new()
            .route("/contests", get(api::list_contests))
            .route("/contests/:id", get(api::get_contest))
            .route(
                "/contests/:id/solution",
                put(api::set_solution_override).delete(api::clear_solution_override),
            )
            .route("/platforms", get(api::list_platforms))
            .route("/refresh", post(api::trigger_refresh))
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ContestStore,
    pub refresher: RefreshService,
}
