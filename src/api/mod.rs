//! HTTP layer exposing the estimator and the run history.

pub mod routes;
pub mod types;

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{config::Settings, session::RunHistory};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub history: Arc<Mutex<RunHistory>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let history = RunHistory::with_retention(settings.history_retention);
        Self {
            settings,
            history: Arc::new(Mutex::new(history)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/estimate", post(routes::estimate))
        .route("/history", get(routes::history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let router = router(AppState::new(settings));

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving confusion-estimator API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
