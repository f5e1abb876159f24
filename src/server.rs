// src/server.rs

//! HTTP surface: manual trigger and read endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::error::Result;
use crate::models::Snapshot;
use crate::pipeline::{CycleReport, CycleRunner};

/// Build the router over a shared runner.
pub fn router(runner: Arc<CycleRunner>) -> Router {
    Router::new()
        .route("/trigger", post(trigger))
        .route("/items", get(items))
        .route("/snapshot", get(snapshot))
        .route("/health", get(health))
        .with_state(runner)
}

/// Bind `addr` and serve until the process stops.
pub async fn serve(runner: Arc<CycleRunner>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on {}", addr);
    axum::serve(listener, router(runner)).await?;
    Ok(())
}

/// Run one full cycle and report it. Waits behind an in-flight cycle.
async fn trigger(State(runner): State<Arc<CycleRunner>>) -> Json<CycleReport> {
    log::info!("Manual trigger received");
    Json(runner.run_cycle().await)
}

async fn items(State(runner): State<Arc<CycleRunner>>) -> Response {
    match runner.latest_items().await {
        Some(items) => Json(items).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no item data fetched yet" })),
        )
            .into_response(),
    }
}

async fn snapshot(State(runner): State<Arc<CycleRunner>>) -> Json<Snapshot> {
    Json(runner.snapshot().await)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
