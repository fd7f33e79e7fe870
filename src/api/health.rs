/// Health check endpoint
use crate::context::AppContext;
use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::json;

pub fn routes() -> Router<AppContext> {
    Router::new().route("/health", get(health))
}

async fn health(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "token_mode": ctx.chain.has_cert_contract(),
        "registry": ctx.chain.has_registry_contract(),
    }))
}
