/// API routes and handlers
pub mod certificates;
pub mod health;
pub mod proxy;
pub mod verify;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(verify::routes())
        .merge(proxy::routes())
        .merge(certificates::routes())
}
