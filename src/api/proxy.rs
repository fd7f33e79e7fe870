/// Same-origin metadata proxy
///
/// Browsers cannot fetch gateway content from a static-hosting origin
/// without tripping cross-origin and mixed-content restrictions, so the
/// portal fetches on their behalf. Status codes and error bodies mirror the
/// route this replaces: 400 for a missing URL, 500 for a failed fetch.
use crate::context::AppContext;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/proxy-metadata", get(proxy_metadata))
}

#[derive(Debug, Deserialize)]
struct ProxyParams {
    url: Option<String>,
}

async fn proxy_metadata(
    State(ctx): State<AppContext>,
    Query(params): Query<ProxyParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No URL provided" })),
        ));
    };

    match ctx.metadata.fetch_raw(&url).await {
        Ok(value) => Ok(Json(value)),
        Err(e) => {
            tracing::error!("Proxy error for {}: {}", url, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch metadata" })),
            ))
        }
    }
}
