/// Public verification endpoint driving the resolution coordinator
///
/// Query parameters mirror the original portal's URL scheme: `mode` plus one
/// of `id` (token), `cid` (content), `address` (wallet), `hash`
/// (transaction). When `mode` is omitted it is inferred from whichever
/// identifier parameter is present.
use crate::{
    context::AppContext,
    error::{PortalError, PortalResult},
    presenter::{self, VerificationView},
    resolve::SearchMode,
};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/verify", get(verify))
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    mode: Option<String>,
    id: Option<String>,
    cid: Option<String>,
    address: Option<String>,
    hash: Option<String>,
}

impl VerifyParams {
    /// Pick the active mode and its raw input
    fn resolve_input(&self) -> PortalResult<(SearchMode, &str)> {
        if let Some(mode) = &self.mode {
            let mode: SearchMode = mode
                .parse()
                .map_err(|_| PortalError::InvalidInput(format!("Unknown mode: {mode}")))?;
            let raw = match mode {
                SearchMode::Token => self.id.as_deref(),
                SearchMode::ContentId => self.cid.as_deref(),
                SearchMode::WalletAddress => self.address.as_deref(),
                SearchMode::TransactionHash => self.hash.as_deref(),
            };
            return raw.map(|r| (mode, r)).ok_or_else(|| {
                PortalError::InvalidInput(format!("Missing identifier for mode {mode}"))
            });
        }

        // No explicit mode: infer from the identifier parameter
        if let Some(id) = &self.id {
            Ok((SearchMode::Token, id))
        } else if let Some(cid) = &self.cid {
            Ok((SearchMode::ContentId, cid))
        } else if let Some(address) = &self.address {
            Ok((SearchMode::WalletAddress, address))
        } else if let Some(hash) = &self.hash {
            Ok((SearchMode::TransactionHash, hash))
        } else {
            Err(PortalError::InvalidInput(
                "No identifier provided".to_string(),
            ))
        }
    }
}

async fn verify(
    State(ctx): State<AppContext>,
    Query(params): Query<VerifyParams>,
) -> PortalResult<Json<VerificationView>> {
    let (mode, raw) = params.resolve_input()?;

    let coordinator = ctx.coordinator();
    let state = coordinator.resolve(mode, raw).await;

    let view = presenter::render(
        &state,
        &ctx.config.chain.explorer_url,
        &ctx.config.gateway.base_url,
    );
    Ok(Json(view))
}
