/// Certificate passthrough routes fronting the backend service
///
/// Issuance endpoints are gated by the admin wallet allow-list; the caller
/// presents its wallet in the `x-wallet-address` header, with the dev-mode
/// mock identity filling in when enabled.
use crate::{
    backend::{Certificate, NewCertificate, PaginatedCertificates},
    context::AppContext,
    error::{PortalError, PortalResult},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

pub const WALLET_HEADER: &str = "x-wallet-address";

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/certificates", get(list).post(create))
        .route("/api/certificates/:id/confirm", post(confirm))
        .route("/api/certificates/sync", post(sync))
        .route("/api/admin/cids", get(registry_cids))
}

/// Extract the caller identity and require allow-list membership
fn require_admin(ctx: &AppContext, headers: &HeaderMap) -> PortalResult<String> {
    let presented = headers
        .get(WALLET_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    let identity = ctx
        .dev_mode
        .effective_identity(presented)
        .ok_or_else(|| PortalError::Forbidden("No wallet presented".to_string()))?;

    if !ctx.admin.is_admin(Some(&identity)) {
        return Err(PortalError::Forbidden(format!(
            "Wallet {identity} is not an admin"
        )));
    }
    Ok(identity)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

async fn list(
    State(ctx): State<AppContext>,
    Query(params): Query<ListParams>,
) -> PortalResult<Json<PaginatedCertificates>> {
    let listing = ctx.backend.list_certificates(params.page).await?;
    Ok(Json(listing))
}

/// Multipart create, field-for-field what the backend expects
async fn create(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> PortalResult<Json<Certificate>> {
    let admin = require_admin(&ctx, &headers)?;

    let mut new = NewCertificate::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PortalError::InvalidInput(format!("Malformed form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "certificate_file" => {
                let filename = field
                    .file_name()
                    .unwrap_or("certificate.pdf")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| PortalError::InvalidInput(format!("Unreadable upload: {e}")))?;
                new.certificate_file = Some((filename, bytes.to_vec()));
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| PortalError::InvalidInput(format!("Malformed field: {e}")))?;
                match name.as_str() {
                    "recipient_name" => new.recipient_name = value,
                    "recipient_email" => new.recipient_email = value,
                    "recipient_address" => new.recipient_address = Some(value),
                    "title" => new.title = value,
                    "description" => new.description = Some(value),
                    "skip_blockchain" => new.skip_blockchain = value == "1" || value == "true",
                    other => {
                        tracing::debug!("Ignoring unknown form field {}", other);
                    }
                }
            }
        }
    }

    if new.recipient_name.is_empty() || new.recipient_email.is_empty() || new.title.is_empty() {
        return Err(PortalError::InvalidInput(
            "recipient_name, recipient_email and title are required".to_string(),
        ));
    }

    tracing::info!("Admin {} creating certificate '{}'", admin, new.title);
    let created = ctx.backend.create_certificate(new).await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
struct ConfirmBody {
    transaction_hash: String,
}

async fn confirm(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<ConfirmBody>,
) -> PortalResult<Json<serde_json::Value>> {
    require_admin(&ctx, &headers)?;
    ctx.backend
        .confirm_certificate(id, &body.transaction_hash)
        .await?;
    Ok(Json(json!({ "confirmed": true })))
}

#[derive(Debug, Deserialize)]
struct SyncBody {
    address: String,
}

async fn sync(
    State(ctx): State<AppContext>,
    Json(body): Json<SyncBody>,
) -> PortalResult<Json<serde_json::Value>> {
    // Best-effort reconciliation trigger; open to holders as well as admins
    ctx.backend.sync(&body.address).await?;
    Ok(Json(json!({ "synced": true })))
}

#[derive(Debug, Deserialize)]
struct CidsParams {
    owner: String,
}

/// Registry `getCIDs(owner)` lookup for the admin console
async fn registry_cids(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(params): Query<CidsParams>,
) -> PortalResult<Json<serde_json::Value>> {
    require_admin(&ctx, &headers)?;
    let cids = ctx.chain.get_cids(&params.owner).await?;
    Ok(Json(json!({ "owner": params.owner, "cids": cids })))
}
