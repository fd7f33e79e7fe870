/// Backend Query Client - REST calls against the certificate backend
///
/// Two calls participate in the verification workflow (wallet lookup and
/// transaction verification); the rest is the passthrough surface the portal
/// fronts for issuers (list, create, confirm, sync). Every call is fire-once
/// per submission: no retry, no polling.
use crate::error::{PortalError, PortalResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A certificate record as the backend stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: u64,
    pub recipient_name: String,
    pub recipient_email: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Paginated certificate listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedCertificates {
    #[serde(default)]
    pub data: Vec<Certificate>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: u32,
}

/// Result of a wallet-to-certificates lookup, populated atomically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletResult {
    pub count: u64,
    #[serde(default)]
    pub certificates: Vec<WalletCertificate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletCertificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<WalletCertificateMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_chain_data: Option<OnChainData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletCertificateMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Result of a transaction-hash verification
///
/// At most one certificate reference per transaction; on a positive verdict
/// with a token id the coordinator cascades into token-mode resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResult {
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
}

/// Fields for a new certificate record (multipart create)
#[derive(Debug, Clone, Default)]
pub struct NewCertificate {
    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_address: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub skip_blockchain: bool,
    /// Optional uploaded artifact: (filename, bytes)
    pub certificate_file: Option<(String, Vec<u8>)>,
}

/// HTTP client for the backend REST service
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /api/wallet/{address}/certificates`
    ///
    /// Cache-disabled so the answer reflects the latest on-chain sync, not a
    /// stale cached page.
    pub async fn wallet_certificates(&self, address: &str) -> PortalResult<WalletResult> {
        let url = format!(
            "{}/api/wallet/{}/certificates",
            self.base_url,
            urlencoding::encode(address)
        );
        let response = self
            .http
            .get(&url)
            .header("Pragma", "no-cache")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Wallet lookup failed for {}: {}", address, e);
                PortalError::Backend("Error connecting to server".to_string())
            })?;

        if !response.status().is_success() {
            return Err(PortalError::Backend(
                "Could not retrieve wallet data".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| PortalError::Backend(format!("Invalid wallet response: {e}")))
    }

    /// `POST /api/certificates/verify` with the hash in a JSON body
    pub async fn verify_transaction(&self, hash: &str) -> PortalResult<TransactionResult> {
        let url = format!("{}/api/certificates/verify", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "transaction_hash": hash }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Transaction verification request failed: {}", e);
                PortalError::Backend("Error connecting to verification service".to_string())
            })?;

        if !response.status().is_success() {
            return Err(PortalError::Backend(
                "Transaction verification failed".to_string(),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| PortalError::Backend(format!("Invalid verification response: {e}")))
    }

    /// `GET /api/certificates?page=N`
    pub async fn list_certificates(&self, page: u32) -> PortalResult<PaginatedCertificates> {
        let url = format!("{}/api/certificates?page={}", self.base_url, page);
        let response = self
            .http
            .get(&url)
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Certificate listing failed: {}", e);
                PortalError::Backend("Error connecting to server".to_string())
            })?;

        if !response.status().is_success() {
            return Err(PortalError::Backend(format!(
                "Failed to load certificates: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PortalError::Backend(format!("Invalid certificate listing: {e}")))
    }

    /// `POST /api/certificates` (multipart form)
    pub async fn create_certificate(&self, new: NewCertificate) -> PortalResult<Certificate> {
        let url = format!("{}/api/certificates", self.base_url);

        let mut form = reqwest::multipart::Form::new()
            .text("recipient_name", new.recipient_name)
            .text("recipient_email", new.recipient_email)
            .text("title", new.title);
        if let Some(address) = new.recipient_address {
            form = form.text("recipient_address", address);
        }
        if let Some(description) = new.description {
            form = form.text("description", description);
        }
        if new.skip_blockchain {
            form = form.text("skip_blockchain", "1");
        }
        if let Some((filename, bytes)) = new.certificate_file {
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(filename)
                .mime_str("application/pdf")
                .map_err(|e| PortalError::Internal(e.to_string()))?;
            form = form.part("certificate_file", part);
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Certificate creation failed: {}", e);
                PortalError::Backend("Error connecting to server".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PortalError::Backend(format!(
                "Create failed: {status} {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PortalError::Backend(format!("Invalid create response: {e}")))
    }

    /// `POST /api/certificates/{id}/confirm` with the mint transaction hash
    pub async fn confirm_certificate(&self, id: u64, transaction_hash: &str) -> PortalResult<()> {
        let url = format!("{}/api/certificates/{}/confirm", self.base_url, id);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "transaction_hash": transaction_hash }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Certificate confirmation failed: {}", e);
                PortalError::Backend("Error connecting to server".to_string())
            })?;

        if !response.status().is_success() {
            return Err(PortalError::Backend(format!(
                "Confirmation failed: {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// `POST /api/certificates/sync` - best-effort reconciliation trigger
    pub async fn sync(&self, address: &str) -> PortalResult<()> {
        let url = format!("{}/api/certificates/sync", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "address": address }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Sync trigger failed: {}", e);
                PortalError::Backend("Error connecting to server".to_string())
            })?;

        if !response.status().is_success() {
            return Err(PortalError::Backend(format!(
                "Sync failed: {}",
                response.status()
            )));
        }
        Ok(())
    }
}
