/// Metadata Resolver - fetches the credential document from content storage
///
/// Content identifiers are rewritten from `ipfs://` form to an HTTP(S)
/// gateway URL before fetching. Identifiers carrying the `bafymock` marker
/// resolve to a canned fixture document with no network I/O at all; that is
/// the built-in offline-demo path, not an error condition.
use crate::error::{PortalError, PortalResult};
use serde::{Deserialize, Serialize};

/// Offline-demo sentinel recognized inside content identifiers
pub const MOCK_CID_MARKER: &str = "bafymock";

const IPFS_SCHEME: &str = "ipfs://";

/// The JSON document describing one credential
///
/// Either fully present or absent with an accompanying error; never
/// partially populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<MetadataProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataProperties {
    #[serde(default)]
    pub files: Vec<FileRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// How the credential's content should be presented
///
/// Decided once at resolution time instead of re-derived from loose JSON at
/// render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// PDF-like artifact: embedded viewer plus download link
    Document,
    /// Inline image plus download link
    Image,
    /// No artwork reference; synthesize a certificate layout from fields
    Structured,
}

/// A fully resolved credential document plus presentation decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// The prefixed content URI actually used as the source of truth;
    /// this, not the raw user input, is what is displayed as "source"
    pub source: String,
    pub kind: ContentKind,
    pub document: CredentialMetadata,
}

impl CredentialMetadata {
    fn classify(&self) -> ContentKind {
        let pdf_image = self
            .image
            .as_deref()
            .map(|i| i.contains("pdf"))
            .unwrap_or(false);
        let pdf_file = self
            .properties
            .as_ref()
            .and_then(|p| p.files.first())
            .and_then(|f| f.kind.as_deref())
            .map(|k| k == "application/pdf")
            .unwrap_or(false);

        if pdf_image || pdf_file {
            ContentKind::Document
        } else if self.image.is_some() {
            ContentKind::Image
        } else {
            ContentKind::Structured
        }
    }
}

/// Fetches credential documents through the storage gateway
#[derive(Clone)]
pub struct MetadataResolver {
    http: reqwest::Client,
    gateway_base: String,
}

impl MetadataResolver {
    pub fn new(http: reqwest::Client, gateway_base: String) -> Self {
        Self { http, gateway_base }
    }

    /// Synthesize the `ipfs://` prefix for bare CIDs; pass URLs through
    pub fn normalize_uri(uri_or_cid: &str) -> String {
        let trimmed = uri_or_cid.trim();
        if trimmed.starts_with(IPFS_SCHEME)
            || trimmed.starts_with("http://")
            || trimmed.starts_with("https://")
        {
            trimmed.to_string()
        } else {
            format!("{IPFS_SCHEME}{trimmed}")
        }
    }

    /// Rewrite an `ipfs://` URI to the configured HTTP gateway
    pub fn gateway_url(&self, uri: &str) -> String {
        match uri.strip_prefix(IPFS_SCHEME) {
            Some(cid) => format!("{}{}", self.gateway_base, cid),
            None => uri.to_string(),
        }
    }

    /// Resolve a content URI or bare CID into a credential document
    pub async fn resolve(&self, uri_or_cid: &str) -> PortalResult<ResolvedMetadata> {
        let source = Self::normalize_uri(uri_or_cid);

        if source.contains(MOCK_CID_MARKER) {
            tracing::info!("Serving mock metadata for {}", source);
            let document = mock_document(&source);
            let kind = document.classify();
            return Ok(ResolvedMetadata {
                source,
                kind,
                document,
            });
        }

        let value = self.fetch_json(&source).await?;
        let document: CredentialMetadata = serde_json::from_value(value)
            .map_err(|e| PortalError::MetadataFetch(format!("Malformed metadata document: {e}")))?;
        let kind = document.classify();

        Ok(ResolvedMetadata {
            source,
            kind,
            document,
        })
    }

    /// Passthrough fetch used by the same-origin proxy route
    pub async fn fetch_raw(&self, url: &str) -> PortalResult<serde_json::Value> {
        let source = Self::normalize_uri(url);
        if source.contains(MOCK_CID_MARKER) {
            tracing::info!("Serving mock metadata for {}", source);
            return serde_json::to_value(mock_document(&source))
                .map_err(|e| PortalError::Internal(e.to_string()));
        }
        self.fetch_json(&source).await
    }

    async fn fetch_json(&self, source: &str) -> PortalResult<serde_json::Value> {
        let target = self.gateway_url(source);

        let response = self.http.get(&target).send().await.map_err(|e| {
            // Network exception: logged distinctly from HTTP-status failures
            tracing::error!("Metadata fetch failed for {}: {}", target, e);
            PortalError::MetadataFetch("Failed to fetch metadata".to_string())
        })?;

        if !response.status().is_success() {
            tracing::error!(
                "Metadata gateway returned {} for {}",
                response.status(),
                target
            );
            return Err(PortalError::MetadataFetch(
                "Failed to fetch metadata".to_string(),
            ));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Metadata document was not JSON for {}: {}", target, e);
            PortalError::MetadataFetch("Failed to fetch metadata".to_string())
        })
    }
}

/// Canned fixture document served for `bafymock` identifiers
fn mock_document(source: &str) -> CredentialMetadata {
    let tail = source.rsplit('/').next().unwrap_or(source);
    CredentialMetadata {
        name: Some("Test Certificate (Mock)".to_string()),
        description: Some(format!(
            "This is a mock certificate for testing purposes. Real metadata \
             could not be fetched for this mock CID ({tail})."
        )),
        recipient_name: Some("John Doe".to_string()),
        recipient_email: Some("john.doe@example.com".to_string()),
        issued_at: Some(chrono::Utc::now().to_rfc3339()),
        certificate_type: Some("completion".to_string()),
        image: Some("https://placehold.co/600x400/png?text=Certificate+NFT+Preview".to_string()),
        external_url: Some(String::new()),
        properties: Some(MetadataProperties::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};

    fn resolver(gateway: &str) -> MetadataResolver {
        MetadataResolver::new(reqwest::Client::new(), gateway.to_string())
    }

    async fn spawn_gateway() -> String {
        let app = Router::new().route(
            "/ipfs/Qm1",
            get(|| async {
                Json(serde_json::json!({
                    "name": "Rust 101",
                    "description": "Completed the course",
                    "recipient_name": "Alice",
                    "image": "ipfs://QmArt"
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/ipfs/")
    }

    #[test]
    fn bare_cid_gets_the_scheme_prefix() {
        assert_eq!(MetadataResolver::normalize_uri("Qm123"), "ipfs://Qm123");
        assert_eq!(
            MetadataResolver::normalize_uri("ipfs://Qm123"),
            "ipfs://Qm123"
        );
        assert_eq!(
            MetadataResolver::normalize_uri("https://example.com/meta.json"),
            "https://example.com/meta.json"
        );
    }

    #[test]
    fn ipfs_uris_are_rewritten_to_the_gateway() {
        let r = resolver("https://gateway.pinata.cloud/ipfs/");
        assert_eq!(
            r.gateway_url("ipfs://Qm1"),
            "https://gateway.pinata.cloud/ipfs/Qm1"
        );
        assert_eq!(r.gateway_url("https://x/y"), "https://x/y");
    }

    #[test]
    fn pdf_artifacts_classify_as_document() {
        let doc = CredentialMetadata {
            image: Some("ipfs://QmCert.pdf".to_string()),
            ..empty_doc()
        };
        assert_eq!(doc.classify(), ContentKind::Document);

        let doc = CredentialMetadata {
            image: None,
            properties: Some(MetadataProperties {
                files: vec![FileRef {
                    uri: None,
                    kind: Some("application/pdf".to_string()),
                }],
            }),
            ..empty_doc()
        };
        assert_eq!(doc.classify(), ContentKind::Document);
    }

    #[test]
    fn plain_image_classifies_as_image_and_bare_doc_as_structured() {
        let doc = CredentialMetadata {
            image: Some("ipfs://QmArt".to_string()),
            ..empty_doc()
        };
        assert_eq!(doc.classify(), ContentKind::Image);
        assert_eq!(empty_doc().classify(), ContentKind::Structured);
    }

    #[tokio::test]
    async fn mock_marker_resolves_without_network() {
        // Nothing listens on the discard port, so any I/O attempt would fail
        let r = resolver("http://127.0.0.1:9/ipfs/");
        let resolved = r.resolve("bafymock123").await.unwrap();
        assert_eq!(resolved.source, "ipfs://bafymock123");
        assert_eq!(
            resolved.document.name.as_deref(),
            Some("Test Certificate (Mock)")
        );
        assert_eq!(resolved.kind, ContentKind::Image);
    }

    #[tokio::test]
    async fn fetches_and_classifies_documents_from_the_gateway() {
        let gateway = spawn_gateway().await;
        let r = resolver(&gateway);

        let resolved = r.resolve("Qm1").await.unwrap();
        assert_eq!(resolved.source, "ipfs://Qm1");
        assert_eq!(resolved.document.name.as_deref(), Some("Rust 101"));
        assert_eq!(resolved.kind, ContentKind::Image);
    }

    #[tokio::test]
    async fn missing_content_surfaces_one_fetch_failed_message() {
        let gateway = spawn_gateway().await;
        let r = resolver(&gateway);

        let err = r.resolve("QmMissing").await.unwrap_err();
        match err {
            PortalError::MetadataFetch(msg) => assert_eq!(msg, "Failed to fetch metadata"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn empty_doc() -> CredentialMetadata {
        CredentialMetadata {
            name: None,
            description: None,
            recipient_name: None,
            recipient_email: None,
            issued_at: None,
            certificate_type: None,
            image: None,
            external_url: None,
            properties: None,
        }
    }
}
