/// Result Presenter - pure rendering of the coordinator's result slots
///
/// Builds the `VerificationView` the portal returns: badge, owner panel,
/// wallet listing, or content preview, depending on which slot is populated.
/// No network calls originate here and no decision logic beyond branching on
/// the content kind already decided at metadata-resolution time.
use crate::{
    metadata::{ContentKind, ResolvedMetadata},
    resolve::{
        coordinator::{FailureKind, ResolutionState},
        SearchMode,
    },
};
use serde::{Deserialize, Serialize};

/// Visual weight of a badge or notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Danger,
    Info,
    /// Legitimate negative result, not a failure
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
}

/// On-chain owner panel with an explorer link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerPanel {
    pub address: String,
    pub explorer_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
    pub title: String,
    pub recipient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint_transaction_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletPanel {
    pub count: u64,
    pub items: Vec<WalletItem>,
}

/// Content preview, branched on the kind decided at resolution time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPanel {
    /// The prefixed content URI shown as "source"
    pub source: String,
    pub kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<String>,
    /// Gateway-resolved artifact URL for Document and Image kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPanel {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
}

/// The rendered verification result: at most one primary result shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationView {
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Render the coordinator state into a view
pub fn render(state: &ResolutionState, explorer_base: &str, gateway_base: &str) -> VerificationView {
    let mut view = VerificationView {
        mode: state.mode,
        query: state.query.clone(),
        loading: state.in_flight,
        badge: None,
        owner: None,
        transaction: None,
        wallet: None,
        content: None,
        notice: None,
    };

    if let Some(txn) = &state.transaction {
        view.transaction = Some(TransactionPanel {
            verified: txn.verified,
            token_id: txn.certificate.as_ref().and_then(|c| c.token_id),
        });
        view.badge = Some(if txn.verified {
            Badge {
                text: "✅ TRANSACTION VALID".to_string(),
                tone: Tone::Success,
            }
        } else {
            Badge {
                text: "❌ TRANSACTION INVALID".to_string(),
                tone: Tone::Neutral,
            }
        });
    }

    if let Some(facts) = &state.chain {
        if let Some(owner) = &facts.owner {
            view.owner = Some(OwnerPanel {
                address: owner.clone(),
                explorer_url: format!("{}/address/{}", explorer_base.trim_end_matches('/'), owner),
            });
            view.badge = Some(match facts.revoked {
                Some(true) => Badge {
                    text: "⚠️ CERTIFICATE REVOKED".to_string(),
                    tone: Tone::Danger,
                },
                _ => Badge {
                    text: "✅ BLOCKCHAIN VERIFIED".to_string(),
                    tone: Tone::Success,
                },
            });
        }
    }

    if let Some(wallet) = &state.wallet {
        let items = wallet
            .certificates
            .iter()
            .map(|cert| WalletItem {
                token_id: cert.token_id,
                title: cert
                    .metadata
                    .as_ref()
                    .and_then(|m| m.title.clone())
                    .unwrap_or_else(|| "Certificate".to_string()),
                recipient_name: cert
                    .metadata
                    .as_ref()
                    .and_then(|m| m.recipient_name.clone())
                    .unwrap_or_else(|| "Unknown Owner".to_string()),
                mint_transaction_url: cert
                    .on_chain_data
                    .as_ref()
                    .and_then(|d| d.hash.as_ref())
                    .map(|hash| format!("{}/tx/{}", explorer_base.trim_end_matches('/'), hash)),
            })
            .collect::<Vec<_>>();

        if items.is_empty() {
            // explicit empty state, never a blank panel
            view.notice = Some(Notice {
                text: "No certificates found for this wallet".to_string(),
                tone: Tone::Neutral,
            });
        }
        view.wallet = Some(WalletPanel {
            count: wallet.count,
            items,
        });
    }

    if let Some(resolved) = &state.metadata {
        if state.mode == SearchMode::ContentId && view.badge.is_none() {
            view.badge = Some(Badge {
                text: "📁 IPFS DATA RETRIEVED".to_string(),
                tone: Tone::Info,
            });
        }
        view.content = Some(content_panel(resolved, gateway_base));
    }

    if let Some(failure) = &state.failure {
        view.notice = Some(Notice {
            text: failure.message.clone(),
            tone: match failure.kind {
                FailureKind::Transport => Tone::Danger,
                FailureKind::NotFound | FailureKind::NotConfigured => Tone::Neutral,
            },
        });
    }

    view
}

fn content_panel(resolved: &ResolvedMetadata, gateway_base: &str) -> ContentPanel {
    let doc = &resolved.document;
    let artifact_url = match resolved.kind {
        ContentKind::Structured => None,
        ContentKind::Document | ContentKind::Image => doc
            .image
            .as_ref()
            .map(|image| rewrite_to_gateway(gateway_base, image)),
    };

    ContentPanel {
        source: resolved.source.clone(),
        kind: resolved.kind,
        title: doc.name.clone(),
        recipient_name: doc.recipient_name.clone(),
        description: doc.description.clone(),
        issued_at: doc.issued_at.clone(),
        certificate_type: doc.certificate_type.clone(),
        artifact_url,
    }
}

fn rewrite_to_gateway(gateway_base: &str, uri: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(cid) => format!("{gateway_base}{cid}"),
        None => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        CertificateRef, OnChainData, TransactionResult, WalletCertificate,
        WalletCertificateMetadata, WalletResult,
    };
    use crate::chain::ChainFacts;
    use crate::metadata::{CredentialMetadata, ResolvedMetadata};
    use crate::resolve::coordinator::{FailureKind, ResolutionFailure, ResolutionState};

    const EXPLORER: &str = "https://sepolia.etherscan.io";
    const GATEWAY: &str = "https://gateway.pinata.cloud/ipfs/";

    fn token_state(owner: Option<&str>, revoked: Option<bool>) -> ResolutionState {
        ResolutionState {
            mode: SearchMode::Token,
            query: Some("4".to_string()),
            chain: Some(ChainFacts {
                content_uri: Some("ipfs://Qm1".to_string()),
                owner: owner.map(str::to_string),
                revoked,
                error: None,
            }),
            ..ResolutionState::default()
        }
    }

    fn metadata(image: Option<&str>, kind: ContentKind) -> ResolvedMetadata {
        ResolvedMetadata {
            source: "ipfs://Qm1".to_string(),
            kind,
            document: CredentialMetadata {
                name: Some("Rust 101".to_string()),
                description: Some("Completed the course".to_string()),
                recipient_name: Some("Alice".to_string()),
                recipient_email: None,
                issued_at: None,
                certificate_type: None,
                image: image.map(str::to_string),
                external_url: None,
                properties: None,
            },
        }
    }

    #[test]
    fn verified_token_renders_badge_and_owner_panel() {
        let mut state = token_state(Some("0xABC"), Some(false));
        state.metadata = Some(metadata(Some("ipfs://QmArt"), ContentKind::Image));

        let view = render(&state, EXPLORER, GATEWAY);
        assert!(view.badge.unwrap().text.contains("BLOCKCHAIN VERIFIED"));
        let owner = view.owner.unwrap();
        assert_eq!(owner.address, "0xABC");
        assert_eq!(
            owner.explorer_url,
            "https://sepolia.etherscan.io/address/0xABC"
        );
        let content = view.content.unwrap();
        assert_eq!(content.source, "ipfs://Qm1");
        assert_eq!(
            content.artifact_url.as_deref(),
            Some("https://gateway.pinata.cloud/ipfs/QmArt")
        );
    }

    #[test]
    fn revoked_token_renders_danger_badge() {
        let view = render(&token_state(Some("0xABC"), Some(true)), EXPLORER, GATEWAY);
        let badge = view.badge.unwrap();
        assert!(badge.text.contains("CERTIFICATE REVOKED"));
        assert_eq!(badge.tone, Tone::Danger);
    }

    #[test]
    fn not_found_is_a_neutral_notice_not_an_error() {
        let state = ResolutionState {
            mode: SearchMode::Token,
            query: Some("42".to_string()),
            failure: Some(ResolutionFailure {
                kind: FailureKind::NotFound,
                message: "Token ID #42 does not exist on the blockchain".to_string(),
            }),
            ..ResolutionState::default()
        };
        let view = render(&state, EXPLORER, GATEWAY);
        let notice = view.notice.unwrap();
        assert_eq!(notice.tone, Tone::Neutral);
        assert!(view.badge.is_none());
    }

    #[test]
    fn transport_failure_is_an_error_notice() {
        let state = ResolutionState {
            mode: SearchMode::ContentId,
            failure: Some(ResolutionFailure {
                kind: FailureKind::Transport,
                message: "Failed to fetch metadata".to_string(),
            }),
            ..ResolutionState::default()
        };
        let view = render(&state, EXPLORER, GATEWAY);
        assert_eq!(view.notice.unwrap().tone, Tone::Danger);
    }

    #[test]
    fn empty_wallet_renders_an_explicit_empty_state() {
        let state = ResolutionState {
            mode: SearchMode::WalletAddress,
            query: Some("0xholder".to_string()),
            wallet: Some(WalletResult {
                count: 0,
                certificates: vec![],
            }),
            ..ResolutionState::default()
        };
        let view = render(&state, EXPLORER, GATEWAY);
        let wallet = view.wallet.unwrap();
        assert_eq!(wallet.count, 0);
        assert!(wallet.items.is_empty());
        assert!(view
            .notice
            .unwrap()
            .text
            .contains("No certificates found"));
    }

    #[test]
    fn wallet_items_carry_titles_and_mint_links() {
        let state = ResolutionState {
            mode: SearchMode::WalletAddress,
            query: Some("0xholder".to_string()),
            wallet: Some(WalletResult {
                count: 1,
                certificates: vec![WalletCertificate {
                    token_id: Some(7),
                    metadata: Some(WalletCertificateMetadata {
                        title: Some("Rust 101".to_string()),
                        recipient_name: None,
                    }),
                    on_chain_data: Some(OnChainData {
                        hash: Some("0xmint".to_string()),
                    }),
                }],
            }),
            ..ResolutionState::default()
        };
        let view = render(&state, EXPLORER, GATEWAY);
        let item = &view.wallet.unwrap().items[0];
        assert_eq!(item.title, "Rust 101");
        assert_eq!(item.recipient_name, "Unknown Owner");
        assert_eq!(
            item.mint_transaction_url.as_deref(),
            Some("https://sepolia.etherscan.io/tx/0xmint")
        );
    }

    #[test]
    fn content_mode_gets_the_retrieval_badge() {
        let state = ResolutionState {
            mode: SearchMode::ContentId,
            query: Some("Qm1".to_string()),
            metadata: Some(metadata(None, ContentKind::Structured)),
            ..ResolutionState::default()
        };
        let view = render(&state, EXPLORER, GATEWAY);
        assert!(view.badge.unwrap().text.contains("IPFS DATA RETRIEVED"));
        let content = view.content.unwrap();
        assert_eq!(content.kind, ContentKind::Structured);
        assert!(content.artifact_url.is_none());
    }

    #[test]
    fn transaction_verdicts_render_both_ways() {
        let positive = ResolutionState {
            mode: SearchMode::TransactionHash,
            transaction: Some(TransactionResult {
                verified: true,
                certificate: Some(CertificateRef { token_id: Some(9) }),
            }),
            ..ResolutionState::default()
        };
        let view = render(&positive, EXPLORER, GATEWAY);
        assert!(view.badge.unwrap().text.contains("TRANSACTION VALID"));
        assert_eq!(view.transaction.unwrap().token_id, Some(9));

        let negative = ResolutionState {
            mode: SearchMode::TransactionHash,
            transaction: Some(TransactionResult {
                verified: false,
                certificate: None,
            }),
            ..ResolutionState::default()
        };
        let view = render(&negative, EXPLORER, GATEWAY);
        let badge = view.badge.unwrap();
        assert!(badge.text.contains("TRANSACTION INVALID"));
        assert_eq!(badge.tone, Tone::Neutral);
    }
}
