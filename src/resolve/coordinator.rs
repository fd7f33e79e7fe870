/// Resolution Coordinator - the state machine behind the verification portal
///
/// Owns the active search mode and the four mutually exclusive result slots,
/// decides which collaborators to invoke per submission, and merges their
/// settlements into one terminal state. All business logic of record lives in
/// the contract and the backend; this is orchestration with defined
/// precedence, error, and loading semantics.
use crate::{
    backend::{BackendClient, TransactionResult, WalletResult},
    chain::{ChainFacts, ChainReader},
    error::PortalError,
    metadata::{MetadataResolver, ResolvedMetadata},
    resolve::{normalize, SearchMode},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// How a surfaced failure should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network or non-2xx from a collaborator: red banner, logged with cause
    Transport,
    /// Chain-confirmed absence after full settlement: neutral status
    NotFound,
    /// Feature path disabled by configuration: neutral status
    NotConfigured,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ResolutionFailure {
    /// Whether this failure warrants an error banner rather than a status badge
    pub fn is_error(&self) -> bool {
        self.kind == FailureKind::Transport
    }
}

/// The coordinator's externally visible state: one slot per result shape
///
/// Slots are owned exclusively by the coordinator and reset as a unit on mode
/// switch or new submission, never partially mutated. The presenter only
/// reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionState {
    pub mode: SearchMode,
    /// Normalized input for the active mode; immutable until next submission
    pub query: Option<String>,
    pub chain: Option<ChainFacts>,
    pub metadata: Option<ResolvedMetadata>,
    pub wallet: Option<WalletResult>,
    pub transaction: Option<TransactionResult>,
    pub failure: Option<ResolutionFailure>,
    pub in_flight: bool,
}

impl ResolutionState {
    fn reset_for(mode: SearchMode, query: Option<String>, in_flight: bool) -> Self {
        ResolutionState {
            mode,
            query,
            in_flight,
            ..ResolutionState::default()
        }
    }
}

/// Orchestrates the chain reader, metadata resolver and backend client
pub struct Coordinator {
    chain: ChainReader,
    metadata: MetadataResolver,
    backend: BackendClient,
    state: Mutex<ResolutionState>,
    /// Per-submission token: a settlement whose generation no longer matches
    /// the latest submission is discarded instead of clobbering newer results
    generation: AtomicU64,
    /// Single-entry cache keying the chained metadata fetch to its content
    /// URI, so re-settling an unchanged URI does not refire the fetch
    metadata_cache: Mutex<Option<ResolvedMetadata>>,
}

impl Coordinator {
    pub fn new(chain: ChainReader, metadata: MetadataResolver, backend: BackendClient) -> Self {
        Self {
            chain,
            metadata,
            backend,
            state: Mutex::new(ResolutionState::default()),
            generation: AtomicU64::new(0),
            metadata_cache: Mutex::new(None),
        }
    }

    /// Switch the active search mode, clearing all result slots
    pub async fn set_mode(&self, mode: SearchMode) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        *state = ResolutionState::reset_for(mode, None, false);
    }

    /// Current state snapshot
    pub async fn snapshot(&self) -> ResolutionState {
        self.state.lock().await.clone()
    }

    /// Loading flag: true while any dispatched path (including a chained
    /// metadata sub-fetch) has not fully settled
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.in_flight
    }

    /// One-shot entry point: set the mode, then submit
    pub async fn resolve(&self, mode: SearchMode, raw_input: &str) -> ResolutionState {
        self.set_mode(mode).await;
        self.submit(raw_input).await
    }

    /// Run one submission to settlement and return the resulting state
    ///
    /// Re-entrant: a second submission while the first is in flight simply
    /// supersedes it; the stale submission's settlements are discarded by the
    /// generation check.
    pub async fn submit(&self, raw_input: &str) -> ResolutionState {
        let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mode = self.state.lock().await.mode;
        let Some(query) = normalize::normalize(mode, raw_input) else {
            // Not a valid query yet: inert, no dispatch, no error
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) == gen {
                *state = ResolutionState::reset_for(mode, None, false);
            }
            return state.clone();
        };

        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != gen {
                return state.clone();
            }
            *state = ResolutionState::reset_for(mode, Some(query.clone()), true);
        }

        self.dispatch(mode, &query, gen).await;
        self.finish(gen).await;
        self.snapshot().await
    }

    async fn dispatch(&self, mode: SearchMode, query: &str, gen: u64) {
        match mode {
            SearchMode::Token => match normalize::parse_token_id(query) {
                Some(token_id) => self.run_token_path(token_id, gen).await,
                None => {}
            },
            SearchMode::ContentId => self.run_content_path(query, gen).await,
            SearchMode::WalletAddress => self.run_wallet_path(query, gen).await,
            SearchMode::TransactionHash => self.run_transaction_path(query, gen).await,
        }
    }

    /// Token mode: three chain reads, then a chained metadata fetch
    ///
    /// The not-found decision is taken only once all three reads have
    /// settled; `fetch_facts` returns nothing earlier.
    async fn run_token_path(&self, token_id: u128, gen: u64) {
        if !self.chain.has_cert_contract() {
            self.store_failure(
                gen,
                FailureKind::NotConfigured,
                "On-chain verification is not configured".to_string(),
            )
            .await;
            return;
        }

        let facts = self.chain.fetch_facts(token_id).await;
        let transport_error = facts.error.clone();
        let owner_present = facts.owner.is_some();
        let content_uri = facts.content_uri.clone();

        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != gen {
                return;
            }
            state.chain = Some(facts);
        }

        if !owner_present {
            match transport_error {
                Some(cause) => {
                    self.store_failure(gen, FailureKind::Transport, cause).await;
                }
                None => {
                    self.store_failure(
                        gen,
                        FailureKind::NotFound,
                        format!("Token ID #{token_id} does not exist on the blockchain"),
                    )
                    .await;
                }
            }
            return;
        }

        // Owner present, no content URI: settle as found-without-metadata
        // (owner and revocation display only), no fetch attempt.
        if let Some(uri) = content_uri {
            self.fetch_metadata_once(&uri, gen).await;
        }
    }

    async fn run_content_path(&self, cid: &str, gen: u64) {
        self.fetch_metadata_once(cid, gen).await;
    }

    async fn run_wallet_path(&self, address: &str, gen: u64) {
        match self.backend.wallet_certificates(address).await {
            Ok(result) => {
                let mut state = self.state.lock().await;
                if self.generation.load(Ordering::SeqCst) != gen {
                    return;
                }
                state.wallet = Some(result);
            }
            Err(e) => {
                tracing::error!("Wallet lookup failed: {}", e);
                self.store_failure(gen, FailureKind::Transport, user_message(e))
                    .await;
            }
        }
    }

    /// Transaction mode, including the one multi-step control flow in the
    /// system: a positive verdict with a token reference cascades directly
    /// into the token path (no timers, no indirection).
    async fn run_transaction_path(&self, hash: &str, gen: u64) {
        let result = match self.backend.verify_transaction(hash).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Transaction verification failed: {}", e);
                self.store_failure(gen, FailureKind::Transport, user_message(e))
                    .await;
                return;
            }
        };

        let cascade_token = if result.verified {
            result.certificate.as_ref().and_then(|c| c.token_id)
        } else {
            None
        };

        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != gen {
                return;
            }
            state.transaction = Some(result);
        }

        if let Some(token_id) = cascade_token {
            self.cascade_to_token(token_id, gen).await;
        }
    }

    /// Cross-mode cascade: flip to token mode with the discovered id and
    /// re-enter the standard token dispatch
    async fn cascade_to_token(&self, token_id: u64, gen: u64) {
        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != gen {
                return;
            }
            *state =
                ResolutionState::reset_for(SearchMode::Token, Some(token_id.to_string()), true);
        }
        tracing::info!("Transaction verdict cascades to token {}", token_id);
        self.run_token_path(u128::from(token_id), gen).await;
    }

    /// Chained metadata fetch, fired at most once per distinct content URI
    async fn fetch_metadata_once(&self, uri_or_cid: &str, gen: u64) {
        let source = MetadataResolver::normalize_uri(uri_or_cid);

        {
            let cache = self.metadata_cache.lock().await;
            if let Some(cached) = cache.as_ref().filter(|m| m.source == source) {
                let resolved = cached.clone();
                drop(cache);
                let mut state = self.state.lock().await;
                if self.generation.load(Ordering::SeqCst) != gen {
                    return;
                }
                state.metadata = Some(resolved);
                return;
            }
        }

        match self.metadata.resolve(&source).await {
            Ok(resolved) => {
                *self.metadata_cache.lock().await = Some(resolved.clone());
                let mut state = self.state.lock().await;
                if self.generation.load(Ordering::SeqCst) != gen {
                    return;
                }
                state.metadata = Some(resolved);
            }
            Err(e) => {
                tracing::error!("Metadata resolution failed for {}: {}", source, e);
                self.store_failure(gen, FailureKind::Transport, user_message(e))
                    .await;
            }
        }
    }

    async fn store_failure(&self, gen: u64, kind: FailureKind, message: String) {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != gen {
            return;
        }
        state.failure = Some(ResolutionFailure { kind, message });
    }

    async fn finish(&self, gen: u64) {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) == gen {
            state.in_flight = false;
        }
    }
}

/// Collapse transport errors to their user-visible message
fn user_message(e: PortalError) -> String {
    match e {
        PortalError::MetadataFetch(msg)
        | PortalError::Backend(msg)
        | PortalError::ChainRpc(msg)
        | PortalError::Config(msg) => msg,
        other => other.to_string(),
    }
}
