/// Application context and dependency injection
use crate::{
    admin::{AdminRegistry, DevMode},
    backend::BackendClient,
    chain::ChainReader,
    config::PortalConfig,
    error::{PortalError, PortalResult},
    metadata::MetadataResolver,
    resolve::coordinator::Coordinator,
};
use std::sync::Arc;
use std::time::Duration;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<PortalConfig>,
    pub chain: ChainReader,
    pub metadata: MetadataResolver,
    pub backend: BackendClient,
    pub admin: AdminRegistry,
    pub dev_mode: DevMode,
}

impl AppContext {
    /// Create a new application context from configuration
    pub fn new(config: PortalConfig) -> PortalResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(format!("CertPortal/{}", config.service.version))
            .timeout(Duration::from_secs(config.service.request_timeout_secs))
            .build()
            .map_err(|e| PortalError::Internal(format!("Failed to create HTTP client: {e}")))?;

        let chain = ChainReader::new(
            http.clone(),
            config.chain.rpc_url.clone(),
            config.chain.cert_nft_address.clone(),
            config.chain.registry_address.clone(),
        );
        let metadata = MetadataResolver::new(http.clone(), config.gateway.base_url.clone());
        let backend = BackendClient::new(http, config.backend.base_url.clone());
        let admin = AdminRegistry::from_config(&config.admin);
        let dev_mode = DevMode::from_config(&config.dev_mode);

        if chain.has_cert_contract() {
            tracing::info!("Token-mode verification enabled");
        } else {
            tracing::warn!("Certificate contract address missing - token mode disabled");
        }

        Ok(Self {
            config: Arc::new(config),
            chain,
            metadata,
            backend,
            admin,
            dev_mode,
        })
    }

    /// Fresh resolution coordinator, one per verification request
    ///
    /// Keeping the coordinator per-request makes every resolution mode-pure
    /// by construction; nothing can leak from a previous caller.
    pub fn coordinator(&self) -> Coordinator {
        Coordinator::new(
            self.chain.clone(),
            self.metadata.clone(),
            self.backend.clone(),
        )
    }

    pub fn service_addr(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
