/// Configuration management for the certificate portal
use crate::error::{PortalError, PortalResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main portal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    pub service: ServiceConfig,
    pub chain: ChainConfig,
    pub backend: BackendConfig,
    pub gateway: GatewayConfig,
    pub admin: AdminConfig,
    pub dev_mode: DevModeConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
    /// Timeout applied to every outbound HTTP call, in seconds
    pub request_timeout_secs: u64,
}

/// Ledger access configuration
///
/// Either contract address may be absent; the corresponding feature path is
/// disabled rather than the service refusing to start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the EVM node
    pub rpc_url: String,
    /// Certificate NFT contract (tokenURI / ownerOf / revoked)
    pub cert_nft_address: Option<String>,
    /// Simple registry contract (issue / getCIDs)
    pub registry_address: Option<String>,
    /// Block explorer base URL used for outbound links
    pub explorer_url: String,
}

/// Backend REST service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

/// Content-addressed storage gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP(S) gateway prefix that ipfs:// URIs are rewritten to
    pub base_url: String,
}

/// Admin allow-list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Wallet addresses allowed to use issuance routes (stored lowercase)
    pub wallets: Vec<String>,
}

/// Simulated-wallet development mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevModeConfig {
    pub enabled: bool,
    /// Identity assumed when dev mode is on and no wallet header is sent
    pub mock_address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Default Hardhat Account #0, same stand-in the original dev mode used
pub const DEFAULT_MOCK_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

impl PortalConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> PortalResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("PORTAL_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("PORTAL_PORT")
            .unwrap_or_else(|_| "3100".to_string())
            .parse()
            .map_err(|_| PortalError::Config("Invalid port number".to_string()))?;
        let version = env::var("PORTAL_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let request_timeout_secs = env::var("PORTAL_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let rpc_url = env::var("PORTAL_CHAIN_RPC_URL")
            .unwrap_or_else(|_| "https://rpc.sepolia.org".to_string());
        let cert_nft_address = env::var("PORTAL_CERTNFT_ADDRESS")
            .ok()
            .and_then(|a| normalize_address(&a));
        let registry_address = env::var("PORTAL_CERT_ADDRESS")
            .ok()
            .and_then(|a| normalize_address(&a));
        let explorer_url = env::var("PORTAL_EXPLORER_URL")
            .unwrap_or_else(|_| "https://sepolia.etherscan.io".to_string());

        let backend_base_url = env::var("PORTAL_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        let gateway_base_url = env::var("PORTAL_IPFS_GATEWAY_URL")
            .unwrap_or_else(|_| "https://gateway.pinata.cloud/ipfs/".to_string());

        // Parse admin wallets from comma-separated list, case-insensitive
        let admin_wallets = parse_admin_wallets(
            &env::var("PORTAL_ADMIN_WALLETS").unwrap_or_else(|_| String::new()),
        );

        let dev_mode_enabled = env::var("PORTAL_DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);
        let mock_address = env::var("PORTAL_DEV_MOCK_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_MOCK_ADDRESS.to_string());

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(PortalConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
                request_timeout_secs,
            },
            chain: ChainConfig {
                rpc_url,
                cert_nft_address,
                registry_address,
                explorer_url,
            },
            backend: BackendConfig {
                base_url: backend_base_url,
            },
            gateway: GatewayConfig {
                base_url: gateway_base_url,
            },
            admin: AdminConfig {
                wallets: admin_wallets,
            },
            dev_mode: DevModeConfig {
                enabled: dev_mode_enabled,
                mock_address,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> PortalResult<()> {
        if self.service.hostname.is_empty() {
            return Err(PortalError::Config("Hostname cannot be empty".to_string()));
        }

        if self.backend.base_url.is_empty() {
            return Err(PortalError::Config(
                "Backend base URL cannot be empty".to_string(),
            ));
        }

        if !self.gateway.base_url.starts_with("http") {
            return Err(PortalError::Config(
                "IPFS gateway URL must be http(s)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse a comma-separated admin wallet list into lowercase entries
pub fn parse_admin_wallets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Accept an address only if it carries the 0x prefix, mirroring the
/// original's contract-address gate. Anything else disables the feature.
fn normalize_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with("0x") && trimmed.len() == 42 {
        Some(trimmed.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_wallets_are_lowercased_and_trimmed() {
        let wallets = parse_admin_wallets(" 0xABCdef0000000000000000000000000000000001 ,, 0x02 ");
        assert_eq!(
            wallets,
            vec![
                "0xabcdef0000000000000000000000000000000001".to_string(),
                "0x02".to_string()
            ]
        );
    }

    #[test]
    fn empty_admin_list_parses_to_empty_vec() {
        assert!(parse_admin_wallets("").is_empty());
        assert!(parse_admin_wallets(" , ,").is_empty());
    }

    #[test]
    fn malformed_contract_address_is_dropped_not_fatal() {
        assert_eq!(normalize_address("not-an-address"), None);
        assert_eq!(normalize_address("0xshort"), None);
        let ok = "0x00000000000000000000000000000000000000aa";
        assert_eq!(normalize_address(ok), Some(ok.to_string()));
    }
}
