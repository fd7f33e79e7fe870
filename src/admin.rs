/// Admin allow-list and simulated-wallet development mode
///
/// Both are explicit construction-time configuration rather than ambient
/// environment reads, so the issuance routes are testable with injected fake
/// identities.
use crate::config::{AdminConfig, DevModeConfig};

/// Case-insensitive wallet allow-list gating issuance routes
#[derive(Debug, Clone)]
pub struct AdminRegistry {
    wallets: Vec<String>,
}

impl AdminRegistry {
    pub fn new(wallets: Vec<String>) -> Self {
        Self {
            wallets: wallets.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.wallets.clone())
    }

    pub fn is_admin(&self, address: Option<&str>) -> bool {
        match address {
            Some(addr) => self.wallets.contains(&addr.to_lowercase()),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

/// Simulated-wallet toggle for development
///
/// When enabled, requests without a wallet header act as the mock address so
/// the whole issuance flow can be exercised without a connected wallet.
#[derive(Debug, Clone)]
pub struct DevMode {
    enabled: bool,
    mock_address: String,
}

impl DevMode {
    pub fn from_config(config: &DevModeConfig) -> Self {
        Self {
            enabled: config.enabled,
            mock_address: config.mock_address.clone(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve the caller's effective identity: the presented wallet wins,
    /// the mock address fills in only under dev mode
    pub fn effective_identity(&self, presented: Option<&str>) -> Option<String> {
        match presented {
            Some(addr) if !addr.is_empty() => Some(addr.to_string()),
            _ if self.enabled => Some(self.mock_address.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MOCK_ADDRESS;

    #[test]
    fn allow_list_check_is_case_insensitive() {
        let registry = AdminRegistry::new(vec!["0xAbCd00000000000000000000000000000000aBcD".into()]);
        assert!(registry.is_admin(Some("0xabcd00000000000000000000000000000000abcd")));
        assert!(registry.is_admin(Some("0xABCD00000000000000000000000000000000ABCD")));
        assert!(!registry.is_admin(Some("0x1111111111111111111111111111111111111111")));
        assert!(!registry.is_admin(None));
    }

    #[test]
    fn dev_mode_substitutes_the_mock_identity() {
        let dev = DevMode {
            enabled: true,
            mock_address: DEFAULT_MOCK_ADDRESS.to_string(),
        };
        assert_eq!(
            dev.effective_identity(None).as_deref(),
            Some(DEFAULT_MOCK_ADDRESS)
        );
        assert_eq!(dev.effective_identity(Some("0x1")).as_deref(), Some("0x1"));

        let prod = DevMode {
            enabled: false,
            mock_address: DEFAULT_MOCK_ADDRESS.to_string(),
        };
        assert_eq!(prod.effective_identity(None), None);
        assert_eq!(prod.effective_identity(Some("")), None);
    }
}
