/// Identifier Normalizer - per-mode cleanup of raw user input
///
/// Returning `None` marks the submission as inert: not yet a valid query, so
/// nothing fires and nothing is shown. That is deliberately distinct from
/// "resolved and not found".
use crate::resolve::SearchMode;

/// Normalize raw input for the given mode, or reject it silently
pub fn normalize(mode: SearchMode, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match mode {
        SearchMode::Token => parse_token_id(trimmed).map(|_| trimmed.to_string()),
        // Prefix synthesis happens at fetch time; the stored value stays as typed
        SearchMode::ContentId => Some(trimmed.to_string()),
        SearchMode::WalletAddress => Some(trimmed.to_string()),
        SearchMode::TransactionHash => Some(extract_tx_hash(trimmed)),
    }
}

/// Token ids must parse as non-negative base-10 integers
pub fn parse_token_id(value: &str) -> Option<u128> {
    value.trim().parse::<u128>().ok()
}

/// Pull the hash segment out of a pasted block-explorer transaction URL
///
/// Best-effort convenience, not validation: anything without a `tx/` segment
/// is forwarded unchanged and malformed hashes surface as downstream errors.
fn extract_tx_hash(value: &str) -> String {
    match value.split_once("tx/") {
        Some((_, rest)) => {
            let end = rest.find(['?', '/']).unwrap_or(rest.len());
            rest[..end].to_string()
        }
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_mode_accepts_only_nonnegative_integers() {
        assert_eq!(normalize(SearchMode::Token, " 4 "), Some("4".to_string()));
        assert_eq!(normalize(SearchMode::Token, "0"), Some("0".to_string()));
        assert_eq!(normalize(SearchMode::Token, "abc"), None);
        assert_eq!(normalize(SearchMode::Token, "-1"), None);
        assert_eq!(normalize(SearchMode::Token, "1.5"), None);
        assert_eq!(normalize(SearchMode::Token, ""), None);
    }

    #[test]
    fn content_id_is_stored_as_typed() {
        assert_eq!(
            normalize(SearchMode::ContentId, " Qm123 "),
            Some("Qm123".to_string())
        );
        assert_eq!(
            normalize(SearchMode::ContentId, "ipfs://Qm123"),
            Some("ipfs://Qm123".to_string())
        );
        assert_eq!(normalize(SearchMode::ContentId, "  "), None);
    }

    #[test]
    fn wallet_address_is_passthrough_trimmed() {
        assert_eq!(
            normalize(SearchMode::WalletAddress, " 0xAbC "),
            Some("0xAbC".to_string())
        );
    }

    #[test]
    fn explorer_urls_lose_everything_but_the_hash() {
        assert_eq!(
            normalize(
                SearchMode::TransactionHash,
                "https://sepolia.etherscan.io/tx/0xdead?extra=1"
            ),
            Some("0xdead".to_string())
        );
        assert_eq!(
            normalize(
                SearchMode::TransactionHash,
                "https://sepolia.etherscan.io/tx/0xdead/logs"
            ),
            Some("0xdead".to_string())
        );
        // bare hashes pass through unchanged
        assert_eq!(
            normalize(SearchMode::TransactionHash, "0xbeef"),
            Some("0xbeef".to_string())
        );
        // malformed values are forwarded as-is, errors surface downstream
        assert_eq!(
            normalize(SearchMode::TransactionHash, "not-a-hash"),
            Some("not-a-hash".to_string())
        );
    }
}
