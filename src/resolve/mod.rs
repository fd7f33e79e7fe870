/// Multi-mode credential resolution: normalization and orchestration
pub mod coordinator;
pub mod normalize;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four heterogeneous identifier types a credential can be resolved by
///
/// Exactly one mode is active at a time; switching modes clears every result
/// slot so stale results from a previous mode can never leak through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Token,
    #[serde(rename = "ipfs")]
    ContentId,
    #[serde(rename = "wallet")]
    WalletAddress,
    #[serde(rename = "txn")]
    TransactionHash,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchMode::Token => "token",
            SearchMode::ContentId => "ipfs",
            SearchMode::WalletAddress => "wallet",
            SearchMode::TransactionHash => "txn",
        };
        f.write_str(s)
    }
}

impl FromStr for SearchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(SearchMode::Token),
            "ipfs" => Ok(SearchMode::ContentId),
            "wallet" => Ok(SearchMode::WalletAddress),
            "txn" => Ok(SearchMode::TransactionHash),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_round_trip() {
        for mode in [
            SearchMode::Token,
            SearchMode::ContentId,
            SearchMode::WalletAddress,
            SearchMode::TransactionHash,
        ] {
            assert_eq!(mode.to_string().parse::<SearchMode>(), Ok(mode));
        }
        assert!("nft".parse::<SearchMode>().is_err());
    }
}
