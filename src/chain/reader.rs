/// Chain Reader - read-only eth_call queries against the certificate contracts
use crate::{
    chain::abi,
    error::{PortalError, PortalResult},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// On-chain facts for one token id, fetched as a unit
///
/// Each field is independently absent when its read failed or the token does
/// not exist. `owner` absent after settlement is the not-found signal for
/// token mode. `error` carries the first transport failure, if any, so the
/// coordinator can tell "token missing" from "node unreachable".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainFacts {
    pub content_uri: Option<String>,
    pub owner: Option<String>,
    pub revoked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'a str,
    id: u32,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Read-only client for the certificate NFT and registry contracts
#[derive(Clone)]
pub struct ChainReader {
    http: reqwest::Client,
    rpc_url: String,
    cert_nft: Option<String>,
    registry: Option<String>,
}

impl ChainReader {
    pub fn new(
        http: reqwest::Client,
        rpc_url: String,
        cert_nft: Option<String>,
        registry: Option<String>,
    ) -> Self {
        Self {
            http,
            rpc_url,
            cert_nft,
            registry,
        }
    }

    /// Whether token-mode resolution is possible at all
    pub fn has_cert_contract(&self) -> bool {
        self.cert_nft.is_some()
    }

    pub fn has_registry_contract(&self) -> bool {
        self.registry.is_some()
    }

    /// `tokenURI(tokenId)` - None when the token does not exist
    pub async fn token_uri(&self, token_id: u128) -> PortalResult<Option<String>> {
        let to = self.cert_contract()?;
        let data = abi::encode_call_uint("tokenURI(uint256)", token_id);
        match self.eth_call(to, &data).await? {
            Some(payload) => Ok(Some(abi::decode_string(&payload)?)),
            None => Ok(None),
        }
    }

    /// `ownerOf(tokenId)` - None when the token does not exist
    pub async fn owner_of(&self, token_id: u128) -> PortalResult<Option<String>> {
        let to = self.cert_contract()?;
        let data = abi::encode_call_uint("ownerOf(uint256)", token_id);
        match self.eth_call(to, &data).await? {
            Some(payload) => Ok(Some(abi::decode_address(&payload)?)),
            None => Ok(None),
        }
    }

    /// `revoked(tokenId)` - None when the token does not exist
    pub async fn is_revoked(&self, token_id: u128) -> PortalResult<Option<bool>> {
        let to = self.cert_contract()?;
        let data = abi::encode_call_uint("revoked(uint256)", token_id);
        match self.eth_call(to, &data).await? {
            Some(payload) => Ok(Some(abi::decode_bool(&payload)?)),
            None => Ok(None),
        }
    }

    /// `getCIDs(owner)` against the registry contract
    pub async fn get_cids(&self, owner: &str) -> PortalResult<Vec<String>> {
        let to = self
            .registry
            .as_deref()
            .ok_or_else(|| PortalError::Config("Registry contract not configured".to_string()))?
            .to_string();
        let data = abi::encode_call_address("getCIDs(address)", owner)?;
        match self.eth_call(to, &data).await? {
            Some(payload) => abi::decode_string_array(&payload),
            None => Ok(Vec::new()),
        }
    }

    /// Fetch all three token facts and return only once every read settled
    ///
    /// The three queries are logically concurrent and unordered; acting on a
    /// partially settled view (e.g. declaring not-found while ownerOf is
    /// still pending) is the correctness hazard this method closes.
    pub async fn fetch_facts(&self, token_id: u128) -> ChainFacts {
        let (uri, owner, revoked) = futures::join!(
            self.token_uri(token_id),
            self.owner_of(token_id),
            self.is_revoked(token_id)
        );

        let mut facts = ChainFacts::default();
        match uri {
            Ok(v) => facts.content_uri = v,
            Err(e) => {
                tracing::warn!("tokenURI({}) failed: {}", token_id, e);
                facts.error.get_or_insert(e.to_string());
            }
        }
        match owner {
            Ok(v) => facts.owner = v,
            Err(e) => {
                tracing::warn!("ownerOf({}) failed: {}", token_id, e);
                facts.error.get_or_insert(e.to_string());
            }
        }
        match revoked {
            Ok(v) => facts.revoked = v,
            Err(e) => {
                tracing::warn!("revoked({}) failed: {}", token_id, e);
                facts.error.get_or_insert(e.to_string());
            }
        }
        facts
    }

    fn cert_contract(&self) -> PortalResult<String> {
        self.cert_nft
            .clone()
            .ok_or_else(|| PortalError::Config("Certificate contract not configured".to_string()))
    }

    /// Issue one eth_call. Ok(None) means the call reverted, which for these
    /// view functions is how the contract reports a nonexistent token.
    async fn eth_call(&self, to: String, data: &str) -> PortalResult<Option<Vec<u8>>> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_call",
            params: json!([{ "to": to, "data": data }, "latest"]),
        };

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PortalError::ChainRpc(format!("RPC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PortalError::ChainRpc(format!(
                "RPC node returned {}",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| PortalError::ChainRpc(format!("Invalid RPC response: {e}")))?;

        if let Some(err) = body.error {
            // Reverts surface as RPC-level errors; treat them as absence
            tracing::debug!("eth_call reverted (code {}): {}", err.code, err.message);
            return Ok(None);
        }

        match body.result.as_deref() {
            None | Some("0x") | Some("") => Ok(None),
            Some(payload) => Ok(Some(abi::decode_payload(payload)?)),
        }
    }
}
