/// Minimal ABI codec for the fixed certificate contract surface
///
/// The portal only ever talks to two known contracts, so a full ABI library
/// is not warranted. Encoded/decoded here:
///
/// Certificate NFT (read): `tokenURI(uint256) -> string`,
/// `ownerOf(uint256) -> address`, `revoked(uint256) -> bool`.
/// Registry (read): `getCIDs(address) -> string[]`.
///
/// The write half of the surface (`mint(address,string) -> uint256`,
/// `revoke(uint256)`, `issue(address,string)`) is signed in the holder's
/// wallet, never by this service, and is listed here only for completeness.
use crate::error::{PortalError, PortalResult};
use sha3::{Digest, Keccak256};

const WORD: usize = 32;

/// First four bytes of the Keccak-256 hash of the canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encode a single-uint256 call as 0x-prefixed calldata
pub fn encode_call_uint(signature: &str, value: u128) -> String {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector(signature));
    let mut word = [0u8; WORD];
    word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
    data.extend_from_slice(&word);
    format!("0x{}", hex::encode(data))
}

/// Encode a single-address call as 0x-prefixed calldata
pub fn encode_call_address(signature: &str, address: &str) -> PortalResult<String> {
    let raw = address.strip_prefix("0x").unwrap_or(address);
    let bytes = hex::decode(raw)
        .map_err(|_| PortalError::InvalidInput(format!("Invalid address: {address}")))?;
    if bytes.len() != 20 {
        return Err(PortalError::InvalidInput(format!(
            "Invalid address length: {address}"
        )));
    }
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector(signature));
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(&bytes);
    data.extend_from_slice(&word);
    Ok(format!("0x{}", hex::encode(data)))
}

/// Decode a 0x-prefixed hex return payload into raw bytes
pub fn decode_payload(result: &str) -> PortalResult<Vec<u8>> {
    let raw = result.strip_prefix("0x").unwrap_or(result);
    hex::decode(raw).map_err(|e| PortalError::ChainRpc(format!("Invalid return payload: {e}")))
}

fn read_word(bytes: &[u8], at: usize) -> PortalResult<&[u8]> {
    bytes
        .get(at..at + WORD)
        .ok_or_else(|| PortalError::ChainRpc("Truncated return payload".to_string()))
}

fn read_usize(bytes: &[u8], at: usize) -> PortalResult<usize> {
    let word = read_word(bytes, at)?;
    // Offsets and lengths past 2^64 are nonsense for call returns
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(PortalError::ChainRpc("Oversized ABI word".to_string()));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(buf) as usize)
}

/// Decode a dynamic string return (head offset, length, UTF-8 data)
pub fn decode_string(bytes: &[u8]) -> PortalResult<String> {
    let offset = read_usize(bytes, 0)?;
    decode_string_at(bytes, offset)
}

fn decode_string_at(bytes: &[u8], at: usize) -> PortalResult<String> {
    let len = read_usize(bytes, at)?;
    let data = bytes
        .get(at + WORD..at + WORD + len)
        .ok_or_else(|| PortalError::ChainRpc("Truncated string payload".to_string()))?;
    String::from_utf8(data.to_vec())
        .map_err(|e| PortalError::ChainRpc(format!("Non-UTF-8 string payload: {e}")))
}

/// Decode an address return word as lowercase 0x hex
pub fn decode_address(bytes: &[u8]) -> PortalResult<String> {
    let word = read_word(bytes, 0)?;
    Ok(format!("0x{}", hex::encode(&word[WORD - 20..])))
}

/// Decode a bool return word
pub fn decode_bool(bytes: &[u8]) -> PortalResult<bool> {
    let word = read_word(bytes, 0)?;
    Ok(word.iter().any(|b| *b != 0))
}

/// Decode a `string[]` return (offset, length, per-element offsets)
pub fn decode_string_array(bytes: &[u8]) -> PortalResult<Vec<String>> {
    let base = read_usize(bytes, 0)?;
    let count = read_usize(bytes, base)?;
    // each element needs at least a head word; a count the payload cannot
    // hold must fail before the allocation, not during it
    if count > bytes.len() / WORD {
        return Err(PortalError::ChainRpc("Oversized ABI array".to_string()));
    }
    let heads = base + WORD;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let rel = read_usize(bytes, heads + i * WORD)?;
        out.push(decode_string_at(bytes, heads + rel)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known ERC-721 selectors
    #[test]
    fn selectors_match_erc721_constants() {
        assert_eq!(hex::encode(selector("ownerOf(uint256)")), "6352211e");
        assert_eq!(hex::encode(selector("tokenURI(uint256)")), "c87b56dd");
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
    }

    #[test]
    fn uint_call_is_selector_plus_padded_word() {
        let data = encode_call_uint("ownerOf(uint256)", 4);
        assert_eq!(
            data,
            "0x6352211e0000000000000000000000000000000000000000000000000000000000000004"
        );
    }

    #[test]
    fn address_call_pads_to_32_bytes() {
        let data =
            encode_call_address("balanceOf(address)", "0x00000000000000000000000000000000000000aa")
                .unwrap();
        assert!(data.starts_with("0x70a08231"));
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.ends_with("00aa"));
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(encode_call_address("balanceOf(address)", "0x1234").is_err());
        assert!(encode_call_address("balanceOf(address)", "zz").is_err());
    }

    fn encode_string_return(s: &str) -> Vec<u8> {
        let mut out = vec![0u8; WORD];
        out[WORD - 1] = 32; // head offset
        let mut len_word = [0u8; WORD];
        len_word[WORD - 8..].copy_from_slice(&(s.len() as u64).to_be_bytes());
        out.extend_from_slice(&len_word);
        out.extend_from_slice(s.as_bytes());
        // pad data to a word boundary like the EVM does
        while out.len() % WORD != 0 {
            out.push(0);
        }
        out
    }

    #[test]
    fn decodes_dynamic_string() {
        let payload = encode_string_return("ipfs://QmExample");
        assert_eq!(decode_string(&payload).unwrap(), "ipfs://QmExample");
    }

    #[test]
    fn decodes_address_word() {
        let mut word = vec![0u8; WORD];
        word[WORD - 1] = 0xcd;
        word[WORD - 2] = 0xab;
        let addr = decode_address(&word).unwrap();
        assert_eq!(addr, "0x000000000000000000000000000000000000abcd");
    }

    #[test]
    fn decodes_bool_word() {
        let mut word = vec![0u8; WORD];
        assert!(!decode_bool(&word).unwrap());
        word[WORD - 1] = 1;
        assert!(decode_bool(&word).unwrap());
    }

    #[test]
    fn decodes_string_array() {
        // string[] = ["Qm1", "Qm22"]
        let mut payload = vec![0u8; WORD];
        payload[WORD - 1] = 32; // offset to array
        let mut count = [0u8; WORD];
        count[WORD - 1] = 2;
        payload.extend_from_slice(&count);
        let mut head0 = [0u8; WORD];
        head0[WORD - 1] = 64; // after the two head words
        payload.extend_from_slice(&head0);
        let mut head1 = [0u8; WORD];
        head1[WORD - 1] = 128; // 64 + len word + padded "Qm1"
        payload.extend_from_slice(&head1);
        for s in ["Qm1", "Qm22"] {
            let mut len_word = [0u8; WORD];
            len_word[WORD - 1] = s.len() as u8;
            payload.extend_from_slice(&len_word);
            payload.extend_from_slice(s.as_bytes());
            while payload.len() % WORD != 0 {
                payload.push(0);
            }
        }
        let cids = decode_string_array(&payload).unwrap();
        assert_eq!(cids, vec!["Qm1".to_string(), "Qm22".to_string()]);
    }

    #[test]
    fn truncated_payload_is_an_error_not_a_panic() {
        assert!(decode_string(&[0u8; 16]).is_err());
        assert!(decode_string_array(&[0u8; 31]).is_err());
    }

    #[test]
    fn huge_element_count_is_an_error_not_an_allocation() {
        // base offset 32, then a count far beyond what 64 bytes could hold
        let mut payload = vec![0u8; 64];
        payload[31] = 32;
        payload[56..64].copy_from_slice(&(1u64 << 40).to_be_bytes());
        assert!(decode_string_array(&payload).is_err());
    }
}
