// Path: crates/types/src/codec.rs

//! Canonical binary codec for everything written to oracle state.
//!
//! All records go through SCALE so that every validator produces the same bytes
//! for the same value. Decoding is strict: trailing bytes are an error.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from canonical SCALE bytes, rejecting trailing input.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

/// Serializes a value to JSON with object keys sorted (RFC 8785).
///
/// Used for sign bytes and packet payloads, which must be byte-identical across
/// implementations.
pub fn to_sorted_json<T: serde::Serialize>(v: &T) -> Result<Vec<u8>, String> {
    serde_jcs::to_vec(v).map_err(|e| format!("sorted json encode failed: {}", e))
}

/// Serde adapter that writes byte fields as standard base64 strings.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes bytes as a base64 string.
    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    /// Deserializes bytes from a base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AccAddress, OracleScript};

    #[test]
    fn canonical_decode_rejects_trailing_bytes() {
        let script = OracleScript {
            owner: AccAddress(vec![1, 2]),
            name: "median".into(),
            description: "median of prices".into(),
            code: vec![0, 97, 115, 109],
        };
        let mut bytes = to_bytes_canonical(&script);
        assert_eq!(from_bytes_canonical::<OracleScript>(&bytes).unwrap(), script);

        bytes.push(0);
        assert!(from_bytes_canonical::<OracleScript>(&bytes).is_err());
    }

    #[test]
    fn sorted_json_orders_keys() {
        #[derive(serde::Serialize)]
        struct Unordered {
            zeta: u8,
            alpha: u8,
        }
        let json = to_sorted_json(&Unordered { zeta: 1, alpha: 2 }).unwrap();
        assert_eq!(json, br#"{"alpha":2,"zeta":1}"#.to_vec());
    }
}
