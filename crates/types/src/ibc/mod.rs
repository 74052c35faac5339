// Path: crates/types/src/ibc/mod.rs
//! Cross-chain packet payloads.

use crate::app::OracleResult;
use crate::codec::to_sorted_json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The capability set a packet payload must provide to the transport layer.
pub trait PacketData {
    /// The canonical bytes committed to and relayed.
    fn get_bytes(&self) -> Result<Vec<u8>, String>;
    /// Stateless validation performed before the packet is sent.
    fn validate_basic(&self) -> Result<(), String>;
    /// The height after which the packet times out.
    fn timeout_height(&self) -> u64;
    /// A short tag identifying the packet kind.
    fn packet_type(&self) -> &'static str;
}

/// Payload carrying an oracle result to another chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePacketData {
    /// Opaque result bytes, interpreted by the receiving chain.
    #[serde(with = "crate::codec::base64_bytes")]
    pub data: Vec<u8>,
}

impl OraclePacketData {
    /// Wraps raw bytes in a packet payload.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<&OracleResult> for OraclePacketData {
    fn from(result: &OracleResult) -> Self {
        Self::new(result.data.clone())
    }
}

impl fmt::Display for OraclePacketData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OraclePacketData {{ data: 0x{} }}", hex::encode(&self.data))
    }
}

impl PacketData for OraclePacketData {
    fn get_bytes(&self) -> Result<Vec<u8>, String> {
        to_sorted_json(self)
    }

    fn validate_basic(&self) -> Result<(), String> {
        Ok(())
    }

    fn timeout_height(&self) -> u64 {
        u64::MAX
    }

    fn packet_type(&self) -> &'static str {
        "zoracle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_bytes_are_sorted_json() {
        let packet = OraclePacketData::new(b"hi".to_vec());
        assert_eq!(packet.get_bytes().unwrap(), br#"{"data":"aGk="}"#.to_vec());
        assert_eq!(packet.timeout_height(), u64::MAX);
        assert_eq!(packet.packet_type(), "zoracle");
        assert!(packet.validate_basic().is_ok());
    }
}
