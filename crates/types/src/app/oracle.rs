// Path: crates/types/src/app/oracle.rs
//! Registry records, requests, reports and results.

use crate::app::{AccAddress, Coins, ValAddress};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the identifier that follows this one.
            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }

            /// Big-endian bytes, so that key order matches numeric order.
            pub fn to_key_bytes(self) -> [u8; 8] {
                self.0.to_be_bytes()
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered data source. Assigned densely from 1.
    DataSourceId
);
define_id!(
    /// Identifier of a registered oracle script. Assigned densely from 1.
    OracleScriptId
);
define_id!(
    /// Identifier of a data request. Assigned densely from 1.
    RequestId
);
define_id!(
    /// Script-chosen sequence number of a raw data request, unique within a request.
    ExternalId
);

/// A registered definition of an external fetch.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct DataSource {
    /// The account allowed to edit this data source.
    pub owner: AccAddress,
    /// Human readable name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Fee paid per request that uses this data source.
    pub fee: Coins,
    /// The executable validators run off-chain to fetch the data.
    #[serde(with = "crate::codec::base64_bytes")]
    pub executable: Vec<u8>,
}

/// A registered oracle script: WASM code with `prepare` and `execute` entry points.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct OracleScript {
    /// The account allowed to edit this oracle script.
    pub owner: AccAddress,
    /// Human readable name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// The compiled WASM module.
    #[serde(with = "crate::codec::base64_bytes")]
    pub code: Vec<u8>,
}

/// The lifecycle phase of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum ResolveStatus {
    /// Accepting reports.
    Open,
    /// Resolved; a `OracleResult` exists.
    Success,
    /// Execute-phase failure; no result exists.
    Failure,
    /// Passed its expiration height without being resolved.
    Expired,
}

impl fmt::Display for ResolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolveStatus::Open => "open",
            ResolveStatus::Success => "success",
            ResolveStatus::Failure => "failure",
            ResolveStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// A data request against an oracle script.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Request {
    /// The request's identifier.
    pub id: RequestId,
    /// The oracle script that prepares and executes this request.
    pub oracle_script_id: OracleScriptId,
    /// Call-data handed to both entry points of the script.
    #[serde(with = "crate::codec::base64_bytes")]
    pub calldata: Vec<u8>,
    /// The validators assigned to report, in selection order.
    pub requested_validators: Vec<ValAddress>,
    /// The number of reports required before resolution.
    pub sufficient_validator_count: u64,
    /// Validators that already reported, in arrival order. Append-only.
    pub received_validators: Vec<ValAddress>,
    /// The block height at which the request was created.
    pub request_height: u64,
    /// The last height at which reports are accepted.
    pub expiration_height: u64,
    /// Gas available to the execute entry point at resolution.
    pub execute_gas: u64,
    /// The account that submitted the request.
    pub requester: AccAddress,
    /// The current lifecycle phase.
    pub resolve_status: ResolveStatus,
}

impl Request {
    /// True once at least `sufficient_validator_count` validators reported.
    pub fn has_quorum(&self) -> bool {
        self.received_validators.len() as u64 >= self.sufficient_validator_count
    }

    /// True if `validator` is one of the assigned reporters.
    pub fn is_requested(&self, validator: &ValAddress) -> bool {
        self.requested_validators.iter().any(|v| v == validator)
    }

    /// True if `validator` already submitted its reports.
    pub fn has_reported(&self, validator: &ValAddress) -> bool {
        self.received_validators.iter().any(|v| v == validator)
    }
}

/// A raw data request recorded while running the `prepare` entry point.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct RawDataRequest {
    /// The data source validators must run.
    pub data_source_id: DataSourceId,
    /// The arguments for the data source executable.
    #[serde(with = "crate::codec::base64_bytes")]
    pub calldata: Vec<u8>,
}

/// One validator's stored answer for one external ID.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct RawDataReport {
    /// The exit code of the data source executable.
    pub exit_code: u8,
    /// The output of the data source executable.
    #[serde(with = "crate::codec::base64_bytes")]
    pub data: Vec<u8>,
}

/// A raw report as submitted, tagged with the external ID it answers.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct RawDataReportWithId {
    /// The external ID this report answers.
    pub external_id: ExternalId,
    /// The exit code of the data source executable.
    pub exit_code: u8,
    /// The output of the data source executable.
    #[serde(with = "crate::codec::base64_bytes")]
    pub data: Vec<u8>,
}

impl RawDataReportWithId {
    /// Creates a new tagged raw report.
    pub fn new(external_id: impl Into<ExternalId>, exit_code: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            external_id: external_id.into(),
            exit_code,
            data: data.into(),
        }
    }
}

/// The aggregated output of a successfully resolved request.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct OracleResult {
    /// The request this result belongs to.
    pub request_id: RequestId,
    /// The bytes saved by the `execute` entry point.
    #[serde(with = "crate::codec::base64_bytes")]
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sufficient: u64) -> Request {
        Request {
            id: RequestId(1),
            oracle_script_id: OracleScriptId(1),
            calldata: vec![],
            requested_validators: vec![ValAddress(vec![1]), ValAddress(vec![2])],
            sufficient_validator_count: sufficient,
            received_validators: vec![],
            request_height: 10,
            expiration_height: 20,
            execute_gas: 1_000,
            requester: AccAddress(vec![9]),
            resolve_status: ResolveStatus::Open,
        }
    }

    #[test]
    fn quorum_counts_received_validators() {
        let mut req = request(2);
        assert!(!req.has_quorum());
        req.received_validators.push(ValAddress(vec![1]));
        assert!(!req.has_quorum());
        req.received_validators.push(ValAddress(vec![2]));
        assert!(req.has_quorum());
    }

    #[test]
    fn membership_helpers() {
        let mut req = request(1);
        assert!(req.is_requested(&ValAddress(vec![2])));
        assert!(!req.is_requested(&ValAddress(vec![3])));
        req.received_validators.push(ValAddress(vec![2]));
        assert!(req.has_reported(&ValAddress(vec![2])));
    }

    #[test]
    fn key_bytes_preserve_numeric_order() {
        assert!(RequestId(2).to_key_bytes() < RequestId(256).to_key_bytes());
        assert_eq!(DataSourceId(7).next(), DataSourceId(8));
    }
}
