// Path: crates/types/src/keys/mod.rs
//! State keys for the oracle module.
//!
//! Numeric components are big-endian so that prefix iteration returns records in
//! ID order.

use crate::app::{AccAddress, DataSourceId, ExternalId, OracleScriptId, RequestId, ValAddress};
use parity_scale_codec::{Compact, Encode};

/// The state key for the module parameters.
pub const PARAMS_KEY: &[u8] = b"zoracle::params";

/// The state key for the number of data sources created so far.
pub const DATA_SOURCE_COUNT_KEY: &[u8] = b"zoracle::data_source_count";
/// The state key for the number of oracle scripts created so far.
pub const ORACLE_SCRIPT_COUNT_KEY: &[u8] = b"zoracle::oracle_script_count";
/// The state key for the number of requests created so far.
pub const REQUEST_COUNT_KEY: &[u8] = b"zoracle::request_count";
/// The state key for the FIFO list of request IDs awaiting resolution.
pub const PENDING_LIST_KEY: &[u8] = b"zoracle::pending";

/// The state key prefix for data sources, keyed by ID.
pub const DATA_SOURCE_PREFIX: &[u8] = b"zoracle::ds::";
/// The state key prefix for oracle scripts, keyed by ID.
pub const ORACLE_SCRIPT_PREFIX: &[u8] = b"zoracle::os::";
/// The state key prefix for requests, keyed by ID.
pub const REQUEST_PREFIX: &[u8] = b"zoracle::req::";
/// The state key prefix for raw data requests, keyed by request ID then external ID.
pub const RAW_REQUEST_PREFIX: &[u8] = b"zoracle::rawreq::";
/// The state key prefix for raw reports, keyed by request ID, external ID, validator.
pub const RAW_REPORT_PREFIX: &[u8] = b"zoracle::report::";
/// The state key prefix for results, keyed by request ID.
pub const RESULT_PREFIX: &[u8] = b"zoracle::result::";
/// The state key prefix for reporter authorisations, keyed by validator then reporter.
pub const REPORTER_PREFIX: &[u8] = b"zoracle::reporter::";
/// The state key prefix for open requests, keyed by expiration height then ID.
pub const OPEN_EXPIRY_PREFIX: &[u8] = b"zoracle::expiry::";

fn join(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// Length-prefixes a variable-length component with a SCALE compact integer.
/// The prefix is self-delimiting for any length, so two components never
/// share an encoding.
fn var(bytes: &[u8]) -> Vec<u8> {
    let mut out = Compact(bytes.len() as u64).encode();
    out.extend_from_slice(bytes);
    out
}

/// Key of a data source record.
pub fn data_source_key(id: DataSourceId) -> Vec<u8> {
    join(DATA_SOURCE_PREFIX, &[&id.to_key_bytes()])
}

/// Key of an oracle script record.
pub fn oracle_script_key(id: OracleScriptId) -> Vec<u8> {
    join(ORACLE_SCRIPT_PREFIX, &[&id.to_key_bytes()])
}

/// Key of a request record.
pub fn request_key(id: RequestId) -> Vec<u8> {
    join(REQUEST_PREFIX, &[&id.to_key_bytes()])
}

/// Prefix of all raw data requests of one request.
pub fn raw_request_prefix(id: RequestId) -> Vec<u8> {
    join(RAW_REQUEST_PREFIX, &[&id.to_key_bytes()])
}

/// Key of a single raw data request.
pub fn raw_request_key(id: RequestId, external_id: ExternalId) -> Vec<u8> {
    join(RAW_REQUEST_PREFIX, &[&id.to_key_bytes(), &external_id.to_key_bytes()])
}

/// Prefix of all raw reports of one request.
pub fn raw_report_prefix(id: RequestId) -> Vec<u8> {
    join(RAW_REPORT_PREFIX, &[&id.to_key_bytes()])
}

/// Key of one validator's raw report for one external ID.
pub fn raw_report_key(id: RequestId, external_id: ExternalId, validator: &ValAddress) -> Vec<u8> {
    join(
        RAW_REPORT_PREFIX,
        &[&id.to_key_bytes(), &external_id.to_key_bytes(), &var(validator.as_ref())],
    )
}

/// Key of a request's result.
pub fn result_key(id: RequestId) -> Vec<u8> {
    join(RESULT_PREFIX, &[&id.to_key_bytes()])
}

/// Key of a reporter authorisation entry.
pub fn reporter_key(validator: &ValAddress, reporter: &AccAddress) -> Vec<u8> {
    join(REPORTER_PREFIX, &[&var(validator.as_ref()), &var(reporter.as_ref())])
}

/// Key of an open request's entry in the expiration index.
pub fn open_expiry_key(expiration_height: u64, id: RequestId) -> Vec<u8> {
    join(OPEN_EXPIRY_PREFIX, &[&expiration_height.to_be_bytes(), &id.to_key_bytes()])
}

/// Splits an expiration index key back into `(expiration_height, id)`.
pub fn parse_open_expiry_key(key: &[u8]) -> Option<(u64, RequestId)> {
    let rest = key.strip_prefix(OPEN_EXPIRY_PREFIX)?;
    if rest.len() != 16 {
        return None;
    }
    let (height, id) = rest.split_at(8);
    Some((
        u64::from_be_bytes(height.try_into().ok()?),
        RequestId(u64::from_be_bytes(id.try_into().ok()?)),
    ))
}
