// Path: crates/services/src/oracle/env.rs
//! Owned snapshots of request data handed to the sandbox.

use std::collections::BTreeMap;
use zoracle_api::state::StateAccess;
use zoracle_api::vm::ExecutionEnvironment;
use zoracle_types::app::{DataSourceId, ExternalId, RawDataReport, Request, RequestId};
use zoracle_types::codec::from_bytes_canonical;
use zoracle_types::error::StateError;
use zoracle_types::keys::{raw_report_key, raw_report_prefix, raw_request_prefix};
use zoracle_types::OracleError;

/// Environment for the `prepare` entry point.
pub(crate) struct PrepareEnv {
    calldata: Vec<u8>,
    data_source_count: u64,
}

impl PrepareEnv {
    pub(crate) fn new(calldata: Vec<u8>, data_source_count: u64) -> Self {
        Self {
            calldata,
            data_source_count,
        }
    }
}

impl ExecutionEnvironment for PrepareEnv {
    fn calldata(&self) -> &[u8] {
        &self.calldata
    }

    // IDs are dense from 1 and records are never deleted.
    fn data_source_exists(&self, id: DataSourceId) -> bool {
        id.0 >= 1 && id.0 <= self.data_source_count
    }

    fn external_data_count(&self) -> u64 {
        0
    }

    fn received_validator_count(&self) -> u32 {
        0
    }

    fn raw_report(&self, _external_id: ExternalId, _validator_index: u32) -> Option<&RawDataReport> {
        None
    }
}

/// Environment for the `execute` entry point: every report of every validator
/// that reported, indexed by arrival order.
pub(crate) struct ExecuteEnv {
    calldata: Vec<u8>,
    external_data_count: u64,
    received_validator_count: u32,
    reports: BTreeMap<(ExternalId, u32), RawDataReport>,
}

impl ExecuteEnv {
    pub(crate) fn load(state: &dyn StateAccess, request: &Request) -> Result<Self, OracleError> {
        let external_data_count = raw_request_count(state, request.id)?;
        let received_validator_count = u32::try_from(request.received_validators.len())
            .map_err(|_| OracleError::InvalidState("too many received validators".into()))?;

        let reports = load_raw_reports(state, request, external_data_count)?;

        Ok(Self {
            calldata: request.calldata.clone(),
            external_data_count,
            received_validator_count,
            reports,
        })
    }
}

impl ExecutionEnvironment for ExecuteEnv {
    fn calldata(&self) -> &[u8] {
        &self.calldata
    }

    fn data_source_exists(&self, _id: DataSourceId) -> bool {
        false
    }

    fn external_data_count(&self) -> u64 {
        self.external_data_count
    }

    fn received_validator_count(&self) -> u32 {
        self.received_validator_count
    }

    fn raw_report(&self, external_id: ExternalId, validator_index: u32) -> Option<&RawDataReport> {
        self.reports.get(&(external_id, validator_index))
    }
}

/// The number of raw data request rows stored for request `id`.
pub(crate) fn raw_request_count(state: &dyn StateAccess, id: RequestId) -> Result<u64, OracleError> {
    let mut count = 0u64;
    for item in state.prefix_scan(&raw_request_prefix(id))? {
        item?;
        count += 1;
    }
    Ok(count)
}

/// Every stored report of `request`, keyed by external ID and the reporting
/// validator's arrival index. One scan over the request's report prefix.
pub(crate) fn load_raw_reports(
    state: &dyn StateAccess,
    request: &Request,
    external_data_count: u64,
) -> Result<BTreeMap<(ExternalId, u32), RawDataReport>, OracleError> {
    let mut slots = BTreeMap::new();
    for (index, validator) in (0u32..).zip(request.received_validators.iter()) {
        for external_id in (1..=external_data_count).map(ExternalId) {
            slots.insert(raw_report_key(request.id, external_id, validator), (external_id, index));
        }
    }

    let mut reports = BTreeMap::new();
    for item in state.prefix_scan(&raw_report_prefix(request.id))? {
        let (key, value) = item?;
        // Reports of validators outside the received set are never read.
        let Some(slot) = slots.get(&*key) else {
            continue;
        };
        let report: RawDataReport = from_bytes_canonical(&value).map_err(StateError::Decode)?;
        reports.insert(*slot, report);
    }
    Ok(reports)
}
