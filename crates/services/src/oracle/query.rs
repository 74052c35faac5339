// Path: crates/services/src/oracle/query.rs
//! Read-only accessors over requests, reports and results.

use super::env::{load_raw_reports, raw_request_count};
use super::params::{load_params, read_counter};
use super::pending::load_pending;
use super::OracleModule;
use zoracle_api::state::{get_decoded, scan_decoded, StateAccess};
use zoracle_types::app::{
    ExternalId, OracleResult, RawDataReport, RawDataRequest, Request, RequestId, ValAddress,
};
use zoracle_types::config::OracleParams;
use zoracle_types::ibc::OraclePacketData;
use zoracle_types::keys::{
    raw_request_key, request_key, result_key, REQUEST_COUNT_KEY, REQUEST_PREFIX,
};
use zoracle_types::OracleError;

/// One stored raw report together with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReportEntry {
    pub external_id: ExternalId,
    pub validator: ValAddress,
    pub report: RawDataReport,
}

impl OracleModule {
    pub fn params(&self, state: &dyn StateAccess) -> Result<OracleParams, OracleError> {
        load_params(state)
    }

    pub fn get_request(&self, state: &dyn StateAccess, id: RequestId) -> Result<Request, OracleError> {
        get_decoded(state, &request_key(id))?
            .ok_or_else(|| OracleError::NotFound(format!("request {}", id)))
    }

    /// Every request in ID order.
    pub fn get_requests(&self, state: &dyn StateAccess) -> Result<Vec<Request>, OracleError> {
        Ok(scan_decoded(state, REQUEST_PREFIX)?)
    }

    /// Requests awaiting resolution, in queue order.
    pub fn get_pending_requests(&self, state: &dyn StateAccess) -> Result<Vec<RequestId>, OracleError> {
        load_pending(state)
    }

    pub fn get_request_count(&self, state: &dyn StateAccess) -> Result<u64, OracleError> {
        read_counter(state, REQUEST_COUNT_KEY)
    }

    /// The raw data requests recorded at prepare, by external ID.
    pub fn get_raw_data_requests(
        &self,
        state: &dyn StateAccess,
        id: RequestId,
    ) -> Result<Vec<(ExternalId, RawDataRequest)>, OracleError> {
        self.get_request(state, id)?;
        let count = raw_request_count(state, id)?;
        let mut out = Vec::new();
        for external_id in (1..=count).map(ExternalId) {
            if let Some(raw) = get_decoded(state, &raw_request_key(id, external_id))? {
                out.push((external_id, raw));
            }
        }
        Ok(out)
    }

    /// Stored raw reports ordered by validator arrival, then external ID.
    pub fn get_raw_reports(
        &self,
        state: &dyn StateAccess,
        id: RequestId,
    ) -> Result<Vec<RawReportEntry>, OracleError> {
        let request = self.get_request(state, id)?;
        let count = raw_request_count(state, id)?;
        let mut out: Vec<(u32, RawReportEntry)> = Vec::new();
        for ((external_id, index), report) in load_raw_reports(state, &request, count)? {
            if let Some(validator) = request.received_validators.get(index as usize) {
                out.push((
                    index,
                    RawReportEntry {
                        external_id,
                        validator: validator.clone(),
                        report,
                    },
                ));
            }
        }
        out.sort_by_key(|(index, entry)| (*index, entry.external_id));
        Ok(out.into_iter().map(|(_, entry)| entry).collect())
    }

    pub fn get_result(&self, state: &dyn StateAccess, id: RequestId) -> Result<OracleResult, OracleError> {
        get_decoded(state, &result_key(id))?
            .ok_or_else(|| OracleError::NotFound(format!("result of request {}", id)))
    }

    /// The cross-chain packet carrying a resolved request's result.
    pub fn result_packet(
        &self,
        state: &dyn StateAccess,
        id: RequestId,
    ) -> Result<OraclePacketData, OracleError> {
        let result = self.get_result(state, id)?;
        Ok(OraclePacketData::from(&result))
    }
}
