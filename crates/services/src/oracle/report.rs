// Path: crates/services/src/oracle/report.rs
//! Report collection.

use super::env::raw_request_count;
use super::params::load_params;
use super::pending::enqueue_pending;
use super::OracleModule;
use zoracle_api::state::{put_encoded, StateAccess};
use zoracle_api::transaction::TxContext;
use zoracle_telemetry::oracle_metrics;
use zoracle_types::app::{
    AccAddress, ExternalId, OracleEvent, RawDataReport, RawDataReportWithId, RequestId,
    ResolveStatus, ValAddress,
};
use zoracle_types::keys::{raw_report_key, raw_request_key, request_key};
use zoracle_types::OracleError;

impl OracleModule {
    /// Accepts one validator's complete set of raw reports for a request.
    ///
    /// Checks run in a fixed order and the first failure is returned; nothing
    /// is written unless all pass. The request is enqueued for resolution
    /// exactly when this report brings it to quorum.
    pub fn add_report(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        request_id: RequestId,
        data_set: &[RawDataReportWithId],
        validator: &ValAddress,
        reporter: &AccAddress,
    ) -> Result<(), OracleError> {
        let mut request = self.get_request(&*state, request_id)?;

        if request.resolve_status != ResolveStatus::Open {
            return Err(OracleError::InvalidState(format!(
                "request {} is {}, not open",
                request_id, request.resolve_status
            )));
        }
        if request.expiration_height < ctx.block_height {
            return Err(OracleError::InvalidState(format!(
                "request {} expired at height {}, current height is {}",
                request_id, request.expiration_height, ctx.block_height
            )));
        }
        if !self.reporters.is_authorized(&*state, reporter, validator)? {
            return Err(OracleError::Unauthorized(format!(
                "{} is not an authorized reporter of {}",
                reporter, validator
            )));
        }
        if !request.is_requested(validator) {
            return Err(OracleError::Unauthorized(format!(
                "{} is not assigned to request {}",
                validator, request_id
            )));
        }
        if request.has_reported(validator) {
            return Err(OracleError::Duplicate(format!(
                "{} already reported to request {}",
                validator, request_id
            )));
        }

        let expected = raw_request_count(&*state, request_id)?;
        if data_set.len() as u64 != expected {
            return Err(OracleError::BadValue(format!(
                "request {} expects {} raw reports, received {}",
                request_id,
                expected,
                data_set.len()
            )));
        }

        let params = load_params(&*state)?;
        let mut last: Option<ExternalId> = None;
        for raw in data_set {
            if last.is_some_and(|prev| prev >= raw.external_id) {
                return Err(OracleError::BadValue(
                    "raw reports are not in strictly increasing external ID order".into(),
                ));
            }
            if !state.has(&raw_request_key(request_id, raw.external_id))? {
                return Err(OracleError::BadValue(format!(
                    "request {} has no external ID {}",
                    request_id, raw.external_id
                )));
            }
            if raw.data.len() as u64 > params.max_raw_data_report_size {
                return Err(OracleError::BadValue(format!(
                    "raw report size ({}) exceeds the maximum ({})",
                    raw.data.len(),
                    params.max_raw_data_report_size
                )));
            }
            last = Some(raw.external_id);
        }

        for raw in data_set {
            let report = RawDataReport {
                exit_code: raw.exit_code,
                data: raw.data.clone(),
            };
            put_encoded(state, &raw_report_key(request_id, raw.external_id, validator), &report)?;
        }
        request.received_validators.push(validator.clone());
        put_encoded(state, &request_key(request_id), &request)?;

        tracing::debug!(
            target: "oracle",
            request_id = request_id.0,
            validator = %validator,
            received = request.received_validators.len(),
            "report accepted"
        );
        oracle_metrics().inc_reports_accepted();
        ctx.emit(OracleEvent::Report {
            request_id,
            validator: validator.clone(),
        });

        if request.received_validators.len() as u64 == request.sufficient_validator_count {
            enqueue_pending(state, request_id)?;
            tracing::info!(target: "oracle", request_id = request_id.0, "quorum reached");
        }
        Ok(())
    }
}
