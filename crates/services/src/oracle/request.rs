// Path: crates/services/src/oracle/request.rs
//! Request creation: validator selection, the `prepare` run and persistence.

use super::env::PrepareEnv;
use super::params::{load_params, read_counter, write_counter};
use super::OracleModule;
use std::collections::BTreeSet;
use std::sync::Arc;
use zoracle_api::state::{put_encoded, StateAccess};
use zoracle_api::transaction::TxContext;
use zoracle_api::vm::{EntryPoint, ExecutionStatus};
use zoracle_telemetry::oracle_metrics;
use zoracle_types::app::{
    ExternalId, OracleEvent, Request, RequestId, ResolveStatus,
};
use zoracle_types::keys::{open_expiry_key, raw_request_key, request_key, REQUEST_COUNT_KEY};

/// Value stored under an expiration index key.
const OPEN_MARKER: &[u8] = &[1];
use zoracle_types::msgs::MsgRequestData;
use zoracle_types::OracleError;

impl OracleModule {
    /// Creates a request.
    ///
    /// Nothing is written unless every step succeeds: the prepare run must
    /// complete, request no more distinct data sources than allowed, and the
    /// raw request fee must fit in the transaction's gas meter.
    pub fn request_data(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        msg: &MsgRequestData,
    ) -> Result<RequestId, OracleError> {
        let params = load_params(&*state)?;
        if msg.calldata.len() as u64 > params.max_calldata_size {
            return Err(OracleError::BadValue(format!(
                "calldata size ({}) exceeds the maximum ({})",
                msg.calldata.len(),
                params.max_calldata_size
            )));
        }
        let script = self.get_oracle_script(&*state, msg.oracle_script_id)?;

        if msg.sufficient_validator_count == 0 {
            return Err(OracleError::BadValue(
                "sufficient validator count must be at least 1".into(),
            ));
        }
        if msg.requested_validator_count < msg.sufficient_validator_count {
            return Err(OracleError::BadValue(format!(
                "requested validator count ({}) is less than sufficient validator count ({})",
                msg.requested_validator_count, msg.sufficient_validator_count
            )));
        }
        if msg.expiration == 0 {
            return Err(OracleError::BadValue("expiration must be positive".into()));
        }
        if msg.prepare_gas == 0 || msg.execute_gas == 0 {
            return Err(OracleError::BadValue(
                "prepare and execute gas must be positive".into(),
            ));
        }
        // A head-of-queue request that can never fit the block budget would
        // stall every request behind it.
        if msg.execute_gas > params.end_block_execute_gas_limit {
            return Err(OracleError::BadValue(format!(
                "execute gas ({}) exceeds the end-block execute gas limit ({})",
                msg.execute_gas, params.end_block_execute_gas_limit
            )));
        }

        let id = RequestId(read_counter(&*state, REQUEST_COUNT_KEY)?).next();
        let validators = self
            .selector
            .select(&*state, id, msg.requested_validator_count)?;
        if validators.len() as u64 != msg.requested_validator_count {
            return Err(OracleError::InvalidState(format!(
                "selector returned {} validators, {} requested",
                validators.len(),
                msg.requested_validator_count
            )));
        }

        let env = PrepareEnv::new(msg.calldata.clone(), self.data_source_count(&*state)?);
        let output = self
            .runtime
            .run(&script.code, EntryPoint::Prepare, msg.prepare_gas, Arc::new(env))?;
        oracle_metrics().observe_sandbox_gas("prepare", output.gas_used);
        match output.status {
            ExecutionStatus::Completed => {}
            ExecutionStatus::Trapped(reason) => {
                return Err(OracleError::SandboxTrap(format!(
                    "prepare of request {}: {}",
                    id, reason
                )))
            }
            ExecutionStatus::OutOfGas => {
                return Err(OracleError::OutOfGas(format!(
                    "prepare of request {} exhausted {} gas",
                    id, output.gas_used
                )))
            }
        }

        let raw_requests = output.raw_requests;
        if raw_requests.is_empty() {
            return Err(OracleError::BadValue(format!(
                "prepare of request {} requested no raw data",
                id
            )));
        }
        let distinct: BTreeSet<_> = raw_requests.iter().map(|r| r.data_source_id).collect();
        if distinct.len() as u64 > params.max_data_source_count_per_request {
            return Err(OracleError::BadValue(format!(
                "request uses {} data sources, the maximum is {}",
                distinct.len(),
                params.max_data_source_count_per_request
            )));
        }

        let fee = (raw_requests.len() as u64)
            .saturating_mul(msg.requested_validator_count)
            .saturating_mul(params.gas_per_raw_data_request_per_validator);
        ctx.gas_meter.consume_gas(fee, "raw data requests")?;

        let request = Request {
            id,
            oracle_script_id: msg.oracle_script_id,
            calldata: msg.calldata.clone(),
            requested_validators: validators,
            sufficient_validator_count: msg.sufficient_validator_count,
            received_validators: Vec::new(),
            request_height: ctx.block_height,
            expiration_height: ctx.block_height.saturating_add(msg.expiration),
            execute_gas: msg.execute_gas,
            requester: msg.sender.clone(),
            resolve_status: ResolveStatus::Open,
        };
        put_encoded(state, &request_key(id), &request)?;
        state.insert(&open_expiry_key(request.expiration_height, id), OPEN_MARKER)?;
        for (external_id, raw) in (1u64..).map(ExternalId).zip(raw_requests.iter()) {
            put_encoded(state, &raw_request_key(id, external_id), raw)?;
        }
        write_counter(state, REQUEST_COUNT_KEY, id.0)?;

        tracing::info!(
            target: "oracle",
            request_id = id.0,
            oracle_script_id = msg.oracle_script_id.0,
            raw_requests = raw_requests.len(),
            expiration_height = request.expiration_height,
            "request created"
        );
        oracle_metrics().inc_requests_created();
        ctx.emit(OracleEvent::Request { id });
        Ok(id)
    }
}
