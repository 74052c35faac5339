// Path: crates/services/src/oracle/resolve.rs
//! End-block housekeeping: expiring stale requests and draining the pending
//! queue under the block's execute gas budget.

use super::env::ExecuteEnv;
use super::params::load_params;
use super::pending::{load_pending, store_pending};
use super::OracleModule;
use std::sync::Arc;
use zoracle_api::state::{put_encoded, StateAccess};
use zoracle_api::transaction::TxContext;
use zoracle_api::vm::{EntryPoint, ExecutionStatus};
use zoracle_telemetry::oracle_metrics;
use zoracle_telemetry::time::Timer;
use zoracle_types::app::{OracleEvent, OracleResult, Request, RequestId, ResolveStatus};
use zoracle_types::config::OracleParams;
use zoracle_types::keys::{
    open_expiry_key, parse_open_expiry_key, request_key, result_key, OPEN_EXPIRY_PREFIX,
};
use zoracle_types::OracleError;

fn status_label(status: ResolveStatus) -> &'static str {
    match status {
        ResolveStatus::Open => "open",
        ResolveStatus::Success => "success",
        ResolveStatus::Failure => "failure",
        ResolveStatus::Expired => "expired",
    }
}

impl OracleModule {
    /// Runs once per block after all transactions.
    pub fn end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
    ) -> Result<(), OracleError> {
        let _timer = Timer::new(oracle_metrics());
        self.expire_requests(state, ctx)?;
        self.resolve_pending(state, ctx)
    }

    /// Marks every open request whose expiration height is below the current
    /// height as expired and drops it from the pending queue.
    ///
    /// Only the due prefix of the expiration index is visited, so the cost
    /// does not grow with the number of requests already resolved.
    pub fn expire_requests(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
    ) -> Result<Vec<RequestId>, OracleError> {
        let mut due = Vec::new();
        for item in state.prefix_scan(OPEN_EXPIRY_PREFIX)? {
            let (key, _) = item?;
            let (expiration_height, id) = parse_open_expiry_key(&key).ok_or_else(|| {
                OracleError::InvalidState("malformed expiration index key".into())
            })?;
            if expiration_height >= ctx.block_height {
                break;
            }
            due.push((key, id));
        }
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let mut expired = Vec::with_capacity(due.len());
        for (key, id) in due {
            state.delete(&key)?;
            let mut request = self.get_request(&*state, id)?;
            if request.resolve_status != ResolveStatus::Open {
                continue;
            }
            request.resolve_status = ResolveStatus::Expired;
            put_encoded(state, &request_key(id), &request)?;
            tracing::info!(target: "oracle", request_id = id.0, "request expired");
            oracle_metrics().inc_resolutions(status_label(ResolveStatus::Expired));
            ctx.emit(OracleEvent::Resolve {
                request_id: id,
                status: ResolveStatus::Expired,
            });
            expired.push(id);
        }

        let pending = load_pending(&*state)?;
        let remaining: Vec<RequestId> = pending
            .into_iter()
            .filter(|id| !expired.contains(id))
            .collect();
        store_pending(state, &remaining)?;
        Ok(expired)
    }

    /// Resolves queued requests in FIFO order while the block budget covers
    /// the next request's execute gas. The rest stay queued.
    pub fn resolve_pending(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
    ) -> Result<(), OracleError> {
        let pending = load_pending(&*state)?;
        if pending.is_empty() {
            return Ok(());
        }
        let params = load_params(&*state)?;
        let mut budget = params.end_block_execute_gas_limit;
        let mut done = 0usize;

        for id in &pending {
            let request = self.get_request(&*state, *id)?;
            if request.resolve_status != ResolveStatus::Open {
                done += 1;
                continue;
            }
            if request.execute_gas > budget {
                tracing::debug!(
                    target: "oracle",
                    request_id = id.0,
                    budget,
                    "block execute budget exhausted"
                );
                break;
            }
            budget -= request.execute_gas;
            self.resolve_request(state, ctx, request, &params)?;
            done += 1;
        }

        let remaining: Vec<RequestId> = pending.into_iter().skip(done).collect();
        store_pending(state, &remaining)
    }

    /// Runs `execute` for one request and records the terminal status.
    /// Sandbox failures become `Failure`; only state errors propagate.
    fn resolve_request(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        mut request: Request,
        params: &OracleParams,
    ) -> Result<(), OracleError> {
        let id = request.id;
        let status = match self.execute_request(&*state, &request) {
            Ok(result) if result.len() as u64 <= params.max_result_size => {
                put_encoded(
                    state,
                    &result_key(id),
                    &OracleResult {
                        request_id: id,
                        data: result,
                    },
                )?;
                ResolveStatus::Success
            }
            Ok(result) => {
                tracing::warn!(
                    target: "oracle",
                    request_id = id.0,
                    size = result.len(),
                    max = params.max_result_size,
                    "result too large"
                );
                ResolveStatus::Failure
            }
            Err(e @ OracleError::State(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(target: "oracle", request_id = id.0, error = %e, "execute failed");
                ResolveStatus::Failure
            }
        };

        request.resolve_status = status;
        put_encoded(state, &request_key(id), &request)?;
        state.delete(&open_expiry_key(request.expiration_height, id))?;
        tracing::info!(target: "oracle", request_id = id.0, status = %status, "request resolved");
        oracle_metrics().inc_resolutions(status_label(status));
        ctx.emit(OracleEvent::Resolve {
            request_id: id,
            status,
        });
        Ok(())
    }

    fn execute_request(
        &self,
        state: &dyn StateAccess,
        request: &Request,
    ) -> Result<Vec<u8>, OracleError> {
        let script = self.get_oracle_script(state, request.oracle_script_id)?;
        let env = ExecuteEnv::load(state, request)?;
        let output = self.runtime.run(
            &script.code,
            EntryPoint::Execute,
            request.execute_gas,
            Arc::new(env),
        )?;
        oracle_metrics().observe_sandbox_gas("execute", output.gas_used);
        match output.status {
            ExecutionStatus::Completed => Ok(output.result),
            ExecutionStatus::Trapped(reason) => Err(OracleError::SandboxTrap(reason)),
            ExecutionStatus::OutOfGas => Err(OracleError::OutOfGas(format!(
                "execute exhausted {} gas",
                output.gas_used
            ))),
        }
    }
}
