// Path: crates/services/src/oracle/mod.rs
//! The oracle module.
//!
//! Requests are created by running an oracle script's `prepare` entry point,
//! answered by the assigned validators through whole-set reports, and resolved
//! at end block by running `execute` over the collected reports.

use async_trait::async_trait;
use parity_scale_codec::Decode;
use std::any::Any;
use std::sync::Arc;
use zoracle_api::lifecycle::OnEndBlock;
use zoracle_api::oracle::{ReporterAuthorization, ValidatorSelector};
use zoracle_api::services::BlockchainService;
use zoracle_api::state::{StateAccess, StateOverlay};
use zoracle_api::transaction::TxContext;
use zoracle_api::vm::ScriptRuntime;
use zoracle_telemetry::error_metrics;
use zoracle_types::app::{DataSource, OracleScript};
use zoracle_types::codec;
use zoracle_types::msgs::{Msg, MsgRegistry, OracleMsg};
use zoracle_types::{ErrorCode, OracleError};

mod env;
mod genesis;
mod params;
mod pending;
mod query;
mod registry;
mod report;
mod reporter;
mod request;
mod resolve;
mod selector;

pub use query::RawReportEntry;
pub use reporter::StoreReporterRegistry;
pub use selector::StaticValidatorSet;

/// The oracle module service.
///
/// Collaborators are injected once at construction; the module itself holds
/// no mutable state.
pub struct OracleModule {
    runtime: Arc<dyn ScriptRuntime>,
    selector: Arc<dyn ValidatorSelector>,
    reporters: Arc<dyn ReporterAuthorization>,
    registry: MsgRegistry,
}

impl OracleModule {
    pub fn new(
        runtime: Arc<dyn ScriptRuntime>,
        selector: Arc<dyn ValidatorSelector>,
        reporters: Arc<dyn ReporterAuthorization>,
        registry: MsgRegistry,
    ) -> Self {
        Self {
            runtime,
            selector,
            reporters,
            registry,
        }
    }

    /// The message registry used for envelopes and sign bytes.
    pub fn msg_registry(&self) -> &MsgRegistry {
        &self.registry
    }

    /// Validates and applies one message atomically.
    ///
    /// The message runs against an overlay that is committed only on success;
    /// on failure neither state writes nor events survive.
    pub fn deliver(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        msg: OracleMsg,
    ) -> Result<(), OracleError> {
        let events_before = ctx.events.len();
        let result = self.deliver_inner(state, ctx, msg);
        if let Err(e) = &result {
            ctx.events.truncate(events_before);
            error_metrics().inc_error("oracle", e.code());
            tracing::debug!(target: "oracle", error = %e, "message rejected");
        }
        result
    }

    fn deliver_inner(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        msg: OracleMsg,
    ) -> Result<(), OracleError> {
        msg.validate_basic()?;
        if !ctx.is_internal && !msg.signers().contains(&ctx.signer) {
            return Err(OracleError::Unauthorized(format!(
                "{} is not a signer of {}",
                ctx.signer,
                msg.msg_type()
            )));
        }

        let mut overlay = StateOverlay::new(&*state);
        self.dispatch(&mut overlay, ctx, msg)?;
        let (inserts, deletes) = overlay.into_ordered_batch();
        state.batch_apply(&inserts, &deletes)?;
        Ok(())
    }

    fn dispatch(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        msg: OracleMsg,
    ) -> Result<(), OracleError> {
        match msg {
            OracleMsg::RequestData(m) => self.request_data(state, ctx, &m).map(|_| ()),
            OracleMsg::ReportData(m) => {
                self.add_report(state, ctx, m.request_id, &m.data_set, &m.validator, &m.reporter)
            }
            OracleMsg::CreateDataSource(m) => self
                .add_data_source(
                    state,
                    ctx,
                    DataSource {
                        owner: m.owner,
                        name: m.name,
                        description: m.description,
                        fee: m.fee,
                        executable: m.executable,
                    },
                )
                .map(|_| ()),
            OracleMsg::EditDataSource(m) => self.edit_data_source(
                state,
                ctx,
                m.data_source_id,
                &m.sender,
                DataSource {
                    owner: m.owner,
                    name: m.name,
                    description: m.description,
                    fee: m.fee,
                    executable: m.executable,
                },
            ),
            OracleMsg::CreateOracleScript(m) => self
                .add_oracle_script(
                    state,
                    ctx,
                    OracleScript {
                        owner: m.owner,
                        name: m.name,
                        description: m.description,
                        code: m.code,
                    },
                )
                .map(|_| ()),
            OracleMsg::EditOracleScript(m) => self.edit_oracle_script(
                state,
                ctx,
                m.oracle_script_id,
                &m.sender,
                OracleScript {
                    owner: m.owner,
                    name: m.name,
                    description: m.description,
                    code: m.code,
                },
            ),
            OracleMsg::AddOracleAddress(m) => {
                self.reporters.add_reporter(state, &m.validator, &m.reporter)
            }
            OracleMsg::RemoveOracleAddress(m) => {
                self.reporters
                    .remove_reporter(state, &m.validator, &m.reporter)
            }
        }
    }
}

fn decode_params<T: Decode>(params: &[u8]) -> Result<T, OracleError> {
    codec::from_bytes_canonical(params).map_err(OracleError::Codec)
}

#[async_trait]
impl BlockchainService for OracleModule {
    fn id(&self) -> &str {
        "zoracle"
    }

    fn abi_version(&self) -> u32 {
        1
    }

    fn state_schema(&self) -> &str {
        "v1"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &mut TxContext,
    ) -> Result<(), OracleError> {
        let msg = match method {
            "deliver@v1" => self.registry.decode(params)?,
            "request_data@v1" => OracleMsg::RequestData(decode_params(params)?),
            "report_data@v1" => OracleMsg::ReportData(decode_params(params)?),
            "create_data_source@v1" => OracleMsg::CreateDataSource(decode_params(params)?),
            "edit_data_source@v1" => OracleMsg::EditDataSource(decode_params(params)?),
            "create_oracle_script@v1" => OracleMsg::CreateOracleScript(decode_params(params)?),
            "edit_oracle_script@v1" => OracleMsg::EditOracleScript(decode_params(params)?),
            "add_oracle_address@v1" => OracleMsg::AddOracleAddress(decode_params(params)?),
            "remove_oracle_address@v1" => OracleMsg::RemoveOracleAddress(decode_params(params)?),
            _ => {
                return Err(OracleError::InvalidMessage(format!(
                    "oracle module does not support method '{}'",
                    method
                )))
            }
        };
        self.deliver(state, ctx, msg)
    }

    fn as_on_end_block(&self) -> Option<&dyn OnEndBlock> {
        Some(self)
    }
}

#[async_trait]
impl OnEndBlock for OracleModule {
    async fn on_end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
    ) -> Result<(), OracleError> {
        self.end_block(state, ctx)
    }
}
