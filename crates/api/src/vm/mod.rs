// Path: crates/api/src/vm/mod.rs
//! The seam between the oracle module and the deterministic script sandbox.
//!
//! A runtime executes one entry point of an oracle script per call. The script
//! reaches the outside world only through an [`ExecutionEnvironment`], which is
//! a read-only snapshot prepared by the caller, so the same inputs always yield
//! the same output on every validator.

use std::fmt;
use std::sync::Arc;
use zoracle_types::app::{DataSourceId, ExternalId, RawDataReport, RawDataRequest};
use zoracle_types::error::VmError;

/// The two entry points an oracle script exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// Decides which raw data to request.
    Prepare,
    /// Aggregates the collected reports into a result.
    Execute,
}

impl EntryPoint {
    /// The exported function name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Prepare => "prepare",
            EntryPoint::Execute => "execute",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-side answers available to a running script.
///
/// Implementations hold owned, immutable data; the runtime decides which
/// methods a given entry point may reach.
pub trait ExecutionEnvironment: Send + Sync {
    /// The request's call-data.
    fn calldata(&self) -> &[u8];

    /// Prepare mode: whether a data source may be requested.
    fn data_source_exists(&self, id: DataSourceId) -> bool;

    /// Execute mode: the number of raw data requests recorded at prepare.
    fn external_data_count(&self) -> u64;

    /// Execute mode: the number of validators that reported.
    fn received_validator_count(&self) -> u32;

    /// Execute mode: the report of the `validator_index`-th reporting validator
    /// for `external_id`, if any.
    fn raw_report(&self, external_id: ExternalId, validator_index: u32) -> Option<&RawDataReport>;
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The entry point returned normally.
    Completed,
    /// Execution trapped (script fault or host-call misuse).
    Trapped(String),
    /// The gas limit was reached.
    OutOfGas,
}

impl ExecutionStatus {
    /// True for [`ExecutionStatus::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionStatus::Completed)
    }
}

/// The outcome of one invocation, reported whether or not it completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// How execution ended.
    pub status: ExecutionStatus,
    /// Gas consumed, never more than the supplied limit.
    pub gas_used: u64,
    /// The last value passed to `save_result`; empty if never called.
    pub result: Vec<u8>,
    /// Raw data requests made during prepare, in call order. Entry `i` has
    /// external ID `i + 1`.
    pub raw_requests: Vec<RawDataRequest>,
}

/// A deterministic, resource-bounded executor for oracle scripts.
pub trait ScriptRuntime: Send + Sync {
    /// Runs `entry` of `code` with at most `gas_limit` gas.
    ///
    /// `Err` is returned only when execution could not start (bad bytecode,
    /// missing export); no gas is charged in that case.
    fn run(
        &self,
        code: &[u8],
        entry: EntryPoint,
        gas_limit: u64,
        env: Arc<dyn ExecutionEnvironment>,
    ) -> Result<ExecutionOutput, VmError>;
}
