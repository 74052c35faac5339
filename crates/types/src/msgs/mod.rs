// Path: crates/types/src/msgs/mod.rs
//! Messages accepted by the oracle module.
//!
//! Every message carries stateless checks (`validate_basic`) that run before any
//! state is touched. A failure there is always [`OracleError::InvalidMessage`].

use crate::app::{
    AccAddress, Coins, DataSourceId, OracleScriptId, RawDataReportWithId, RequestId, ValAddress,
};
use crate::OracleError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The route every oracle message is dispatched on.
pub const ROUTER_KEY: &str = "zoracle";

/// Common behaviour of oracle messages.
pub trait Msg {
    /// The router key of the handling module.
    fn route(&self) -> &'static str {
        ROUTER_KEY
    }
    /// The short action name of the message.
    fn msg_type(&self) -> &'static str;
    /// Stateless checks, in a fixed order; the first failure is returned.
    fn validate_basic(&self) -> Result<(), OracleError>;
    /// The accounts that must sign the message.
    fn signers(&self) -> Vec<AccAddress>;
}

fn invalid(msg: &str, detail: impl std::fmt::Display) -> OracleError {
    OracleError::InvalidMessage(format!("{}: {}", msg, detail))
}

/// Requests data from an existing oracle script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgRequestData {
    /// The oracle script to run.
    pub oracle_script_id: OracleScriptId,
    /// Call-data for the script.
    #[serde(with = "crate::codec::base64_bytes")]
    pub calldata: Vec<u8>,
    /// How many validators are asked to report.
    pub requested_validator_count: u64,
    /// How many reports are needed before resolution.
    pub sufficient_validator_count: u64,
    /// Number of blocks the request stays open.
    pub expiration: u64,
    /// Gas for the prepare entry point.
    pub prepare_gas: u64,
    /// Gas for the execute entry point.
    pub execute_gas: u64,
    /// The requester.
    pub sender: AccAddress,
}

impl Msg for MsgRequestData {
    fn msg_type(&self) -> &'static str {
        "request"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        const M: &str = "MsgRequestData";
        if self.sender.is_empty() {
            return Err(invalid(M, "sender address must not be empty"));
        }
        if self.oracle_script_id.0 == 0 {
            return Err(invalid(M, "oracle script id must be positive"));
        }
        if self.sufficient_validator_count == 0 {
            return Err(invalid(M, "sufficient validator count must be positive"));
        }
        if self.requested_validator_count < self.sufficient_validator_count {
            return Err(invalid(
                M,
                format!(
                    "requested validator count ({}) must not be less than sufficient validator count ({})",
                    self.requested_validator_count, self.sufficient_validator_count
                ),
            ));
        }
        if self.expiration == 0 {
            return Err(invalid(M, "expiration period must be positive"));
        }
        if self.prepare_gas == 0 {
            return Err(invalid(M, "prepare gas must be positive"));
        }
        if self.execute_gas == 0 {
            return Err(invalid(M, "execute gas must be positive"));
        }
        Ok(())
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![self.sender.clone()]
    }
}

/// A validator's answers to every raw data request of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgReportData {
    /// The request being answered.
    pub request_id: RequestId,
    /// One entry per external ID, ascending.
    pub data_set: Vec<RawDataReportWithId>,
    /// The reporting validator.
    pub validator: ValAddress,
    /// The account submitting on the validator's behalf.
    pub reporter: AccAddress,
}

impl Msg for MsgReportData {
    fn msg_type(&self) -> &'static str {
        "report"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        const M: &str = "MsgReportData";
        if self.request_id.0 == 0 {
            return Err(invalid(M, "request id must be positive"));
        }
        if self.data_set.is_empty() {
            return Err(invalid(M, "data set must not be empty"));
        }
        if self.validator.is_empty() {
            return Err(invalid(M, "validator address must not be empty"));
        }
        if self.reporter.is_empty() {
            return Err(invalid(M, "reporter address must not be empty"));
        }
        Ok(())
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![self.reporter.clone()]
    }
}

/// Registers a new data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgCreateDataSource {
    /// The owner of the new record.
    pub owner: AccAddress,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Fee charged per use.
    pub fee: Coins,
    /// The executable.
    #[serde(with = "crate::codec::base64_bytes")]
    pub executable: Vec<u8>,
    /// The submitting account.
    pub sender: AccAddress,
}

fn check_data_source_fields(
    m: &str,
    owner: &AccAddress,
    name: &str,
    description: &str,
    fee: &Coins,
    executable: &[u8],
    sender: &AccAddress,
) -> Result<(), OracleError> {
    if owner.is_empty() {
        return Err(invalid(m, "owner address must not be empty"));
    }
    if name.is_empty() {
        return Err(invalid(m, "name must not be empty"));
    }
    if description.is_empty() {
        return Err(invalid(m, "description must not be empty"));
    }
    if !fee.is_valid() {
        return Err(invalid(m, "fee must be valid"));
    }
    if executable.is_empty() {
        return Err(invalid(m, "executable must not be empty"));
    }
    if sender.is_empty() {
        return Err(invalid(m, "sender address must not be empty"));
    }
    Ok(())
}

impl Msg for MsgCreateDataSource {
    fn msg_type(&self) -> &'static str {
        "create_data_source"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        check_data_source_fields(
            "MsgCreateDataSource",
            &self.owner,
            &self.name,
            &self.description,
            &self.fee,
            &self.executable,
            &self.sender,
        )
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![self.sender.clone()]
    }
}

/// Overwrites an existing data source. Only its current owner may send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgEditDataSource {
    /// The record to overwrite.
    pub data_source_id: DataSourceId,
    /// The owner after the edit.
    pub owner: AccAddress,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Fee charged per use.
    pub fee: Coins,
    /// The executable.
    #[serde(with = "crate::codec::base64_bytes")]
    pub executable: Vec<u8>,
    /// The submitting account; must be the current owner.
    pub sender: AccAddress,
}

impl Msg for MsgEditDataSource {
    fn msg_type(&self) -> &'static str {
        "edit_data_source"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        const M: &str = "MsgEditDataSource";
        if self.data_source_id.0 == 0 {
            return Err(invalid(M, "data source id must be positive"));
        }
        check_data_source_fields(
            M,
            &self.owner,
            &self.name,
            &self.description,
            &self.fee,
            &self.executable,
            &self.sender,
        )
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![self.sender.clone()]
    }
}

/// Registers a new oracle script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgCreateOracleScript {
    /// The owner of the new record.
    pub owner: AccAddress,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// WASM code.
    #[serde(with = "crate::codec::base64_bytes")]
    pub code: Vec<u8>,
    /// The submitting account.
    pub sender: AccAddress,
}

impl Msg for MsgCreateOracleScript {
    fn msg_type(&self) -> &'static str {
        "create_oracle_script"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        const M: &str = "MsgCreateOracleScript";
        if self.owner.is_empty() {
            return Err(invalid(M, "owner address must not be empty"));
        }
        if self.sender.is_empty() {
            return Err(invalid(M, "sender address must not be empty"));
        }
        if self.name.is_empty() {
            return Err(invalid(M, "name must not be empty"));
        }
        if self.description.is_empty() {
            return Err(invalid(M, "description must not be empty"));
        }
        if self.code.is_empty() {
            return Err(invalid(M, "code must not be empty"));
        }
        Ok(())
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![self.sender.clone()]
    }
}

/// Overwrites an existing oracle script. Only its current owner may send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgEditOracleScript {
    /// The record to overwrite.
    pub oracle_script_id: OracleScriptId,
    /// The owner after the edit.
    pub owner: AccAddress,
    /// Name.
    pub name: String,
    /// Description. May be empty.
    pub description: String,
    /// WASM code.
    #[serde(with = "crate::codec::base64_bytes")]
    pub code: Vec<u8>,
    /// The submitting account; must be the current owner.
    pub sender: AccAddress,
}

impl Msg for MsgEditOracleScript {
    fn msg_type(&self) -> &'static str {
        "edit_oracle_script"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        const M: &str = "MsgEditOracleScript";
        if self.oracle_script_id.0 == 0 {
            return Err(invalid(M, "oracle script id must be positive"));
        }
        if self.owner.is_empty() {
            return Err(invalid(M, "owner address must not be empty"));
        }
        if self.sender.is_empty() {
            return Err(invalid(M, "sender address must not be empty"));
        }
        if self.name.is_empty() {
            return Err(invalid(M, "name must not be empty"));
        }
        if self.code.is_empty() {
            return Err(invalid(M, "code must not be empty"));
        }
        Ok(())
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![self.sender.clone()]
    }
}

/// Authorises `reporter` to submit reports for `validator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgAddOracleAddress {
    /// The validator granting the authorisation; signs the message.
    pub validator: ValAddress,
    /// The reporter account.
    pub reporter: AccAddress,
}

/// Revokes a reporter authorisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MsgRemoveOracleAddress {
    /// The validator revoking the authorisation; signs the message.
    pub validator: ValAddress,
    /// The reporter account.
    pub reporter: AccAddress,
}

fn check_reporter_pair(m: &str, validator: &ValAddress, reporter: &AccAddress) -> Result<(), OracleError> {
    if validator.is_empty() {
        return Err(invalid(m, "validator address must not be empty"));
    }
    if reporter.is_empty() {
        return Err(invalid(m, "reporter address must not be empty"));
    }
    Ok(())
}

impl Msg for MsgAddOracleAddress {
    fn msg_type(&self) -> &'static str {
        "add_oracle_address"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        check_reporter_pair("MsgAddOracleAddress", &self.validator, &self.reporter)
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![AccAddress(self.validator.0.clone())]
    }
}

impl Msg for MsgRemoveOracleAddress {
    fn msg_type(&self) -> &'static str {
        "remove_oracle_address"
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        check_reporter_pair("MsgRemoveOracleAddress", &self.validator, &self.reporter)
    }

    fn signers(&self) -> Vec<AccAddress> {
        vec![AccAddress(self.validator.0.clone())]
    }
}

/// Any message the oracle module handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum OracleMsg {
    /// See [`MsgRequestData`].
    RequestData(MsgRequestData),
    /// See [`MsgReportData`].
    ReportData(MsgReportData),
    /// See [`MsgCreateDataSource`].
    CreateDataSource(MsgCreateDataSource),
    /// See [`MsgEditDataSource`].
    EditDataSource(MsgEditDataSource),
    /// See [`MsgCreateOracleScript`].
    CreateOracleScript(MsgCreateOracleScript),
    /// See [`MsgEditOracleScript`].
    EditOracleScript(MsgEditOracleScript),
    /// See [`MsgAddOracleAddress`].
    AddOracleAddress(MsgAddOracleAddress),
    /// See [`MsgRemoveOracleAddress`].
    RemoveOracleAddress(MsgRemoveOracleAddress),
}

macro_rules! each_msg {
    ($value:expr, $m:ident => $body:expr) => {
        match $value {
            OracleMsg::RequestData($m) => $body,
            OracleMsg::ReportData($m) => $body,
            OracleMsg::CreateDataSource($m) => $body,
            OracleMsg::EditDataSource($m) => $body,
            OracleMsg::CreateOracleScript($m) => $body,
            OracleMsg::EditOracleScript($m) => $body,
            OracleMsg::AddOracleAddress($m) => $body,
            OracleMsg::RemoveOracleAddress($m) => $body,
        }
    };
}

mod registry;
pub use registry::*;

impl OracleMsg {
    /// The kind of this message, used for registry lookups.
    pub fn kind(&self) -> MsgKind {
        match self {
            OracleMsg::RequestData(_) => MsgKind::RequestData,
            OracleMsg::ReportData(_) => MsgKind::ReportData,
            OracleMsg::CreateDataSource(_) => MsgKind::CreateDataSource,
            OracleMsg::EditDataSource(_) => MsgKind::EditDataSource,
            OracleMsg::CreateOracleScript(_) => MsgKind::CreateOracleScript,
            OracleMsg::EditOracleScript(_) => MsgKind::EditOracleScript,
            OracleMsg::AddOracleAddress(_) => MsgKind::AddOracleAddress,
            OracleMsg::RemoveOracleAddress(_) => MsgKind::RemoveOracleAddress,
        }
    }
}

impl Msg for OracleMsg {
    fn route(&self) -> &'static str {
        each_msg!(self, m => m.route())
    }

    fn msg_type(&self) -> &'static str {
        each_msg!(self, m => m.msg_type())
    }

    fn validate_basic(&self) -> Result<(), OracleError> {
        each_msg!(self, m => m.validate_basic())
    }

    fn signers(&self) -> Vec<AccAddress> {
        each_msg!(self, m => m.signers())
    }
}
