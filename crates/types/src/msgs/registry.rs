// Path: crates/types/src/msgs/registry.rs
//! The message registry: the mapping between message kinds and their wire names.
//!
//! A registry is built once at start-up and handed to whatever needs to
//! produce sign bytes or decode envelopes. There is no process-wide instance.

use super::*;
use crate::codec::{from_bytes_canonical, to_bytes_canonical, to_sorted_json};
use std::collections::BTreeMap;

/// The kinds of message the registry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MsgKind {
    /// [`MsgRequestData`]
    RequestData,
    /// [`MsgReportData`]
    ReportData,
    /// [`MsgCreateDataSource`]
    CreateDataSource,
    /// [`MsgEditDataSource`]
    EditDataSource,
    /// [`MsgCreateOracleScript`]
    CreateOracleScript,
    /// [`MsgEditOracleScript`]
    EditOracleScript,
    /// [`MsgAddOracleAddress`]
    AddOracleAddress,
    /// [`MsgRemoveOracleAddress`]
    RemoveOracleAddress,
}

/// Binary envelope: the registered name followed by the SCALE body.
#[derive(Encode, Decode)]
struct Envelope {
    name: String,
    body: Vec<u8>,
}

#[derive(Serialize)]
struct SignDoc<'a, T: Serialize> {
    #[serde(rename = "type")]
    ty: &'a str,
    value: &'a T,
}

/// Bidirectional mapping between message kinds and registered names.
#[derive(Debug, Clone, Default)]
pub struct MsgRegistry {
    by_kind: BTreeMap<MsgKind, &'static str>,
    by_name: BTreeMap<&'static str, MsgKind>,
}

impl MsgRegistry {
    /// A registry with every oracle message registered.
    pub fn new() -> Self {
        let mut registry = Self::default();
        let entries = [
            (MsgKind::RequestData, "zoracle/Request"),
            (MsgKind::ReportData, "zoracle/Report"),
            (MsgKind::CreateDataSource, "zoracle/CreateDataSource"),
            (MsgKind::EditDataSource, "zoracle/EditDataSource"),
            (MsgKind::CreateOracleScript, "zoracle/CreateOracleScript"),
            (MsgKind::EditOracleScript, "zoracle/EditOracleScript"),
            (MsgKind::AddOracleAddress, "zoracle/AddOracleAddress"),
            (MsgKind::RemoveOracleAddress, "zoracle/RemoveOracleAddress"),
        ];
        for (kind, name) in entries {
            // The table above has no repeats.
            let _ = registry.register(kind, name);
        }
        registry
    }

    /// Registers `kind` under `name`. Both must be unused.
    pub fn register(&mut self, kind: MsgKind, name: &'static str) -> Result<(), String> {
        if self.by_kind.contains_key(&kind) {
            return Err(format!("{:?} is already registered", kind));
        }
        if self.by_name.contains_key(name) {
            return Err(format!("name {} is already registered", name));
        }
        self.by_kind.insert(kind, name);
        self.by_name.insert(name, kind);
        Ok(())
    }

    /// The registered name of `kind`.
    pub fn name_of(&self, kind: MsgKind) -> Option<&'static str> {
        self.by_kind.get(&kind).copied()
    }

    /// The kind registered under `name`.
    pub fn kind_of(&self, name: &str) -> Option<MsgKind> {
        self.by_name.get(name).copied()
    }

    fn require_name(&self, kind: MsgKind) -> Result<&'static str, OracleError> {
        self.name_of(kind)
            .ok_or_else(|| OracleError::Codec(format!("{:?} is not registered", kind)))
    }

    /// Sorted-JSON sign bytes: `{"type": <name>, "value": <message>}`.
    pub fn sign_bytes(&self, msg: &OracleMsg) -> Result<Vec<u8>, OracleError> {
        let ty = self.require_name(msg.kind())?;
        let doc = each_msg!(msg, m => to_sorted_json(&SignDoc { ty, value: m }));
        doc.map_err(OracleError::Codec)
    }

    /// Encodes a message into a name-tagged binary envelope.
    pub fn encode(&self, msg: &OracleMsg) -> Result<Vec<u8>, OracleError> {
        let name = self.require_name(msg.kind())?;
        let body = each_msg!(msg, m => to_bytes_canonical(m));
        Ok(to_bytes_canonical(&Envelope {
            name: name.to_string(),
            body,
        }))
    }

    /// Decodes a name-tagged binary envelope.
    pub fn decode(&self, bytes: &[u8]) -> Result<OracleMsg, OracleError> {
        let envelope: Envelope = from_bytes_canonical(bytes).map_err(OracleError::Codec)?;
        let kind = self
            .kind_of(&envelope.name)
            .ok_or_else(|| OracleError::Codec(format!("unregistered message {}", envelope.name)))?;
        let body = envelope.body.as_slice();
        let msg = match kind {
            MsgKind::RequestData => from_bytes_canonical(body).map(OracleMsg::RequestData),
            MsgKind::ReportData => from_bytes_canonical(body).map(OracleMsg::ReportData),
            MsgKind::CreateDataSource => from_bytes_canonical(body).map(OracleMsg::CreateDataSource),
            MsgKind::EditDataSource => from_bytes_canonical(body).map(OracleMsg::EditDataSource),
            MsgKind::CreateOracleScript => {
                from_bytes_canonical(body).map(OracleMsg::CreateOracleScript)
            }
            MsgKind::EditOracleScript => from_bytes_canonical(body).map(OracleMsg::EditOracleScript),
            MsgKind::AddOracleAddress => from_bytes_canonical(body).map(OracleMsg::AddOracleAddress),
            MsgKind::RemoveOracleAddress => {
                from_bytes_canonical(body).map(OracleMsg::RemoveOracleAddress)
            }
        };
        msg.map_err(OracleError::Codec)
    }
}
