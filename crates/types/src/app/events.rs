// Path: crates/types/src/app/events.rs

use crate::app::{DataSourceId, OracleScriptId, RequestId, ResolveStatus, ValAddress};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Observable state changes emitted by the oracle module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum OracleEvent {
    /// A data source was registered.
    CreateDataSource {
        /// The new data source ID.
        id: DataSourceId,
    },
    /// A data source was overwritten by its owner.
    EditDataSource {
        /// The edited data source ID.
        id: DataSourceId,
    },
    /// An oracle script was registered.
    CreateOracleScript {
        /// The new oracle script ID.
        id: OracleScriptId,
    },
    /// An oracle script was overwritten by its owner.
    EditOracleScript {
        /// The edited oracle script ID.
        id: OracleScriptId,
    },
    /// A request was created.
    Request {
        /// The new request ID.
        id: RequestId,
    },
    /// A validator's reports were accepted.
    Report {
        /// The request the reports answer.
        request_id: RequestId,
        /// The reporting validator.
        validator: ValAddress,
    },
    /// A request reached a terminal status.
    Resolve {
        /// The resolved request.
        request_id: RequestId,
        /// The terminal status.
        status: ResolveStatus,
    },
}
