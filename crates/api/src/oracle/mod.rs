// Path: crates/api/src/oracle/mod.rs
//! Strategies the oracle module depends on but does not define.

use crate::state::StateAccess;
use zoracle_types::app::{AccAddress, RequestId, ValAddress};
use zoracle_types::OracleError;

/// Chooses the validators asked to report on a request.
pub trait ValidatorSelector: Send + Sync {
    /// Returns exactly `count` distinct validators, or `BadValue` if the active
    /// set is too small. Must be deterministic in its inputs.
    fn select(
        &self,
        state: &dyn StateAccess,
        request_id: RequestId,
        count: u64,
    ) -> Result<Vec<ValAddress>, OracleError>;
}

/// The reporter-to-validator delegation relation.
pub trait ReporterAuthorization: Send + Sync {
    /// True if `reporter` may submit reports on behalf of `validator`.
    fn is_authorized(
        &self,
        state: &dyn StateAccess,
        reporter: &AccAddress,
        validator: &ValAddress,
    ) -> Result<bool, OracleError>;

    /// Grants the delegation. `Duplicate` if it already exists.
    fn add_reporter(
        &self,
        state: &mut dyn StateAccess,
        validator: &ValAddress,
        reporter: &AccAddress,
    ) -> Result<(), OracleError>;

    /// Revokes the delegation. `NotFound` if it does not exist.
    fn remove_reporter(
        &self,
        state: &mut dyn StateAccess,
        validator: &ValAddress,
        reporter: &AccAddress,
    ) -> Result<(), OracleError>;
}
