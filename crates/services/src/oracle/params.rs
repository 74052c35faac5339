// Path: crates/services/src/oracle/params.rs
//! Parameter and counter storage.

use zoracle_api::state::{get_decoded, put_encoded, StateAccess};
use zoracle_types::config::OracleParams;
use zoracle_types::keys::PARAMS_KEY;
use zoracle_types::OracleError;

/// Reads the module parameters. They must have been written at genesis.
pub(crate) fn load_params(state: &dyn StateAccess) -> Result<OracleParams, OracleError> {
    get_decoded(state, PARAMS_KEY)?
        .ok_or_else(|| OracleError::InvalidState("oracle params are not initialised".into()))
}

pub(crate) fn store_params(
    state: &mut dyn StateAccess,
    params: &OracleParams,
) -> Result<(), OracleError> {
    params.validate().map_err(OracleError::BadValue)?;
    put_encoded(state, PARAMS_KEY, params)?;
    Ok(())
}

/// Number of records created under a counter key; zero if never written.
pub(crate) fn read_counter(state: &dyn StateAccess, key: &[u8]) -> Result<u64, OracleError> {
    Ok(get_decoded::<u64>(state, key)?.unwrap_or(0))
}

pub(crate) fn write_counter(
    state: &mut dyn StateAccess,
    key: &[u8],
    value: u64,
) -> Result<(), OracleError> {
    put_encoded(state, key, &value)?;
    Ok(())
}
