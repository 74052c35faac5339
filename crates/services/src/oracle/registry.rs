// Path: crates/services/src/oracle/registry.rs
//! Data source and oracle script registry.
//!
//! Records are never deleted. An edit is a full overwrite that keeps the ID.

use super::params::{load_params, read_counter, write_counter};
use super::OracleModule;
use zoracle_api::state::{get_decoded, put_encoded, scan_decoded, StateAccess};
use zoracle_api::transaction::TxContext;
use zoracle_types::app::{AccAddress, DataSource, DataSourceId, OracleEvent, OracleScript, OracleScriptId};
use zoracle_types::config::OracleParams;
use zoracle_types::keys::{
    data_source_key, oracle_script_key, DATA_SOURCE_COUNT_KEY, DATA_SOURCE_PREFIX,
    ORACLE_SCRIPT_COUNT_KEY, ORACLE_SCRIPT_PREFIX,
};
use zoracle_types::OracleError;

fn check_len(op: &str, field: &str, len: usize, max: u64) -> Result<(), OracleError> {
    if len as u64 > max {
        return Err(OracleError::BadValue(format!(
            "{}: {} size ({}) exceeds the maximum ({})",
            op, field, len, max
        )));
    }
    Ok(())
}

fn check_data_source(op: &str, params: &OracleParams, ds: &DataSource) -> Result<(), OracleError> {
    check_len(op, "executable", ds.executable.len(), params.max_data_source_executable_size)?;
    check_len(op, "name", ds.name.len(), params.max_name_length)?;
    check_len(op, "description", ds.description.len(), params.max_description_length)
}

fn check_oracle_script(op: &str, params: &OracleParams, os: &OracleScript) -> Result<(), OracleError> {
    check_len(op, "code", os.code.len(), params.max_oracle_script_code_size)?;
    check_len(op, "name", os.name.len(), params.max_name_length)?;
    check_len(op, "description", os.description.len(), params.max_description_length)
}

impl OracleModule {
    /// Stores a new data source under the next ID.
    pub fn add_data_source(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        data_source: DataSource,
    ) -> Result<DataSourceId, OracleError> {
        let params = load_params(&*state)?;
        check_data_source("add data source", &params, &data_source)?;

        let id = DataSourceId(read_counter(&*state, DATA_SOURCE_COUNT_KEY)?).next();
        put_encoded(state, &data_source_key(id), &data_source)?;
        write_counter(state, DATA_SOURCE_COUNT_KEY, id.0)?;

        tracing::info!(target: "oracle", id = id.0, name = %data_source.name, "data source created");
        ctx.emit(OracleEvent::CreateDataSource { id });
        Ok(id)
    }

    /// Overwrites data source `id`. Only its current owner may edit it; the
    /// new record's owner becomes the owner from then on.
    pub fn edit_data_source(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        id: DataSourceId,
        sender: &AccAddress,
        data_source: DataSource,
    ) -> Result<(), OracleError> {
        let existing = self.get_data_source(&*state, id)?;
        if existing.owner != *sender {
            return Err(OracleError::Unauthorized(format!(
                "{} is not the owner of data source {}",
                sender, id
            )));
        }
        let params = load_params(&*state)?;
        check_data_source("edit data source", &params, &data_source)?;

        put_encoded(state, &data_source_key(id), &data_source)?;
        tracing::info!(target: "oracle", id = id.0, "data source edited");
        ctx.emit(OracleEvent::EditDataSource { id });
        Ok(())
    }

    pub fn get_data_source(
        &self,
        state: &dyn StateAccess,
        id: DataSourceId,
    ) -> Result<DataSource, OracleError> {
        get_decoded(state, &data_source_key(id))?
            .ok_or_else(|| OracleError::NotFound(format!("data source {}", id)))
    }

    /// Every data source in ID order.
    pub fn get_data_sources(&self, state: &dyn StateAccess) -> Result<Vec<DataSource>, OracleError> {
        Ok(scan_decoded(state, DATA_SOURCE_PREFIX)?)
    }

    pub fn data_source_count(&self, state: &dyn StateAccess) -> Result<u64, OracleError> {
        read_counter(state, DATA_SOURCE_COUNT_KEY)
    }

    /// Stores a new oracle script under the next ID.
    ///
    /// The code is not compiled here; a script that fails to load surfaces as
    /// a sandbox error when a request is made against it.
    pub fn add_oracle_script(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        oracle_script: OracleScript,
    ) -> Result<OracleScriptId, OracleError> {
        let params = load_params(&*state)?;
        check_oracle_script("add oracle script", &params, &oracle_script)?;

        let id = OracleScriptId(read_counter(&*state, ORACLE_SCRIPT_COUNT_KEY)?).next();
        put_encoded(state, &oracle_script_key(id), &oracle_script)?;
        write_counter(state, ORACLE_SCRIPT_COUNT_KEY, id.0)?;

        tracing::info!(target: "oracle", id = id.0, name = %oracle_script.name, "oracle script created");
        ctx.emit(OracleEvent::CreateOracleScript { id });
        Ok(id)
    }

    /// Overwrites oracle script `id`, with the same ownership rule as
    /// [`OracleModule::edit_data_source`].
    pub fn edit_oracle_script(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext,
        id: OracleScriptId,
        sender: &AccAddress,
        oracle_script: OracleScript,
    ) -> Result<(), OracleError> {
        let existing = self.get_oracle_script(&*state, id)?;
        if existing.owner != *sender {
            return Err(OracleError::Unauthorized(format!(
                "{} is not the owner of oracle script {}",
                sender, id
            )));
        }
        let params = load_params(&*state)?;
        check_oracle_script("edit oracle script", &params, &oracle_script)?;

        put_encoded(state, &oracle_script_key(id), &oracle_script)?;
        tracing::info!(target: "oracle", id = id.0, "oracle script edited");
        ctx.emit(OracleEvent::EditOracleScript { id });
        Ok(())
    }

    pub fn get_oracle_script(
        &self,
        state: &dyn StateAccess,
        id: OracleScriptId,
    ) -> Result<OracleScript, OracleError> {
        get_decoded(state, &oracle_script_key(id))?
            .ok_or_else(|| OracleError::NotFound(format!("oracle script {}", id)))
    }

    /// Every oracle script in ID order.
    pub fn get_oracle_scripts(&self, state: &dyn StateAccess) -> Result<Vec<OracleScript>, OracleError> {
        Ok(scan_decoded(state, ORACLE_SCRIPT_PREFIX)?)
    }

    pub fn oracle_script_count(&self, state: &dyn StateAccess) -> Result<u64, OracleError> {
        read_counter(state, ORACLE_SCRIPT_COUNT_KEY)
    }
}
