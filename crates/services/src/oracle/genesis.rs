// Path: crates/services/src/oracle/genesis.rs
use super::params::store_params;
use super::OracleModule;
use zoracle_api::state::StateAccess;
use zoracle_api::transaction::TxContext;
use zoracle_types::genesis::GenesisState;
use zoracle_types::OracleError;

impl OracleModule {
    /// Writes parameters, then registers every record through the registry so
    /// IDs are assigned densely from 1 in list order.
    pub fn init_genesis(
        &self,
        state: &mut dyn StateAccess,
        genesis: &GenesisState,
    ) -> Result<(), OracleError> {
        genesis.validate_genesis().map_err(OracleError::BadValue)?;
        store_params(state, &genesis.params)?;

        let mut ctx = TxContext::internal(0);
        for ds in &genesis.data_sources {
            self.add_data_source(state, &mut ctx, ds.clone())?;
        }
        for os in &genesis.oracle_scripts {
            self.add_oracle_script(state, &mut ctx, os.clone())?;
        }
        tracing::info!(
            target: "oracle",
            data_sources = genesis.data_sources.len(),
            oracle_scripts = genesis.oracle_scripts.len(),
            "oracle genesis initialised"
        );
        Ok(())
    }

    pub fn export_genesis(&self, state: &dyn StateAccess) -> Result<GenesisState, OracleError> {
        Ok(GenesisState {
            params: self.params(state)?,
            data_sources: self.get_data_sources(state)?,
            oracle_scripts: self.get_oracle_scripts(state)?,
        })
    }
}
