// Path: crates/types/src/genesis.rs
//! Genesis state of the oracle module.

use crate::app::{DataSource, OracleScript};
use crate::config::OracleParams;
use serde::{Deserialize, Serialize};

/// Everything needed to bootstrap or snapshot the registry.
///
/// Records are listed in ID order; IDs themselves are not stored because import
/// re-assigns them densely from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Module parameters.
    #[serde(default)]
    pub params: OracleParams,
    /// Data sources in ID order.
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    /// Oracle scripts in ID order.
    #[serde(default)]
    pub oracle_scripts: Vec<OracleScript>,
}

impl GenesisState {
    /// Genesis with default parameters and an empty registry.
    pub fn default_genesis() -> Self {
        Self::default()
    }

    /// Parses genesis from JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        serde_json::from_slice(bytes).map_err(|e| format!("invalid oracle genesis: {}", e))
    }

    /// Checks parameters and that every record fits within them.
    pub fn validate_genesis(&self) -> Result<(), String> {
        self.params.validate()?;
        let p = &self.params;
        for (i, ds) in self.data_sources.iter().enumerate() {
            let id = i + 1;
            if ds.executable.len() as u64 > p.max_data_source_executable_size {
                return Err(format!("data source {}: executable too large", id));
            }
            if ds.name.len() as u64 > p.max_name_length {
                return Err(format!("data source {}: name too long", id));
            }
            if ds.description.len() as u64 > p.max_description_length {
                return Err(format!("data source {}: description too long", id));
            }
            if !ds.fee.is_valid() {
                return Err(format!("data source {}: invalid fee", id));
            }
        }
        for (i, os) in self.oracle_scripts.iter().enumerate() {
            let id = i + 1;
            if os.code.len() as u64 > p.max_oracle_script_code_size {
                return Err(format!("oracle script {}: code too large", id));
            }
            if os.name.len() as u64 > p.max_name_length {
                return Err(format!("oracle script {}: name too long", id));
            }
            if os.description.len() as u64 > p.max_description_length {
                return Err(format!("oracle script {}: description too long", id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AccAddress, Coins};

    #[test]
    fn default_genesis_is_valid() {
        assert!(GenesisState::default_genesis().validate_genesis().is_ok());
    }

    #[test]
    fn oversized_record_is_rejected() {
        let mut genesis = GenesisState::default_genesis();
        genesis.params.max_data_source_executable_size = 4;
        genesis.data_sources.push(DataSource {
            owner: AccAddress(vec![1]),
            name: "coingecko".into(),
            description: "price".into(),
            fee: Coins::empty(),
            executable: vec![0; 5],
        });
        assert_eq!(
            genesis.validate_genesis().unwrap_err(),
            "data source 1: executable too large"
        );
    }

    #[test]
    fn json_round_trip_uses_defaults_for_missing_sections() {
        let genesis = GenesisState::from_json(br#"{"oracle_scripts": []}"#).unwrap();
        assert_eq!(genesis, GenesisState::default_genesis());
    }
}
