// Path: crates/types/src/config/mod.rs

//! Oracle module parameters and sandbox configuration.
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Limits and gas schedule governing the oracle module.
///
/// Persisted under [`crate::keys::PARAMS_KEY`] so every validator reads the same
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct OracleParams {
    /// Maximum size of a data source executable, in bytes.
    #[serde(default = "default_max_data_source_executable_size")]
    pub max_data_source_executable_size: u64,
    /// Maximum size of oracle script code, in bytes.
    #[serde(default = "default_max_oracle_script_code_size")]
    pub max_oracle_script_code_size: u64,
    /// Maximum size of request calldata, in bytes.
    #[serde(default = "default_max_calldata_size")]
    pub max_calldata_size: u64,
    /// Maximum number of distinct data sources one request may use.
    #[serde(default = "default_max_data_source_count_per_request")]
    pub max_data_source_count_per_request: u64,
    /// Maximum size of one raw report's data, in bytes.
    #[serde(default = "default_max_raw_data_report_size")]
    pub max_raw_data_report_size: u64,
    /// Maximum size of a result, in bytes.
    #[serde(default = "default_max_result_size")]
    pub max_result_size: u64,
    /// Maximum length of a record name.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: u64,
    /// Maximum length of a record description.
    #[serde(default = "default_max_description_length")]
    pub max_description_length: u64,
    /// Total execute gas available to the resolution queue per block.
    #[serde(default = "default_end_block_execute_gas_limit")]
    pub end_block_execute_gas_limit: u64,
    /// Transaction gas charged per raw data request per requested validator.
    #[serde(default = "default_gas_per_raw_data_request_per_validator")]
    pub gas_per_raw_data_request_per_validator: u64,
}

fn default_max_data_source_executable_size() -> u64 {
    10_000
}
fn default_max_oracle_script_code_size() -> u64 {
    500_000
}
fn default_max_calldata_size() -> u64 {
    1_024
}
fn default_max_data_source_count_per_request() -> u64 {
    16
}
fn default_max_raw_data_report_size() -> u64 {
    1_024
}
fn default_max_result_size() -> u64 {
    1_024
}
fn default_max_name_length() -> u64 {
    280
}
fn default_max_description_length() -> u64 {
    4_096
}
fn default_end_block_execute_gas_limit() -> u64 {
    10_000_000
}
fn default_gas_per_raw_data_request_per_validator() -> u64 {
    25_000
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            max_data_source_executable_size: default_max_data_source_executable_size(),
            max_oracle_script_code_size: default_max_oracle_script_code_size(),
            max_calldata_size: default_max_calldata_size(),
            max_data_source_count_per_request: default_max_data_source_count_per_request(),
            max_raw_data_report_size: default_max_raw_data_report_size(),
            max_result_size: default_max_result_size(),
            max_name_length: default_max_name_length(),
            max_description_length: default_max_description_length(),
            end_block_execute_gas_limit: default_end_block_execute_gas_limit(),
            gas_per_raw_data_request_per_validator: default_gas_per_raw_data_request_per_validator(
            ),
        }
    }
}

impl OracleParams {
    /// Parses parameters from TOML. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("invalid oracle params: {}", e))
    }

    /// Checks that every limit is positive.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("max_data_source_executable_size", self.max_data_source_executable_size),
            ("max_oracle_script_code_size", self.max_oracle_script_code_size),
            ("max_calldata_size", self.max_calldata_size),
            ("max_data_source_count_per_request", self.max_data_source_count_per_request),
            ("max_raw_data_report_size", self.max_raw_data_report_size),
            ("max_result_size", self.max_result_size),
            ("max_name_length", self.max_name_length),
            ("max_description_length", self.max_description_length),
            ("end_block_execute_gas_limit", self.end_block_execute_gas_limit),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(format!("{} must be positive", name));
            }
        }
        Ok(())
    }
}

/// Fuel charged for each host call made by a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCallCosts {
    /// Flat cost of any host call.
    #[serde(default = "default_host_call_base")]
    pub base: u64,
    /// Additional cost per byte moved across the host boundary.
    #[serde(default = "default_host_call_per_byte")]
    pub per_byte: u64,
}

fn default_host_call_base() -> u64 {
    1_000
}
fn default_host_call_per_byte() -> u64 {
    1
}

impl Default for HostCallCosts {
    fn default() -> Self {
        Self {
            base: default_host_call_base(),
            per_byte: default_host_call_per_byte(),
        }
    }
}

impl HostCallCosts {
    /// Fuel charged for a call that moves `bytes` bytes.
    pub fn cost(&self, bytes: usize) -> u64 {
        self.base
            .saturating_add(self.per_byte.saturating_mul(bytes as u64))
    }
}

/// Fixed resource limits of the script sandbox. Not tunable per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Maximum linear memory, in 64 KiB pages.
    #[serde(default = "default_max_memory_pages")]
    pub max_memory_pages: u32,
    /// Maximum number of elements in any table.
    #[serde(default = "default_max_table_elements")]
    pub max_table_elements: u32,
    /// Maximum native stack the WASM code may use, bounding call depth.
    #[serde(default = "default_max_wasm_stack_bytes")]
    pub max_wasm_stack_bytes: usize,
    /// Maximum number of module instances per invocation.
    #[serde(default = "default_max_instances")]
    pub max_instances: usize,
    /// Whether floating-point instructions are accepted. NaN results are
    /// canonicalised when enabled.
    #[serde(default = "default_allow_floating_point")]
    pub allow_floating_point: bool,
    /// Host call fuel schedule.
    #[serde(default)]
    pub host_call_costs: HostCallCosts,
}

fn default_max_memory_pages() -> u32 {
    1024
}
fn default_max_table_elements() -> u32 {
    1024
}
fn default_max_wasm_stack_bytes() -> usize {
    1024 * 1024
}
fn default_max_instances() -> usize {
    1
}
fn default_allow_floating_point() -> bool {
    true
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: default_max_memory_pages(),
            max_table_elements: default_max_table_elements(),
            max_wasm_stack_bytes: default_max_wasm_stack_bytes(),
            max_instances: default_max_instances(),
            allow_floating_point: default_allow_floating_point(),
            host_call_costs: HostCallCosts::default(),
        }
    }
}

impl SandboxConfig {
    /// Parses a sandbox configuration from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("invalid sandbox config: {}", e))
    }
}
