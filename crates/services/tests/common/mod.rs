// Path: crates/services/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;
use zoracle_api::transaction::TxContext;
use zoracle_services::{OracleModule, StaticValidatorSet, StoreReporterRegistry};
use zoracle_state::prelude::InMemoryState;
use zoracle_types::app::{
    AccAddress, Coins, DataSource, OracleScript, OracleScriptId, RawDataReportWithId, RequestId,
    ValAddress,
};
use zoracle_types::config::{OracleParams, SandboxConfig};
use zoracle_types::genesis::GenesisState;
use zoracle_types::msgs::{MsgAddOracleAddress, MsgRegistry, MsgRequestData, OracleMsg};
use zoracle_types::OracleError;
use zoracle_vm_wasm::OwasmRuntime;

/// Requests data source 1 with "a" and data source 2 with "b"; execute saves
/// the first validator's report for external ID 1.
pub const ECHO_SCRIPT: &str = r#"
    (module
      (import "env" "request_raw_data" (func $req (param i64 i32 i32) (result i64)))
      (import "env" "get_raw_report_size" (func $size (param i64 i32) (result i32)))
      (import "env" "read_raw_report" (func $read (param i64 i32 i32)))
      (import "env" "save_result" (func $save (param i32 i32)))
      (memory (export "memory") 1)
      (data (i32.const 0) "ab")
      (func (export "prepare")
        (drop (call $req (i64.const 1) (i32.const 0) (i32.const 1)))
        (drop (call $req (i64.const 2) (i32.const 1) (i32.const 1))))
      (func (export "execute")
        (local $n i32)
        (local.set $n (call $size (i64.const 1) (i32.const 0)))
        (call $read (i64.const 1) (i32.const 0) (i32.const 1024))
        (call $save (i32.const 1024) (local.get $n))))
"#;

/// Prepare traps immediately.
pub const PREPARE_TRAP_SCRIPT: &str = r#"
    (module
      (memory (export "memory") 1)
      (func (export "prepare") unreachable)
      (func (export "execute")))
"#;

/// Prepare requests data source 1 once; execute traps.
pub const EXECUTE_TRAP_SCRIPT: &str = r#"
    (module
      (import "env" "request_raw_data" (func $req (param i64 i32 i32) (result i64)))
      (memory (export "memory") 1)
      (func (export "prepare")
        (drop (call $req (i64.const 1) (i32.const 0) (i32.const 0))))
      (func (export "execute") unreachable))
"#;

/// Prepare requests data sources 1, 2 and 3.
pub const THREE_SOURCES_SCRIPT: &str = r#"
    (module
      (import "env" "request_raw_data" (func $req (param i64 i32 i32) (result i64)))
      (memory (export "memory") 1)
      (func (export "prepare")
        (drop (call $req (i64.const 1) (i32.const 0) (i32.const 0)))
        (drop (call $req (i64.const 2) (i32.const 0) (i32.const 0)))
        (drop (call $req (i64.const 3) (i32.const 0) (i32.const 0))))
      (func (export "execute")))
"#;

/// Prepare requests data source 1 once; execute saves 2000 zero bytes.
pub const BIG_RESULT_SCRIPT: &str = r#"
    (module
      (import "env" "request_raw_data" (func $req (param i64 i32 i32) (result i64)))
      (import "env" "save_result" (func $save (param i32 i32)))
      (memory (export "memory") 1)
      (func (export "prepare")
        (drop (call $req (i64.const 1) (i32.const 0) (i32.const 0))))
      (func (export "execute")
        (call $save (i32.const 0) (i32.const 2000))))
"#;

/// Prepare loops forever.
pub const SPIN_SCRIPT: &str = r#"
    (module
      (memory (export "memory") 1)
      (func (export "prepare") (loop $l (br $l)))
      (func (export "execute")))
"#;

pub const PREPARE_GAS: u64 = 200_000;
pub const EXECUTE_GAS: u64 = 200_000;
pub const TX_GAS: u64 = 10_000_000;

pub struct Fixture {
    pub module: OracleModule,
    pub state: InMemoryState,
    pub owner: AccAddress,
    pub validators: Vec<ValAddress>,
    pub reporters: Vec<AccAddress>,
}

pub fn data_source(owner: &AccAddress, name: &str) -> DataSource {
    DataSource {
        owner: owner.clone(),
        name: name.into(),
        description: format!("{} description", name),
        fee: Coins::empty(),
        executable: b"#!/bin/sh\necho 1".to_vec(),
    }
}

pub fn oracle_script(owner: &AccAddress, wat: &str) -> OracleScript {
    OracleScript {
        owner: owner.clone(),
        name: "script".into(),
        description: "test script".into(),
        code: wat::parse_str(wat).unwrap(),
    }
}

/// A complete, well-ordered data set for `count` external IDs.
pub fn full_report(count: u64, payload: &[u8]) -> Vec<RawDataReportWithId> {
    (1..=count)
        .map(|ext| RawDataReportWithId::new(ext, 0, payload.to_vec()))
        .collect()
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_params(OracleParams::default())
    }

    /// Four validators, each with one authorised reporter, and three data
    /// sources registered at genesis.
    pub fn with_params(params: OracleParams) -> Self {
        let validators: Vec<ValAddress> = (1u8..=4).map(|b| ValAddress(vec![b])).collect();
        let reporters: Vec<AccAddress> = (1u8..=4).map(|b| AccAddress(vec![0x10 + b])).collect();
        let owner = AccAddress(vec![0xAA]);

        let module = OracleModule::new(
            Arc::new(OwasmRuntime::new(SandboxConfig::default()).unwrap()),
            Arc::new(StaticValidatorSet::new(validators.clone())),
            Arc::new(StoreReporterRegistry),
            MsgRegistry::new(),
        );
        let mut state = InMemoryState::new();
        let genesis = GenesisState {
            params,
            data_sources: vec![
                data_source(&owner, "ds1"),
                data_source(&owner, "ds2"),
                data_source(&owner, "ds3"),
            ],
            oracle_scripts: vec![],
        };
        module.init_genesis(&mut state, &genesis).unwrap();

        for (validator, reporter) in validators.iter().zip(reporters.iter()) {
            let mut ctx = TxContext::new(1, AccAddress(validator.0.clone()), TX_GAS);
            module
                .deliver(
                    &mut state,
                    &mut ctx,
                    OracleMsg::AddOracleAddress(MsgAddOracleAddress {
                        validator: validator.clone(),
                        reporter: reporter.clone(),
                    }),
                )
                .unwrap();
        }

        Self {
            module,
            state,
            owner,
            validators,
            reporters,
        }
    }

    pub fn ctx(&self, height: u64) -> TxContext {
        TxContext::new(height, self.owner.clone(), TX_GAS)
    }

    pub fn add_script(&mut self, wat: &str) -> OracleScriptId {
        let mut ctx = self.ctx(1);
        self.module
            .add_oracle_script(&mut self.state, &mut ctx, oracle_script(&self.owner, wat))
            .unwrap()
    }

    pub fn request_msg(
        &self,
        script: OracleScriptId,
        requested: u64,
        sufficient: u64,
        expiration: u64,
    ) -> MsgRequestData {
        MsgRequestData {
            oracle_script_id: script,
            calldata: b"BTC".to_vec(),
            requested_validator_count: requested,
            sufficient_validator_count: sufficient,
            expiration,
            prepare_gas: PREPARE_GAS,
            execute_gas: EXECUTE_GAS,
            sender: self.owner.clone(),
        }
    }

    pub fn request(
        &mut self,
        script: OracleScriptId,
        requested: u64,
        sufficient: u64,
        expiration: u64,
        height: u64,
    ) -> Result<RequestId, OracleError> {
        let msg = self.request_msg(script, requested, sufficient, expiration);
        let mut ctx = self.ctx(height);
        self.module.request_data(&mut self.state, &mut ctx, &msg)
    }

    /// Reports as `validator` through its authorised reporter.
    pub fn report_as(
        &mut self,
        id: RequestId,
        validator: &ValAddress,
        data_set: &[RawDataReportWithId],
        height: u64,
    ) -> Result<(), OracleError> {
        let reporter = self.reporter_of(validator);
        let mut ctx = TxContext::new(height, reporter.clone(), TX_GAS);
        self.module
            .add_report(&mut self.state, &mut ctx, id, data_set, validator, &reporter)
    }

    pub fn reporter_of(&self, validator: &ValAddress) -> AccAddress {
        let idx = self
            .validators
            .iter()
            .position(|v| v == validator)
            .unwrap();
        self.reporters[idx].clone()
    }

    pub fn requested_validators(&self, id: RequestId) -> Vec<ValAddress> {
        self.module
            .get_request(&self.state, id)
            .unwrap()
            .requested_validators
    }

    pub fn end_block(&mut self, height: u64) -> TxContext {
        let mut ctx = TxContext::internal(height);
        self.module.end_block(&mut self.state, &mut ctx).unwrap();
        ctx
    }
}
