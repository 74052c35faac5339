// Path: crates/services/tests/registry.rs
mod common;

use common::*;
use proptest::prelude::*;
use zoracle_types::app::{AccAddress, DataSourceId, OracleEvent, OracleScriptId};
use zoracle_types::config::OracleParams;
use zoracle_types::OracleError;

#[test]
fn genesis_records_get_dense_ids() {
    let fx = Fixture::new();
    assert_eq!(fx.module.data_source_count(&fx.state).unwrap(), 3);
    let ds = fx.module.get_data_source(&fx.state, DataSourceId(2)).unwrap();
    assert_eq!(ds.name, "ds2");
    assert!(matches!(
        fx.module.get_data_source(&fx.state, DataSourceId(4)),
        Err(OracleError::NotFound(_))
    ));
}

#[test]
fn oversized_fields_are_bad_value() {
    let mut fx = Fixture::with_params(OracleParams {
        max_name_length: 4,
        max_description_length: 16,
        max_data_source_executable_size: 16,
        max_oracle_script_code_size: 64,
        ..OracleParams::default()
    });
    let owner = fx.owner.clone();
    let mut ctx = fx.ctx(2);

    let mut ds = data_source(&owner, "long name");
    ds.description = "ok".into();
    ds.executable = b"ok".to_vec();
    assert!(matches!(
        fx.module.add_data_source(&mut fx.state, &mut ctx, ds),
        Err(OracleError::BadValue(_))
    ));

    let mut ds = data_source(&owner, "n");
    ds.description = "ok".into();
    ds.executable = vec![0u8; 17];
    assert!(matches!(
        fx.module.add_data_source(&mut fx.state, &mut ctx, ds),
        Err(OracleError::BadValue(_))
    ));

    let mut os = oracle_script(&owner, ECHO_SCRIPT);
    os.name = "n".into();
    os.description = "d".into();
    assert!(matches!(
        fx.module.add_oracle_script(&mut fx.state, &mut ctx, os),
        Err(OracleError::BadValue(_))
    ));
    assert!(ctx.events.is_empty());
}

#[test]
fn edit_overwrites_and_transfers_ownership() {
    let mut fx = Fixture::new();
    let owner = fx.owner.clone();
    let new_owner = AccAddress(vec![0xBB]);
    let mut ctx = fx.ctx(2);

    let mut edited = data_source(&new_owner, "renamed");
    edited.executable = b"new".to_vec();
    fx.module
        .edit_data_source(&mut fx.state, &mut ctx, DataSourceId(1), &owner, edited.clone())
        .unwrap();
    assert_eq!(
        fx.module.get_data_source(&fx.state, DataSourceId(1)).unwrap(),
        edited
    );
    assert_eq!(ctx.events, vec![OracleEvent::EditDataSource { id: DataSourceId(1) }]);

    // The previous owner lost the right to edit.
    let err = fx
        .module
        .edit_data_source(
            &mut fx.state,
            &mut ctx,
            DataSourceId(1),
            &owner,
            data_source(&owner, "back"),
        )
        .unwrap_err();
    assert!(matches!(err, OracleError::Unauthorized(_)));
}

#[test]
fn edit_of_unknown_record_is_not_found() {
    let mut fx = Fixture::new();
    let owner = fx.owner.clone();
    let mut ctx = fx.ctx(2);
    assert!(matches!(
        fx.module.edit_oracle_script(
            &mut fx.state,
            &mut ctx,
            OracleScriptId(1),
            &owner,
            oracle_script(&owner, ECHO_SCRIPT),
        ),
        Err(OracleError::NotFound(_))
    ));
}

#[test]
fn genesis_export_round_trips() {
    let mut fx = Fixture::new();
    fx.add_script(ECHO_SCRIPT);
    let exported = fx.module.export_genesis(&fx.state).unwrap();
    assert_eq!(exported.data_sources.len(), 3);
    assert_eq!(exported.oracle_scripts.len(), 1);
    assert_eq!(exported.params, OracleParams::default());

    let mut fresh = zoracle_state::prelude::InMemoryState::new();
    fx.module.init_genesis(&mut fresh, &exported).unwrap();
    assert_eq!(fx.module.export_genesis(&fresh).unwrap(), exported);
}

#[derive(Debug, Clone)]
enum Op {
    AddDataSource,
    AddOracleScript,
    EditDataSource(u64),
    EditOracleScript(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddDataSource),
        Just(Op::AddOracleScript),
        (1u64..6).prop_map(Op::EditDataSource),
        (1u64..6).prop_map(Op::EditOracleScript),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ids_are_dense_and_increasing(ops in proptest::collection::vec(op(), 1..24)) {
        let mut fx = Fixture::new();
        let owner = fx.owner.clone();
        let mut ds_ids = vec![1u64, 2, 3];
        let mut os_ids: Vec<u64> = Vec::new();

        for op in ops {
            let mut ctx = fx.ctx(2);
            match op {
                Op::AddDataSource => {
                    let id = fx.module
                        .add_data_source(&mut fx.state, &mut ctx, data_source(&owner, "ds"))
                        .unwrap();
                    prop_assert_eq!(id.0, ds_ids.len() as u64 + 1);
                    ds_ids.push(id.0);
                }
                Op::AddOracleScript => {
                    let id = fx.module
                        .add_oracle_script(&mut fx.state, &mut ctx, oracle_script(&owner, SPIN_SCRIPT))
                        .unwrap();
                    prop_assert_eq!(id.0, os_ids.len() as u64 + 1);
                    os_ids.push(id.0);
                }
                Op::EditDataSource(id) => {
                    let res = fx.module.edit_data_source(
                        &mut fx.state, &mut ctx, DataSourceId(id), &owner, data_source(&owner, "edited"));
                    prop_assert_eq!(res.is_ok(), ds_ids.contains(&id));
                }
                Op::EditOracleScript(id) => {
                    let res = fx.module.edit_oracle_script(
                        &mut fx.state, &mut ctx, OracleScriptId(id), &owner, oracle_script(&owner, SPIN_SCRIPT));
                    prop_assert_eq!(res.is_ok(), os_ids.contains(&id));
                }
            }
        }

        prop_assert_eq!(fx.module.data_source_count(&fx.state).unwrap(), ds_ids.len() as u64);
        prop_assert_eq!(fx.module.get_data_sources(&fx.state).unwrap().len(), ds_ids.len());
        prop_assert_eq!(fx.module.get_oracle_scripts(&fx.state).unwrap().len(), os_ids.len());
    }
}
