// Path: crates/services/tests/report_collector.rs
mod common;

use common::*;
use zoracle_api::transaction::TxContext;
use zoracle_types::app::{RawDataReportWithId, RequestId, ResolveStatus, ValAddress};
use zoracle_types::OracleError;

/// A 4-of-4 assignment with quorum 3, created at height 10, expiring at 110.
fn open_request() -> (Fixture, RequestId, Vec<ValAddress>) {
    let mut fx = Fixture::new();
    let script = fx.add_script(ECHO_SCRIPT);
    let id = fx.request(script, 4, 3, 100, 10).unwrap();
    let validators = fx.requested_validators(id);
    (fx, id, validators)
}

#[test]
fn unknown_request_is_not_found() {
    let (mut fx, _, validators) = open_request();
    let err = fx
        .report_as(RequestId(99), &validators[0], &full_report(2, b"1"), 11)
        .unwrap_err();
    assert!(matches!(err, OracleError::NotFound(_)));
}

#[test]
fn resolved_request_rejects_reports() {
    let (mut fx, id, validators) = open_request();
    for v in &validators[..3] {
        fx.report_as(id, v, &full_report(2, b"1"), 11).unwrap();
    }
    fx.end_block(11);
    assert_eq!(
        fx.module.get_request(&fx.state, id).unwrap().resolve_status,
        ResolveStatus::Success
    );

    let err = fx
        .report_as(id, &validators[3], &full_report(2, b"1"), 12)
        .unwrap_err();
    assert!(matches!(err, OracleError::InvalidState(_)));
}

#[test]
fn report_past_expiration_is_rejected_and_request_untouched() {
    let (mut fx, id, validators) = open_request();
    fx.report_as(id, &validators[0], &full_report(2, b"1"), 50).unwrap();
    let before = fx.module.get_request(&fx.state, id).unwrap();
    let root = fx.state.root_hash();

    let err = fx
        .report_as(id, &validators[1], &full_report(2, b"1"), before.expiration_height + 1)
        .unwrap_err();
    assert!(matches!(err, OracleError::InvalidState(_)));

    let after = fx.module.get_request(&fx.state, id).unwrap();
    assert_eq!(after.resolve_status, ResolveStatus::Open);
    assert_eq!(after.received_validators, before.received_validators);
    assert_eq!(fx.state.root_hash(), root);
}

#[test]
fn report_at_expiration_height_is_accepted() {
    let (mut fx, id, validators) = open_request();
    let expiration = fx.module.get_request(&fx.state, id).unwrap().expiration_height;
    fx.report_as(id, &validators[0], &full_report(2, b"1"), expiration)
        .unwrap();
}

#[test]
fn reporter_must_be_authorised_for_the_validator() {
    let (mut fx, id, validators) = open_request();
    let wrong_reporter = fx.reporter_of(&validators[1]);
    let mut ctx = TxContext::new(11, wrong_reporter.clone(), TX_GAS);
    let err = fx
        .module
        .add_report(
            &mut fx.state,
            &mut ctx,
            id,
            &full_report(2, b"1"),
            &validators[0],
            &wrong_reporter,
        )
        .unwrap_err();
    assert!(matches!(err, OracleError::Unauthorized(_)));
}

#[test]
fn validator_must_be_assigned() {
    let mut fx = Fixture::new();
    let script = fx.add_script(ECHO_SCRIPT);
    let id = fx.request(script, 2, 2, 100, 10).unwrap();
    let assigned = fx.requested_validators(id);
    let outsider = fx
        .validators
        .iter()
        .find(|v| !assigned.contains(v))
        .cloned()
        .unwrap();

    // Wrong length too; membership is checked first.
    let err = fx
        .report_as(id, &outsider, &full_report(1, b"1"), 11)
        .unwrap_err();
    assert!(matches!(err, OracleError::Unauthorized(_)));
}

#[test]
fn second_report_from_a_validator_is_duplicate() {
    let (mut fx, id, validators) = open_request();
    fx.report_as(id, &validators[0], &full_report(2, b"1"), 11).unwrap();
    let err = fx
        .report_as(id, &validators[0], &full_report(2, b"2"), 12)
        .unwrap_err();
    assert!(matches!(err, OracleError::Duplicate(_)));
}

#[test]
fn partial_data_set_is_bad_value() {
    let (mut fx, id, validators) = open_request();
    let err = fx
        .report_as(id, &validators[0], &full_report(1, b"1"), 11)
        .unwrap_err();
    assert!(matches!(err, OracleError::BadValue(_)));
}

#[test]
fn decreasing_external_ids_persist_nothing() {
    let (mut fx, id, validators) = open_request();
    let root = fx.state.root_hash();
    let data_set = vec![
        RawDataReportWithId::new(2u64, 0, b"two".to_vec()),
        RawDataReportWithId::new(1u64, 0, b"one".to_vec()),
    ];
    let err = fx.report_as(id, &validators[0], &data_set, 11).unwrap_err();
    assert!(matches!(err, OracleError::BadValue(_)));
    assert!(fx.module.get_raw_reports(&fx.state, id).unwrap().is_empty());
    assert_eq!(fx.state.root_hash(), root);
}

#[test]
fn repeated_external_id_is_bad_value() {
    let (mut fx, id, validators) = open_request();
    let data_set = vec![
        RawDataReportWithId::new(1u64, 0, b"a".to_vec()),
        RawDataReportWithId::new(1u64, 0, b"b".to_vec()),
    ];
    let err = fx.report_as(id, &validators[0], &data_set, 11).unwrap_err();
    assert!(matches!(err, OracleError::BadValue(_)));
}

#[test]
fn unknown_external_id_is_bad_value() {
    let (mut fx, id, validators) = open_request();
    let data_set = vec![
        RawDataReportWithId::new(1u64, 0, b"a".to_vec()),
        RawDataReportWithId::new(3u64, 0, b"b".to_vec()),
    ];
    let err = fx.report_as(id, &validators[0], &data_set, 11).unwrap_err();
    assert!(matches!(err, OracleError::BadValue(_)));
}

#[test]
fn oversized_raw_report_is_bad_value() {
    let (mut fx, id, validators) = open_request();
    let data_set = vec![
        RawDataReportWithId::new(1u64, 0, b"a".to_vec()),
        RawDataReportWithId::new(2u64, 0, vec![7u8; 1_025]),
    ];
    let err = fx.report_as(id, &validators[0], &data_set, 11).unwrap_err();
    assert!(matches!(err, OracleError::BadValue(_)));
}

#[test]
fn expiry_is_checked_before_authorisation() {
    let (mut fx, id, validators) = open_request();
    let wrong_reporter = fx.reporter_of(&validators[1]);
    let mut ctx = TxContext::new(500, wrong_reporter.clone(), TX_GAS);
    let err = fx
        .module
        .add_report(
            &mut fx.state,
            &mut ctx,
            id,
            &full_report(2, b"1"),
            &validators[0],
            &wrong_reporter,
        )
        .unwrap_err();
    assert!(matches!(err, OracleError::InvalidState(_)));
}

#[test]
fn quorum_enqueues_exactly_once() {
    let (mut fx, id, validators) = open_request();

    fx.report_as(id, &validators[0], &full_report(2, b"1"), 11).unwrap();
    fx.report_as(id, &validators[1], &full_report(2, b"2"), 12).unwrap();
    assert!(fx.module.get_pending_requests(&fx.state).unwrap().is_empty());

    fx.report_as(id, &validators[2], &full_report(2, b"3"), 13).unwrap();
    assert_eq!(fx.module.get_pending_requests(&fx.state).unwrap(), vec![id]);
    assert_eq!(
        fx.module.get_request(&fx.state, id).unwrap().resolve_status,
        ResolveStatus::Open
    );

    fx.report_as(id, &validators[3], &full_report(2, b"4"), 14).unwrap();
    assert_eq!(fx.module.get_pending_requests(&fx.state).unwrap(), vec![id]);

    let request = fx.module.get_request(&fx.state, id).unwrap();
    assert_eq!(request.received_validators, validators);
    assert_eq!(fx.module.get_raw_reports(&fx.state, id).unwrap().len(), 8);
}

#[test]
fn accepted_report_emits_event() {
    let (mut fx, id, validators) = open_request();
    let reporter = fx.reporter_of(&validators[0]);
    let mut ctx = TxContext::new(11, reporter.clone(), TX_GAS);
    fx.module
        .add_report(
            &mut fx.state,
            &mut ctx,
            id,
            &full_report(2, b"1"),
            &validators[0],
            &reporter,
        )
        .unwrap();
    assert_eq!(
        ctx.events,
        vec![zoracle_types::app::OracleEvent::Report {
            request_id: id,
            validator: validators[0].clone(),
        }]
    );
}
