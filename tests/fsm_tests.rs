#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use adev::fsm::{chain, ensure_valid, reachable_states, to_diagram, to_generation_bindings, validate, FsmModel, StateRole, CHAIN_EVENT};
use adev::validator::IssueKind;
use common::{fixture, hello_world_fsm};

fn payment_flow() -> FsmModel {
    let text = std::fs::read_to_string(fixture("payment_flow.mmd")).unwrap();
    FsmModel::from_mermaid(&text, "PaymentAbciApp").unwrap()
}

#[test]
fn test_fixture_is_valid() {
    let model = hello_world_fsm();
    assert!(ensure_valid(&model).unwrap().is_empty());
    assert_eq!(reachable_states(&model).len(), model.states.len());
}

#[test]
fn test_diagram_round_trip() {
    let model = hello_world_fsm();
    let diagram = to_diagram(&model);
    assert!(diagram.starts_with("graph TD\n  RegistrationRound\n"));
    let parsed = FsmModel::from_mermaid(&diagram, &model.label).unwrap();
    assert_eq!(parsed.states, model.states);
    assert_eq!(parsed.transitions, model.transitions);
    assert_eq!(parsed.default_start_state, model.default_start_state);
}

#[test]
fn test_yaml_round_trip() {
    let model = hello_world_fsm();
    assert_eq!(FsmModel::from_yaml_str(&model.to_yaml().unwrap()).unwrap(), model);
}

#[test]
fn test_state_diagram_fixture() {
    let model = payment_flow();
    assert_eq!(model.default_start_state, "AwaitPaymentRound");
    assert_eq!(model.final_states, ["SettledRound"]);
    assert_eq!(model.alphabet, ["PAID", "TIMEOUT", "DONE"]);
    assert!(ensure_valid(&model).unwrap().is_empty());
}

#[test]
fn test_bindings_roles() {
    let bindings = to_generation_bindings(&hello_world_fsm());
    assert_eq!(bindings.label_snake, "hello_world_abci_app");
    assert_eq!(bindings.states[0].role, StateRole::Start);
    assert_eq!(bindings.states[4].role, StateRole::Final);
    assert_eq!(bindings.alphabet[0], "DONE");
}

#[test]
fn test_unreachable_final_is_only_a_warning() {
    let mut text = std::fs::read_to_string(fixture("fsm_specification.yaml")).unwrap();
    text = text.replace("(ResetAndPauseRound, DONE): FinishedRound", "(ResetAndPauseRound, DONE): RegistrationRound");
    let model = FsmModel::from_yaml_str(&text).unwrap();
    let result = validate(&model);
    assert!(result.is_ok());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, IssueKind::UnreachableFinalState);
}

#[test]
fn test_chain_fixtures() {
    let chained = chain(&[hello_world_fsm(), payment_flow()], "ComposedAbciApp").unwrap();
    assert_eq!(chained.label, "ComposedAbciApp");
    assert_eq!(chained.next_state("FinishedRound", CHAIN_EVENT), Some("AwaitPaymentRound"));
    assert_eq!(chained.start_states, ["RegistrationRound"]);
    assert_eq!(chained.final_states, ["SettledRound"]);
    assert!(ensure_valid(&chained).unwrap().is_empty());
}
