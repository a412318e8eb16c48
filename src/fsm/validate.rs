use super::model::FsmModel;
use crate::error::{GenerationError, Result};
use crate::validator::{IssueKind, ValidationIssue, ValidationResult};
use std::collections::{HashSet, VecDeque};

/// Structural checks over a model.
///
/// Errors make the model unusable for generation. Warnings (unreachable
/// final states, start states that are also final, repeated declarations)
/// are informational.
pub fn validate(model: &FsmModel) -> ValidationResult {
    let mut result = model.load_issues.clone();
    let declared = |state: &str| model.states.iter().any(|s| s == state);

    if model.states.is_empty() {
        result.error("states", IssueKind::EmptyStates, "no states declared");
    }
    if model.start_states.is_empty() {
        result.error("start_states", IssueKind::EmptyStartStates, "no start state declared");
    }
    for start in &model.start_states {
        if !declared(start) {
            result.error(
                format!("start_states[{start}]"),
                IssueKind::DanglingState,
                format!("start state '{start}' is not a declared state"),
            );
        }
    }
    if !model.start_states.contains(&model.default_start_state) {
        result.error(
            "default_start_state",
            IssueKind::InvalidStartState,
            format!(
                "default start state '{}' is not one of the start states",
                model.default_start_state
            ),
        );
    }

    for transition in &model.transitions {
        let location = format!("transition_func[{}]", transition.key());
        for state in [&transition.source, &transition.target] {
            if !declared(state) {
                result.error(
                    &location,
                    IssueKind::DanglingState,
                    format!("state '{state}' is not declared"),
                );
            }
        }
        if !model.alphabet.contains(&transition.event) {
            result.error(
                &location,
                IssueKind::DanglingEvent,
                format!("event '{}' is not in the alphabet", transition.event),
            );
        }
    }

    for final_state in &model.final_states {
        if !declared(final_state) {
            result.error(
                format!("final_states[{final_state}]"),
                IssueKind::DanglingFinalState,
                format!("final state '{final_state}' is not a declared state"),
            );
        }
        if model.is_start(final_state) {
            result.warn(
                format!("final_states[{final_state}]"),
                IssueKind::DegenerateStartFinal,
                format!("'{final_state}' is both a start and a final state"),
            );
        }
    }

    if declared(&model.default_start_state) && !reaches_final(model) {
        let message = if model.final_states.is_empty() {
            "no final states declared".to_string()
        } else {
            format!(
                "no final state is reachable from '{}'",
                model.default_start_state
            )
        };
        result.warn("final_states", IssueKind::UnreachableFinalState, message);
    }

    result
}

/// Validate and fail with [`GenerationError::FsmStructural`] on any error.
/// Returns the warnings otherwise.
pub fn ensure_valid(model: &FsmModel) -> Result<Vec<ValidationIssue>> {
    let result = validate(model);
    if result.is_ok() {
        Ok(result.warnings)
    } else {
        Err(GenerationError::FsmStructural {
            errors: result.errors,
        })
    }
}

/// States reachable from the default start state, in BFS order.
pub fn reachable_states(model: &FsmModel) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([model.default_start_state.as_str()]);
    while let Some(state) = queue.pop_front() {
        if !seen.insert(state) {
            continue;
        }
        order.push(state);
        queue.extend(
            model
                .transitions
                .iter()
                .filter(|t| t.source == state)
                .map(|t| t.target.as_str()),
        );
    }
    order
}

fn reaches_final(model: &FsmModel) -> bool {
    reachable_states(model).into_iter().any(|s| model.is_final(s))
}
