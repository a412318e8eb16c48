use super::model::{FsmModel, Transition};
use crate::error::{GenerationError, Result};
use tracing::debug;

/// Event linking one chained machine to the next.
pub const CHAIN_EVENT: &str = "DONE";

/// Compose machines end to end.
///
/// States, events and transitions are unioned in first-seen order. Every
/// final state of machine `i` gets a [`CHAIN_EVENT`] transition to the default
/// start state of machine `i + 1`. The result starts where the first machine
/// starts and ends where the last one ends.
pub fn chain(models: &[FsmModel], label: &str) -> Result<FsmModel> {
    let (first, last) = match (models.first(), models.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(GenerationError::spec("chain", "at least one FSM is required")),
    };

    let mut states: Vec<String> = Vec::new();
    let mut alphabet: Vec<String> = Vec::new();
    let mut transitions: Vec<Transition> = Vec::new();
    for (i, model) in models.iter().enumerate() {
        extend_unique(&mut states, &model.states);
        extend_unique(&mut alphabet, &model.alphabet);
        transitions.extend(model.transitions.iter().cloned());

        if let Some(next) = models.get(i + 1) {
            if !model.final_states.is_empty() {
                extend_unique(&mut alphabet, &[CHAIN_EVENT.to_string()]);
            }
            for final_state in &model.final_states {
                transitions.push(Transition::new(
                    final_state.as_str(),
                    CHAIN_EVENT,
                    next.default_start_state.as_str(),
                ));
            }
        }
    }
    debug!(
        machines = models.len(),
        states = states.len(),
        transitions = transitions.len(),
        "chained FSMs"
    );

    // Duplicates across machines end up in the new model's load issues.
    Ok(FsmModel::new(
        label,
        states,
        alphabet,
        transitions,
        first.start_states.clone(),
        first.default_start_state.clone(),
        last.final_states.clone(),
    ))
}

fn extend_unique(into: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !into.contains(item) {
            into.push(item.clone());
        }
    }
}
