use super::model::{FsmModel, Transition};
use super::mermaid::START_DIRECTIVE;
use crate::naming::camel_to_snake;
use serde::Serialize;

/// Where a state sits in the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateRole {
    Start,
    Final,
    StartAndFinal,
    Neither,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateBinding {
    pub name: String,
    /// Round class generated for the state.
    pub class_name: String,
    pub module_name: String,
    pub is_start: bool,
    pub is_final: bool,
    pub role: StateRole,
}

/// Everything the round templates need about one FSM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FsmBindings {
    pub label: String,
    pub label_snake: String,
    pub default_start_state: String,
    pub states: Vec<StateBinding>,
    /// First use across transitions, then unused declared events.
    pub alphabet: Vec<String>,
    pub transitions: Vec<Transition>,
    pub start_states: Vec<String>,
    pub final_states: Vec<String>,
}

/// Mermaid flowchart of the model:
///
/// ```text
/// graph TD
///   FirstRound
///   SecondRound
///   FirstRound -->|DONE| SecondRound
/// ```
///
/// A default start state other than the first state is recorded as a
/// `%% start: <State>` directive right after the header.
pub fn to_diagram(model: &FsmModel) -> String {
    let directive = (model.states.first() != Some(&model.default_start_state)
        && !model.default_start_state.is_empty())
    .then(|| format!("  {START_DIRECTIVE} {}\n", model.default_start_state));
    let states = model.states.iter().map(|state| format!("  {state}\n"));
    let edges = model
        .transitions
        .iter()
        .map(|t| format!("  {} -->|{}| {}\n", t.source, t.event, t.target));
    std::iter::once("graph TD\n".to_string())
        .chain(directive)
        .chain(states)
        .chain(edges)
        .collect()
}

pub fn to_generation_bindings(model: &FsmModel) -> FsmBindings {
    let states = model
        .states
        .iter()
        .map(|name| {
            let is_start = model.is_start(name);
            let is_final = model.is_final(name);
            let role = match (is_start, is_final) {
                (true, true) => StateRole::StartAndFinal,
                (true, false) => StateRole::Start,
                (false, true) => StateRole::Final,
                (false, false) => StateRole::Neither,
            };
            StateBinding {
                name: name.clone(),
                class_name: name.clone(),
                module_name: camel_to_snake(name),
                is_start,
                is_final,
                role,
            }
        })
        .collect();

    let mut alphabet: Vec<String> = Vec::with_capacity(model.alphabet.len());
    let used = model.transitions.iter().map(|t| &t.event);
    for event in used.chain(model.alphabet.iter()) {
        if !alphabet.contains(event) {
            alphabet.push(event.clone());
        }
    }

    FsmBindings {
        label: model.label.clone(),
        label_snake: camel_to_snake(&model.label),
        default_start_state: model.default_start_state.clone(),
        states,
        alphabet,
        transitions: model.transitions.clone(),
        start_states: model.start_states.clone(),
        final_states: model.final_states.clone(),
    }
}
