use super::model::{FsmModel, Transition};
use crate::error::{GenerationError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// `A -->|EVENT| B`
static FLOWCHART_EDGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s*-->\s*\|\s*([^|\s]+)\s*\|\s*(\S+)$")
        .expect("flowchart edge regex should be valid")
});

/// `A --> B: EVENT`, where either side may be `[*]`.
static STATE_EDGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s*-->\s*([^\s:]+)\s*(?::\s*(\S+))?$")
        .expect("state edge regex should be valid")
});

const PSEUDO_STATE: &str = "[*]";

/// Comment directive naming the default start state.
pub(crate) const START_DIRECTIVE: &str = "%% start:";

impl FsmModel {
    /// Parse a Mermaid diagram back into a model.
    ///
    /// Accepts the flowchart form produced by
    /// [`to_diagram`](crate::fsm::to_diagram) and `stateDiagram-v2` edges.
    /// `[*] --> X` marks a start state and `X --> [*]` a final state. Without
    /// any `[*]` start edge the first state is the only start state. A
    /// `%% start: X` directive overrides the default start.
    pub fn from_mermaid(text: &str, label: &str) -> Result<FsmModel> {
        let mut states: Vec<String> = Vec::new();
        let mut alphabet: Vec<String> = Vec::new();
        let mut transitions = Vec::new();
        let mut starts: Vec<String> = Vec::new();
        let mut finals: Vec<String> = Vec::new();
        let mut declared_start: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if let Some(state) = line.strip_prefix(START_DIRECTIVE).map(str::trim) {
                if !state.is_empty() {
                    declared_start = Some(state.to_string());
                }
                continue;
            }
            if line.is_empty()
                || line.starts_with("%%")
                || ["graph", "flowchart", "stateDiagram", "direction"]
                    .iter()
                    .any(|h| line.starts_with(h))
            {
                continue;
            }
            let location = format!("line {}", index + 1);

            if let Some(c) = FLOWCHART_EDGE.captures(line) {
                let (source, event, target) = (&c[1], &c[2], &c[3]);
                push_unique(&mut states, source);
                push_unique(&mut states, target);
                push_unique(&mut alphabet, event);
                transitions.push(Transition::new(source, event, target));
            } else if let Some(c) = STATE_EDGE.captures(line) {
                let (source, target) = (&c[1], &c[2]);
                match (source == PSEUDO_STATE, target == PSEUDO_STATE) {
                    (true, true) => {
                        return Err(GenerationError::spec(
                            location,
                            "edge between two pseudo states",
                        ));
                    }
                    (true, false) => {
                        push_unique(&mut states, target);
                        push_unique(&mut starts, target);
                    }
                    (false, true) => {
                        push_unique(&mut states, source);
                        push_unique(&mut finals, source);
                    }
                    (false, false) => {
                        let event = c.get(3).map(|m| m.as_str()).ok_or_else(|| {
                            GenerationError::spec(&location, format!("edge '{line}' has no event"))
                        })?;
                        push_unique(&mut states, source);
                        push_unique(&mut states, target);
                        push_unique(&mut alphabet, event);
                        transitions.push(Transition::new(source, event, target));
                    }
                }
            } else if !line.contains(char::is_whitespace) {
                push_unique(&mut states, line);
            } else {
                return Err(GenerationError::spec(
                    location,
                    format!("unrecognised diagram line '{line}'"),
                ));
            }
        }

        let default_start = match declared_start {
            Some(state) => {
                if !starts.contains(&state) {
                    starts.insert(0, state.clone());
                }
                state
            }
            None => {
                if starts.is_empty() {
                    starts.extend(states.first().cloned());
                }
                starts.first().cloned().unwrap_or_default()
            }
        };
        Ok(FsmModel::new(
            label,
            states,
            alphabet,
            transitions,
            starts,
            default_start,
            finals,
        ))
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|s| s == name) {
        list.push(name.to_string());
    }
}
