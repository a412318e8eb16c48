use crate::error::{GenerationError, Result};
use crate::validator::{IssueKind, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `(State, EVENT)` keys of `transition_func`.
static TRANSITION_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*\)$")
        .expect("transition key regex should be valid")
});

/// One edge of the transition function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Transition {
    pub source: String,
    pub event: String,
    pub target: String,
}

impl Transition {
    pub fn new(
        source: impl Into<String>,
        event: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Transition {
            source: source.into(),
            event: event.into(),
            target: target.into(),
        }
    }

    /// The `"(State, EVENT)"` key used in FSM documents.
    pub fn key(&self) -> String {
        format!("({}, {})", self.source, self.event)
    }
}

/// FSM document as written on disk. Fields are declared in alphabetical order
/// so that serialization matches the canonical key order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FsmDocument {
    pub alphabet_in: Vec<String>,
    pub default_start_state: String,
    #[serde(default)]
    pub final_states: Vec<String>,
    pub label: String,
    pub start_states: Vec<String>,
    pub states: Vec<String>,
    pub transition_func: Map<String, Value>,
}

/// A finite state machine with explicit orderings.
///
/// Built once per invocation. Duplicate declarations found while building are
/// kept in `load_issues` and reported by [`validate`](crate::fsm::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FsmModel {
    pub label: String,
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    /// Insertion order; at most one target per `(source, event)`.
    pub transitions: Vec<Transition>,
    pub start_states: Vec<String>,
    pub default_start_state: String,
    pub final_states: Vec<String>,
    #[serde(skip)]
    pub(crate) load_issues: ValidationResult,
}

impl FsmModel {
    /// Assemble a model, collapsing repeated declarations.
    ///
    /// Repeated states, events and identical transitions are dropped with a
    /// warning. A second, different target for the same `(source, event)` is
    /// dropped and recorded as an error.
    pub fn new(
        label: impl Into<String>,
        states: Vec<String>,
        alphabet: Vec<String>,
        transitions: Vec<Transition>,
        start_states: Vec<String>,
        default_start_state: impl Into<String>,
        final_states: Vec<String>,
    ) -> Self {
        let mut issues = ValidationResult::default();
        let states = dedup_declared(states, "states", &mut issues);
        let alphabet = dedup_declared(alphabet, "alphabet_in", &mut issues);
        let start_states = dedup_declared(start_states, "start_states", &mut issues);
        let final_states = dedup_declared(final_states, "final_states", &mut issues);

        let mut kept: Vec<Transition> = Vec::with_capacity(transitions.len());
        for transition in transitions {
            let location = format!("transition_func[{}]", transition.key());
            match kept
                .iter()
                .find(|t| t.source == transition.source && t.event == transition.event)
            {
                None => kept.push(transition),
                Some(existing) if existing.target == transition.target => issues.warn(
                    location,
                    IssueKind::DuplicateDeclaration,
                    "transition declared twice",
                ),
                Some(existing) => issues.error(
                    location,
                    IssueKind::DuplicateTransition,
                    format!(
                        "maps to both '{}' and '{}'",
                        existing.target, transition.target
                    ),
                ),
            }
        }

        FsmModel {
            label: label.into(),
            states,
            alphabet,
            transitions: kept,
            start_states,
            default_start_state: default_start_state.into(),
            final_states,
            load_issues: issues,
        }
    }

    /// Build from an already parsed FSM document.
    pub fn from_document(document: &Value) -> Result<Self> {
        let doc: FsmDocument = serde_json::from_value(document.clone())
            .map_err(|e| GenerationError::spec("fsm", e.to_string()))?;
        let mut transitions = Vec::with_capacity(doc.transition_func.len());
        for (key, target) in &doc.transition_func {
            let location = format!("transition_func[{key}]");
            let captures = TRANSITION_KEY.captures(key).ok_or_else(|| {
                GenerationError::spec(&location, "transition key must look like '(State, EVENT)'")
            })?;
            let target = target
                .as_str()
                .ok_or_else(|| {
                    GenerationError::spec(&location, "transition target must be a state name")
                })?;
            transitions.push(Transition::new(&captures[1], &captures[2], target));
        }
        Ok(FsmModel::new(
            doc.label,
            doc.states,
            doc.alphabet_in,
            transitions,
            doc.start_states,
            doc.default_start_state,
            doc.final_states,
        ))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: Value =
            serde_yaml::from_str(text).map_err(|e| GenerationError::spec("fsm", e.to_string()))?;
        Self::from_document(&document)
    }

    pub fn to_document(&self) -> FsmDocument {
        FsmDocument {
            alphabet_in: self.alphabet.clone(),
            default_start_state: self.default_start_state.clone(),
            final_states: self.final_states.clone(),
            label: self.label.clone(),
            start_states: self.start_states.clone(),
            states: self.states.clone(),
            transition_func: self
                .transitions
                .iter()
                .map(|t| (t.key(), Value::String(t.target.clone())))
                .collect(),
        }
    }

    /// Canonical YAML form, readable by [`FsmModel::from_yaml_str`].
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_document())
    }

    /// Target of `(state, event)`, if any.
    pub fn next_state(&self, state: &str, event: &str) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.source == state && t.event == event)
            .map(|t| t.target.as_str())
    }

    pub fn is_start(&self, state: &str) -> bool {
        self.start_states.iter().any(|s| s == state)
    }

    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.iter().any(|s| s == state)
    }
}

fn dedup_declared(items: Vec<String>, field: &str, issues: &mut ValidationResult) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if unique.contains(&item) {
            issues.warn(
                format!("{field}[{item}]"),
                IssueKind::DuplicateDeclaration,
                "declared more than once",
            );
        } else {
            unique.push(item);
        }
    }
    unique
}
