//! Diagnostics collected while building generation models.
//!
//! Every check in the engine reports a [`ValidationIssue`]. Fatal issues end up
//! inside a [`GenerationError`](crate::error::GenerationError); non-fatal ones
//! travel next to the successful result so the caller can surface them.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// What a [`ValidationIssue`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A schema is declared but never referenced by any operation.
    DeadSchema,
    /// A POST operation whose CRUD intent could not be inferred.
    UnclassifiedOperation,
    /// `states` is empty.
    EmptyStates,
    /// `start_states` is empty.
    EmptyStartStates,
    /// A state referenced somewhere that is not declared in `states`.
    DanglingState,
    /// An event referenced in the transition function but not in the alphabet.
    DanglingEvent,
    /// A final state that is not declared in `states`.
    DanglingFinalState,
    /// `default_start_state` is not one of `start_states`.
    InvalidStartState,
    /// The same `(state, event)` pair is mapped more than once.
    DuplicateTransition,
    /// A state or event declared more than once; later copies are ignored.
    DuplicateDeclaration,
    /// No final state is reachable from the default start state.
    UnreachableFinalState,
    /// A final state that is also a start state.
    DegenerateStartFinal,
}

impl IssueKind {
    /// Stable snake_case identifier, used in logs and rendered reports.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::DeadSchema => "dead_schema",
            IssueKind::UnclassifiedOperation => "unclassified_operation",
            IssueKind::EmptyStates => "empty_states",
            IssueKind::EmptyStartStates => "empty_start_states",
            IssueKind::DanglingState => "dangling_state",
            IssueKind::DanglingEvent => "dangling_event",
            IssueKind::DanglingFinalState => "dangling_final_state",
            IssueKind::InvalidStartState => "invalid_start_state",
            IssueKind::DuplicateTransition => "duplicate_transition",
            IssueKind::DuplicateDeclaration => "duplicate_declaration",
            IssueKind::UnreachableFinalState => "unreachable_final_state",
            IssueKind::DegenerateStartFinal => "degenerate_start_final",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding, located by a human-readable path such as
/// `transition_func[(FirstRound, DONE)]` or `schema:User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        ValidationIssue {
            location: location.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Outcome of a structural check: fatal errors and non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(
        &mut self,
        location: impl Into<String>,
        kind: IssueKind,
        message: impl Into<String>,
    ) {
        self.errors.push(ValidationIssue::new(location, kind, message));
    }

    pub fn warn(
        &mut self,
        location: impl Into<String>,
        kind: IssueKind,
        message: impl Into<String>,
    ) {
        self.warnings.push(ValidationIssue::new(location, kind, message));
    }

    /// Append everything from `other`, keeping order.
    pub fn extend(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Emit each issue as a `warn!` event.
pub fn log_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        warn!(
            kind = issue.kind.as_str(),
            location = %issue.location,
            "{}",
            issue.message
        );
    }
}
