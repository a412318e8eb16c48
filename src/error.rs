use crate::validator::ValidationIssue;
use thiserror::Error;

/// Fatal failures of a generation run.
///
/// Any of these aborts the invocation before a single artifact is rendered
/// or written.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Malformed or incomplete input document.
    #[error("spec validation failed at {location}: {message}")]
    SpecValidation { location: String, message: String },

    /// Conflicting schema definitions or operation identifiers.
    #[error("duplicate definition of '{name}': {message}")]
    DuplicateSchema { name: String, message: String },

    /// The FSM violates one of its structural invariants.
    #[error("FSM is structurally invalid: {}", join_issues(.errors))]
    FsmStructural { errors: Vec<ValidationIssue> },

    /// Failure reported by the template renderer, passed through as-is.
    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl GenerationError {
    pub fn spec(location: impl Into<String>, message: impl Into<String>) -> Self {
        GenerationError::SpecValidation {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(name: impl Into<String>, message: impl Into<String>) -> Self {
        GenerationError::DuplicateSchema {
            name: name.into(),
            message: message.into(),
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, GenerationError>;
