use crate::openapi::{ApiModel, OperationBinding, SchemaModel};
use crate::validator::{IssueKind, ValidationIssue};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

/// Persistence decision for every schema of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub persistent: BTreeMap<String, bool>,
    pub warnings: Vec<ValidationIssue>,
}

impl Classification {
    pub fn is_persistent(&self, schema: &str) -> bool {
        self.persistent.get(schema).copied().unwrap_or(false)
    }

    /// Persistent schema names in ascending order.
    pub fn persistent_names(&self) -> impl Iterator<Item = &str> {
        self.persistent
            .iter()
            .filter(|(_, persistent)| **persistent)
            .map(|(name, _)| name.as_str())
    }
}

/// Decide persistent vs transient for each schema. First match wins:
///
/// 1. an explicit `x-persistent` marker;
/// 2. the schema is the response of one operation and the request or response
///    of another one;
/// 3. transient.
///
/// Schemas no operation reaches, directly or through nested properties, are
/// reported as [`IssueKind::DeadSchema`].
pub fn classify(schemas: &[SchemaModel], operations: &[OperationBinding]) -> Classification {
    let mut result = Classification::default();
    for schema in schemas {
        let persistent = match schema.explicit_persistence {
            Some(flag) => flag,
            None => used_across_operations(&schema.name, operations),
        };
        debug!(schema = %schema.name, persistent, "classified schema");
        result.persistent.insert(schema.name.clone(), persistent);
    }

    let reachable = reachable_schemas(schemas, operations);
    for schema in schemas {
        if !reachable.contains(schema.name.as_str()) {
            result.warnings.push(ValidationIssue::new(
                format!("schema:{}", schema.name),
                IssueKind::DeadSchema,
                "schema is never referenced by an operation",
            ));
        }
    }
    result
}

/// Classify and record the outcome on the model's schemas.
pub fn apply_classification(model: &mut ApiModel) -> Classification {
    let classification = classify(&model.schemas, &model.operations);
    for schema in &mut model.schemas {
        schema.is_persistent = classification.is_persistent(&schema.name);
    }
    classification
}

fn used_across_operations(name: &str, operations: &[OperationBinding]) -> bool {
    operations.iter().enumerate().any(|(i, a)| {
        a.response_schema_ref.as_deref() == Some(name)
            && operations
                .iter()
                .enumerate()
                .any(|(j, b)| i != j && b.references(name))
    })
}

fn reachable_schemas<'a>(
    schemas: &'a [SchemaModel],
    operations: &'a [OperationBinding],
) -> BTreeSet<&'a str> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut queue: VecDeque<&str> = operations
        .iter()
        .flat_map(|op| [op.request_schema_ref.as_deref(), op.response_schema_ref.as_deref()])
        .flatten()
        .collect();
    while let Some(name) = queue.pop_front() {
        if !seen.insert(name) {
            continue;
        }
        if let Some(schema) = schemas.iter().find(|s| s.name == name) {
            queue.extend(schema.nested_references());
        }
    }
    seen
}
