use crate::dao::{CrudCapability, DaoSpec};
use crate::error::{GenerationError, Result};
use crate::naming::{operation_name, sanitize_identifier, to_camel_case};
use crate::openapi::{
    method_rank, ApiModel, ErrorResponse, OperationBinding, OperationKind, PathParameter,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// How a dispatch entry produces its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolver {
    /// Delegate to a generated DAO.
    Dao {
        schema: String,
        dao_module: String,
        dao_class: String,
        capability: CrudCapability,
    },
    /// Stub raising `NotImplementedError`.
    NotImplemented,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchEntry {
    pub operation_id: String,
    /// `handle_get_users_by_id`
    pub method_name: String,
    pub http_method: String,
    pub path_pattern: String,
    /// Anchored Python regex with one named group per path parameter.
    pub path_regex: String,
    pub request_schema: Option<String>,
    pub response_schema: Option<String>,
    pub response_is_array: bool,
    pub path_params: Vec<PathParameter>,
    pub kind: OperationKind,
    pub success_status: u16,
    pub status_text: String,
    pub error_responses: Vec<ErrorResponse>,
    pub resolver: Resolver,
}

/// Response used when no entry applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackEntry {
    pub status: u16,
    pub status_text: String,
    pub message: String,
}

/// DAO imported by a handler module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaoReference {
    pub schema: String,
    pub module_name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerSpec {
    pub tag: String,
    /// `<snake_tag>_handler`
    pub module_name: String,
    /// `<CamelTag>Handler`
    pub class_name: String,
    /// Ordered by path, then method.
    pub entries: Vec<DispatchEntry>,
    /// Schemas named by the entries, first-seen order.
    pub schemas: Vec<String>,
    pub daos: Vec<DaoReference>,
    /// Distinct documented errors across the entries, by status.
    pub exceptions: Vec<ErrorResponse>,
    /// Always 404 then 500.
    pub fallbacks: Vec<FallbackEntry>,
}

/// The fixed tail of every handler: unmatched route, then handler failure.
pub fn fallback_entries() -> Vec<FallbackEntry> {
    vec![
        FallbackEntry {
            status: 404,
            status_text: "Not Found".to_string(),
            message: "No handler matches the request path and method".to_string(),
        },
        FallbackEntry {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            message: "The handler raised an exception".to_string(),
        },
    ]
}

/// Group the model's operations by tag and describe how each one dispatches.
///
/// With `use_daos`, an operation whose id gave a DAO one of its capabilities
/// resolves to that DAO; every other operation is a stub.
pub fn build_handler_specs(
    model: &ApiModel,
    daos: &[DaoSpec],
    use_daos: bool,
) -> Result<Vec<HandlerSpec>> {
    let mut groups: BTreeMap<&str, Vec<&OperationBinding>> = BTreeMap::new();
    for op in &model.operations {
        for schema in [&op.request_schema_ref, &op.response_schema_ref].into_iter().flatten() {
            if model.schema(schema).is_none() {
                return Err(GenerationError::spec(
                    op.location(),
                    format!("operation references unknown schema '{schema}'"),
                ));
            }
        }
        groups.entry(op.tag.as_str()).or_default().push(op);
    }

    let mut modules: BTreeMap<String, &str> = BTreeMap::new();
    let mut specs = Vec::with_capacity(groups.len());
    for (tag, mut ops) in groups {
        let snake = sanitize_identifier(tag);
        if let Some(other) = modules.insert(snake.clone(), tag) {
            return Err(GenerationError::duplicate(
                tag,
                format!("tags '{other}' and '{tag}' both map to module '{snake}_handler'"),
            ));
        }
        ops.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| method_rank(&a.http_method).cmp(&method_rank(&b.http_method)))
        });

        let entries: Vec<DispatchEntry> = ops
            .iter()
            .map(|op| dispatch_entry(op, daos, use_daos))
            .collect();
        let mut methods: BTreeMap<&str, &str> = BTreeMap::new();
        for entry in &entries {
            if let Some(other) = methods.insert(&entry.method_name, &entry.operation_id) {
                return Err(GenerationError::duplicate(
                    &entry.method_name,
                    format!(
                        "operations '{other}' and '{}' both map to method '{}' in handler '{tag}'",
                        entry.operation_id, entry.method_name
                    ),
                ));
            }
        }

        let mut schemas: Vec<String> = Vec::new();
        for entry in &entries {
            for schema in [&entry.request_schema, &entry.response_schema].into_iter().flatten() {
                if !schemas.contains(schema) {
                    schemas.push(schema.clone());
                }
            }
        }
        let mut dao_refs: Vec<DaoReference> = Vec::new();
        for entry in &entries {
            if let Resolver::Dao { schema, dao_module, dao_class, .. } = &entry.resolver {
                if !dao_refs.iter().any(|d| &d.schema == schema) {
                    dao_refs.push(DaoReference {
                        schema: schema.clone(),
                        module_name: dao_module.clone(),
                        class_name: dao_class.clone(),
                    });
                }
            }
        }

        let mut exceptions: Vec<ErrorResponse> = entries
            .iter()
            .flat_map(|e| e.error_responses.iter().cloned())
            .collect();
        exceptions.sort_by_key(|e| e.status);
        exceptions.dedup_by_key(|e| e.status);

        debug!(tag, entries = entries.len(), daos = dao_refs.len(), "built handler spec");
        specs.push(HandlerSpec {
            tag: tag.to_string(),
            module_name: format!("{snake}_handler"),
            class_name: format!("{}Handler", to_camel_case(&snake)),
            entries,
            schemas,
            daos: dao_refs,
            exceptions,
            fallbacks: fallback_entries(),
        });
    }
    Ok(specs)
}

fn dispatch_entry(op: &OperationBinding, daos: &[DaoSpec], use_daos: bool) -> DispatchEntry {
    let resolver = if use_daos {
        resolve_dao(op, daos)
    } else {
        Resolver::NotImplemented
    };
    DispatchEntry {
        operation_id: op.operation_id.clone(),
        method_name: format!("handle_{}", operation_name(op.http_method.as_str(), &op.path)),
        http_method: op.http_method.as_str().to_string(),
        path_pattern: op.path.clone(),
        path_regex: path_regex(&op.path),
        request_schema: op.request_schema_ref.clone(),
        response_schema: op.response_schema_ref.clone(),
        response_is_array: op.response_is_array,
        path_params: op.path_parameters.clone(),
        kind: op.kind,
        success_status: op.success_status,
        status_text: op.status_text.clone(),
        error_responses: op.error_responses.clone(),
        resolver,
    }
}

/// `/users/{userId}` becomes `^/users/(?P<user_id>[^/]+)$`.
pub fn path_regex(path: &str) -> String {
    let mut pattern = String::with_capacity(path.len() + 16);
    pattern.push('^');
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        pattern.push('/');
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(param) => {
                pattern.push_str("(?P<");
                pattern.push_str(&sanitize_identifier(param));
                pattern.push_str(">[^/]+)");
            }
            None => pattern.push_str(&regex::escape(segment)),
        }
    }
    if pattern.len() == 1 {
        pattern.push('/');
    }
    pattern.push('$');
    pattern
}

/// The DAO of the operation's own schema wins over other DAOs that claimed
/// the operation.
fn resolve_dao(op: &OperationBinding, daos: &[DaoSpec]) -> Resolver {
    let claims = daos
        .iter()
        .filter_map(|dao| dao.capability_for(&op.operation_id).map(|cap| (dao, cap)));
    let mut fallback = None;
    for (dao, capability) in claims {
        if op.references(&dao.schema) {
            return dao_resolver(dao, capability);
        }
        if fallback.is_none() {
            fallback = Some((dao, capability));
        }
    }
    match fallback {
        Some((dao, capability)) => dao_resolver(dao, capability),
        None => Resolver::NotImplemented,
    }
}

fn dao_resolver(dao: &DaoSpec, capability: CrudCapability) -> Resolver {
    Resolver::Dao {
        schema: dao.schema.clone(),
        dao_module: dao.module_name.clone(),
        dao_class: dao.class_name.clone(),
        capability,
    }
}
