use super::types::{
    ApiModel, ErrorResponse, FieldModel, FieldType, OperationBinding, OperationKind, PathParameter,
    SchemaModel, SchemaRef, METHODS,
};
use crate::dummy_value::{declared_type, dummy_value};
use crate::error::{GenerationError, Result};
use crate::naming::{camel_to_snake, operation_name, path_template_params, sanitize_identifier};
use crate::validator::{IssueKind, ValidationIssue};
use http::{Method, StatusCode};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Documented error statuses and the exception each one maps to.
const ERROR_STATUSES: [(&str, &str); 5] = [
    ("400", "BadRequestError"),
    ("401", "UnauthorizedError"),
    ("403", "ForbiddenError"),
    ("404", "NotFoundError"),
    ("422", "ValidationError"),
];

const CREATE_WORDS: [&str; 4] = ["create", "new", "add", "post"];
const READ_WORDS: [&str; 5] = ["read", "get", "fetch", "retrieve", "list"];
const UPDATE_WORDS: [&str; 5] = ["update", "modify", "change", "edit", "patch"];
const DELETE_WORDS: [&str; 3] = ["delete", "remove", "del"];

/// Normalize an OpenAPI document into schemas and operation bindings.
///
/// Every request/response reference is resolved here; anything that does not
/// point at `components.schemas` fails with
/// [`GenerationError::SpecValidation`].
pub fn extract_model(document: &Value) -> Result<ApiModel> {
    let root = document
        .as_object()
        .ok_or_else(|| GenerationError::spec("document", "expected a mapping at the top level"))?;
    let paths = root
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| GenerationError::spec("paths", "missing required field 'paths'"))?;
    let components = root
        .get("components")
        .and_then(Value::as_object)
        .ok_or_else(|| GenerationError::spec("components", "missing required field 'components'"))?;
    let table = components
        .get("schemas")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            GenerationError::spec(
                "components.schemas",
                "missing required field 'components.schemas'",
            )
        })?;

    let schemas = extract_schemas(table)?;
    let mut extractor = OperationExtractor {
        components,
        table,
        warnings: Vec::new(),
    };
    let operations = extractor.extract(paths)?;
    debug!(
        schemas = schemas.len(),
        operations = operations.len(),
        "extracted API model"
    );
    Ok(ApiModel {
        schemas,
        operations,
        schema_table: table.clone(),
        warnings: extractor.warnings,
    })
}

fn extract_schemas(table: &Map<String, Value>) -> Result<Vec<SchemaModel>> {
    let mut modules: HashMap<String, &str> = HashMap::new();
    let mut schemas = Vec::with_capacity(table.len());
    for (name, raw) in table {
        let module = sanitize_identifier(name);
        if let Some(other) = modules.insert(module.clone(), name.as_str()) {
            return Err(GenerationError::duplicate(
                name.clone(),
                format!("'{other}' and '{name}' both map to module '{module}'"),
            ));
        }
        schemas.push(schema_model(name, raw, table)?);
    }
    Ok(schemas)
}

fn schema_model(name: &str, raw: &Value, table: &Map<String, Value>) -> Result<SchemaModel> {
    let location = format!("components.schemas.{name}");
    let obj = raw
        .as_object()
        .ok_or_else(|| GenerationError::spec(&location, "schema must be a mapping"))?;
    let explicit_persistence = match obj.get("x-persistent") {
        None => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(_) => return Err(GenerationError::spec(&location, "x-persistent must be a boolean")),
    };

    // A schema that is only an alias of another one takes the target's shape.
    let target = match obj.get("$ref").and_then(Value::as_str) {
        Some(raw_ref) => {
            let resolved = resolved_name(raw_ref, table, &location)?;
            table
                .get(&resolved)
                .and_then(Value::as_object)
                .ok_or_else(|| GenerationError::spec(&location, "alias target must be a mapping"))?
        }
        None => obj,
    };

    let mut fields = Vec::new();
    collect_fields(target, table, &location, &mut fields, 0)?;

    let is_array = declared_type(target) == "array";
    let (item_type, item_example) = match target.get("items") {
        Some(items) if is_array => (
            Some(field_type(items, table, &format!("{location}.items"))?),
            Some(dummy_value(items, table)),
        ),
        _ => (None, None),
    };
    let max_items = target
        .get("maxItems")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok());

    Ok(SchemaModel {
        name: name.to_string(),
        fields,
        explicit_persistence,
        is_persistent: false,
        is_array,
        item_type,
        max_items,
        example_value: dummy_value(raw, table),
        item_example,
    })
}

/// Properties of `obj` in declaration order, including those contributed by
/// `allOf` parts.
fn collect_fields(
    obj: &Map<String, Value>,
    table: &Map<String, Value>,
    location: &str,
    fields: &mut Vec<FieldModel>,
    depth: usize,
) -> Result<()> {
    if depth > 8 {
        return Ok(());
    }
    let required: Vec<&str> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if let Some(properties) = obj.get("properties").and_then(Value::as_object) {
        for (prop, schema) in properties {
            if fields.iter().any(|f| &f.name == prop) {
                continue;
            }
            let ty = field_type(schema, table, &format!("{location}.properties.{prop}"))?;
            fields.push(FieldModel {
                name: prop.clone(),
                snake_name: sanitize_identifier(prop),
                python_type: ty.python_type(),
                ty,
                required: required.contains(&prop.as_str()),
            });
        }
    }

    if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
        for part in parts {
            let part_obj = match part.get("$ref").and_then(Value::as_str) {
                Some(raw_ref) => {
                    let resolved = resolved_name(raw_ref, table, location)?;
                    table.get(&resolved).and_then(Value::as_object)
                }
                None => part.as_object(),
            };
            if let Some(part_obj) = part_obj {
                collect_fields(part_obj, table, location, fields, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn field_type(schema: &Value, table: &Map<String, Value>, location: &str) -> Result<FieldType> {
    let Some(obj) = schema.as_object() else {
        return Ok(FieldType::Unknown);
    };
    if let Some(raw_ref) = obj.get("$ref").and_then(Value::as_str) {
        return resolved_name(raw_ref, table, location).map(FieldType::Ref);
    }
    for combinator in ["allOf", "oneOf", "anyOf"] {
        if let Some(first) = obj.get(combinator).and_then(Value::as_array).and_then(|v| v.first()) {
            return field_type(first, table, location);
        }
    }
    Ok(match declared_type(obj) {
        "string" => FieldType::String,
        "integer" => FieldType::Integer,
        "number" => FieldType::Number,
        "boolean" => FieldType::Boolean,
        "object" => FieldType::Object,
        "array" => {
            let inner = match obj.get("items") {
                Some(items) => field_type(items, table, &format!("{location}.items"))?,
                None => FieldType::Unknown,
            };
            FieldType::Array(Box::new(inner))
        }
        _ => FieldType::Unknown,
    })
}

fn resolved_name(raw_ref: &str, table: &Map<String, Value>, location: &str) -> Result<String> {
    match SchemaRef::resolve(raw_ref, table) {
        SchemaRef::Resolved(name) => Ok(name),
        SchemaRef::Unresolved(raw) => Err(GenerationError::spec(
            location,
            format!("unresolved schema reference '{raw}'"),
        )),
    }
}

struct OperationExtractor<'a> {
    components: &'a Map<String, Value>,
    table: &'a Map<String, Value>,
    warnings: Vec<ValidationIssue>,
}

impl<'a> OperationExtractor<'a> {
    fn extract(&mut self, paths: &'a Map<String, Value>) -> Result<Vec<OperationBinding>> {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut operations = Vec::new();
        for (path, item) in paths {
            let item = item.as_object().ok_or_else(|| {
                GenerationError::spec(format!("paths.{path}"), "path item must be a mapping")
            })?;
            for method in METHODS {
                let Some(op) = item.get(method) else {
                    continue;
                };
                let location = format!("{path} {}", method.to_ascii_uppercase());
                let op = op
                    .as_object()
                    .ok_or_else(|| {
                        GenerationError::spec(&location, "operation must be a mapping")
                    })?;
                let binding = self.binding(path, method, item, op, &location)?;
                if let Some(previous) =
                    seen.insert(binding.operation_id.clone(), location.clone())
                {
                    return Err(GenerationError::duplicate(
                        binding.operation_id,
                        format!("operationId used by both {previous} and {location}"),
                    ));
                }
                operations.push(binding);
            }
        }
        Ok(operations)
    }

    fn binding(
        &mut self,
        path: &str,
        method: &str,
        item: &'a Map<String, Value>,
        op: &'a Map<String, Value>,
        location: &str,
    ) -> Result<OperationBinding> {
        let http_method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|e| GenerationError::spec(location, e.to_string()))?;
        let operation_id = op
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| operation_name(method, path));

        let request_schema_ref = match op.get("requestBody") {
            Some(body) => {
                self.body_schema(body, "requestBodies", &format!("{location} requestBody"))?
                    .0
            }
            None => None,
        };

        let empty = Map::new();
        let responses = op.get("responses").and_then(Value::as_object).unwrap_or(&empty);
        let (response_schema_ref, response_is_array) = match success_response(responses) {
            Some(response) => {
                self.body_schema(response, "responses", &format!("{location} response"))?
            }
            None => (None, false),
        };
        let success_status = [200u16, 201, 204]
            .into_iter()
            .find(|code| responses.contains_key(&code.to_string()))
            .unwrap_or(200);

        let path_parameters = self.path_parameters(path, item, op, location)?;
        let tag = op
            .get("tags")
            .and_then(Value::as_array)
            .and_then(|tags| tags.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                path.split('/')
                    .find(|s| !s.is_empty() && !s.starts_with('{'))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "default".to_string());

        let kind = classify_operation(
            &http_method,
            op,
            &operation_id,
            !path_parameters.is_empty(),
            success_status,
        );
        if kind == OperationKind::Other && http_method == Method::POST {
            self.warnings.push(ValidationIssue::new(
                location,
                IssueKind::UnclassifiedOperation,
                format!("could not infer the CRUD intent of '{operation_id}'"),
            ));
        }

        Ok(OperationBinding {
            operation_id,
            path: path.to_string(),
            http_method,
            tag,
            request_schema_ref,
            response_schema_ref,
            response_is_array,
            path_parameters,
            kind,
            success_status,
            status_text: reason(success_status).to_string(),
            error_responses: error_responses(responses),
        })
    }

    /// Schema named by a request body or response: `(schema, is_array)`.
    fn body_schema(
        &self,
        body: &'a Value,
        section: &str,
        location: &str,
    ) -> Result<(Option<String>, bool)> {
        let body = self.deref_component(body, section, location)?;
        let Some(content) = body.get("content").and_then(Value::as_object) else {
            return Ok((None, false));
        };
        let media = content
            .get("application/json")
            .or_else(|| content.values().next());
        match media.and_then(|m| m.get("schema")) {
            Some(schema) => self.schema_ref_of(schema, location),
            None => Ok((None, false)),
        }
    }

    fn schema_ref_of(&self, schema: &Value, location: &str) -> Result<(Option<String>, bool)> {
        let Some(obj) = schema.as_object() else {
            return Ok((None, false));
        };
        if let Some(raw_ref) = obj.get("$ref").and_then(Value::as_str) {
            return Ok((Some(resolved_name(raw_ref, self.table, location)?), false));
        }
        if declared_type(obj) == "array" {
            if let Some(items) = obj.get("items") {
                let (inner, _) = self.schema_ref_of(items, location)?;
                let is_array = inner.is_some();
                return Ok((inner, is_array));
            }
        }
        for combinator in ["allOf", "oneOf", "anyOf"] {
            let Some(parts) = obj.get(combinator).and_then(Value::as_array) else {
                continue;
            };
            if let Some(raw_ref) = parts
                .iter()
                .find_map(|p| p.get("$ref").and_then(Value::as_str))
            {
                return Ok((Some(resolved_name(raw_ref, self.table, location)?), false));
            }
        }
        Ok((None, false))
    }

    /// Follow one `$ref` into `components.<section>`.
    fn deref_component(
        &self,
        value: &'a Value,
        section: &str,
        location: &str,
    ) -> Result<&'a Value> {
        let Some(raw_ref) = value.get("$ref").and_then(Value::as_str) else {
            return Ok(value);
        };
        let prefix = format!("#/components/{section}/");
        raw_ref
            .strip_prefix(prefix.as_str())
            .and_then(|name| self.components.get(section).and_then(|s| s.get(name)))
            .ok_or_else(|| {
                GenerationError::spec(location, format!("unresolved reference '{raw_ref}'"))
            })
    }

    /// Template parameters in order, then declared `in: path` parameters that
    /// the template does not mention.
    fn path_parameters(
        &self,
        path: &str,
        item: &'a Map<String, Value>,
        op: &'a Map<String, Value>,
        location: &str,
    ) -> Result<Vec<PathParameter>> {
        let mut declared: Vec<(String, FieldType)> = Vec::new();
        let lists = [item.get("parameters"), op.get("parameters")];
        for param in lists.into_iter().flatten().filter_map(Value::as_array).flatten() {
            let param = self.deref_component(param, "parameters", location)?;
            if param.get("in").and_then(Value::as_str) != Some("path") {
                continue;
            }
            let Some(name) = param.get("name").and_then(Value::as_str) else {
                continue;
            };
            let ty = match param.get("schema") {
                Some(schema) => {
                    field_type(schema, self.table, &format!("{location} parameter {name}"))?
                }
                None => FieldType::String,
            };
            match declared.iter_mut().find(|(n, _)| n == name) {
                // Operation-level parameters override path-level ones.
                Some(existing) => existing.1 = ty,
                None => declared.push((name.to_string(), ty)),
            }
        }

        let mut params: Vec<PathParameter> = path_template_params(path)
            .into_iter()
            .map(|name| {
                let ty = declared
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, t)| t.clone())
                    .unwrap_or(FieldType::String);
                PathParameter {
                    snake_name: sanitize_identifier(&name),
                    name,
                    ty,
                }
            })
            .collect();
        for (name, ty) in declared {
            if !params.iter().any(|p| p.name == name) {
                params.push(PathParameter {
                    snake_name: sanitize_identifier(&name),
                    name,
                    ty,
                });
            }
        }
        Ok(params)
    }
}

fn success_response(responses: &Map<String, Value>) -> Option<&Value> {
    ["200", "201"]
        .into_iter()
        .find_map(|code| responses.get(code))
        .or_else(|| {
            responses
                .iter()
                .find(|(code, _)| code.starts_with('2'))
                .map(|(_, response)| response)
        })
}

fn error_responses(responses: &Map<String, Value>) -> Vec<ErrorResponse> {
    responses
        .iter()
        .filter_map(|(code, response)| {
            let (_, exception) = ERROR_STATUSES.iter().find(|(c, _)| *c == code.as_str())?;
            let status: u16 = code.parse().ok()?;
            let status_text = reason(status).to_string();
            let message = response
                .get("description")
                .and_then(Value::as_str)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| status_text.clone());
            Some(ErrorResponse {
                status,
                exception: (*exception).to_string(),
                message,
                status_text,
            })
        })
        .collect()
}

fn reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("OK")
}

/// CRUD intent of an operation. POST is ambiguous, so its operationId,
/// summary and description are searched for intent words first, then the
/// path shape and success status decide.
fn classify_operation(
    method: &Method,
    op: &Map<String, Value>,
    operation_id: &str,
    has_path_params: bool,
    success_status: u16,
) -> OperationKind {
    if *method == Method::GET {
        return if has_path_params {
            OperationKind::Read
        } else {
            OperationKind::List
        };
    }
    if *method == Method::PUT || *method == Method::PATCH {
        return OperationKind::Update;
    }
    if *method == Method::DELETE {
        return OperationKind::Delete;
    }
    if *method != Method::POST {
        return OperationKind::Other;
    }

    let mut text = operation_id.to_string();
    for key in ["summary", "description"] {
        if let Some(s) = op.get(key).and_then(Value::as_str) {
            text.push(' ');
            text.push_str(s);
        }
    }
    let words = intent_words(&text);
    let has_any = |candidates: &[&str]| words.iter().any(|w| candidates.contains(&w.as_str()));
    if has_any(&CREATE_WORDS) {
        OperationKind::Create
    } else if has_any(&READ_WORDS) {
        OperationKind::Read
    } else if has_any(&UPDATE_WORDS) {
        OperationKind::Update
    } else if has_any(&DELETE_WORDS) {
        OperationKind::Delete
    } else if has_path_params {
        match success_status {
            201 => OperationKind::Create,
            204 => OperationKind::Delete,
            _ => OperationKind::Update,
        }
    } else {
        OperationKind::Other
    }
}

/// Lowercase words of `text`, splitting camelCase and punctuation.
fn intent_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .flat_map(|w| {
            camel_to_snake(w)
                .split('_')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(paths: Value, schemas: Value) -> Value {
        json!({"openapi": "3.0.0", "paths": paths, "components": {"schemas": schemas}})
    }

    fn user_schema() -> Value {
        json!({"User": {"type": "object", "required": ["id"], "properties": {
            "id": {"type": "integer"},
            "email": {"type": "string"},
            "tags": {"type": "array", "items": {"type": "string"}}
        }}})
    }

    #[test]
    fn test_missing_paths_is_spec_error() {
        let err = extract_model(&json!({"components": {"schemas": {}}})).unwrap_err();
        assert!(matches!(err, GenerationError::SpecValidation { ref location, .. } if location == "paths"));
    }

    #[test]
    fn test_missing_components_is_spec_error() {
        let err = extract_model(&json!({"paths": {}})).unwrap_err();
        assert!(matches!(err, GenerationError::SpecValidation { ref location, .. } if location == "components"));
    }

    #[test]
    fn test_schema_fields_in_order() {
        let model = extract_model(&doc(json!({}), user_schema())).unwrap();
        let user = model.schema("User").unwrap();
        let names: Vec<&str> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "email", "tags"]);
        assert!(user.fields[0].required);
        assert!(!user.fields[1].required);
        assert_eq!(user.fields[2].ty, FieldType::Array(Box::new(FieldType::String)));
        assert_eq!(user.example_value["email"], json!("user@example.com"));
    }

    #[test]
    fn test_default_operation_id_and_params() {
        let paths = json!({"/users/{userId}": {"get": {"responses": {"200": {"content": {
            "application/json": {"schema": {"$ref": "#/components/schemas/User"}}}}}}}});
        let model = extract_model(&doc(paths, user_schema())).unwrap();
        let op = &model.operations[0];
        assert_eq!(op.operation_id, "get_users_by_user_id");
        assert_eq!(op.tag, "users");
        assert_eq!(op.parameter_names(), ["userId"]);
        assert_eq!(op.path_parameters[0].snake_name, "user_id");
        assert_eq!(op.response_schema_ref.as_deref(), Some("User"));
        assert_eq!(op.kind, OperationKind::Read);
    }

    #[test]
    fn test_array_response_is_flagged() {
        let paths = json!({"/users": {"get": {"tags": ["people"], "responses": {"200": {"content": {
            "application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/User"}}}}}}}}});
        let model = extract_model(&doc(paths, user_schema())).unwrap();
        let op = &model.operations[0];
        assert!(op.response_is_array);
        assert_eq!(op.tag, "people");
        assert_eq!(op.kind, OperationKind::List);
    }

    #[test]
    fn test_unresolved_reference_fails() {
        let paths = json!({"/users": {"post": {"requestBody": {"content": {
            "application/json": {"schema": {"$ref": "#/components/schemas/Ghost"}}}}}}});
        let err = extract_model(&doc(paths, user_schema())).unwrap_err();
        match err {
            GenerationError::SpecValidation { location, message } => {
                assert_eq!(location, "/users POST requestBody");
                assert!(message.contains("Ghost"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_operation_id_fails() {
        let paths = json!({
            "/a": {"get": {"operationId": "same"}},
            "/b": {"get": {"operationId": "same"}}
        });
        let err = extract_model(&doc(paths, user_schema())).unwrap_err();
        assert!(matches!(err, GenerationError::DuplicateSchema { ref name, .. } if name == "same"));
    }

    #[test]
    fn test_component_request_body_ref() {
        let document = json!({
            "paths": {"/users": {"post": {"requestBody": {"$ref": "#/components/requestBodies/NewUser"}}}},
            "components": {
                "schemas": user_schema(),
                "requestBodies": {"NewUser": {"content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/User"}}}}}
            }
        });
        let model = extract_model(&document).unwrap();
        assert_eq!(model.operations[0].request_schema_ref.as_deref(), Some("User"));
    }

    #[test]
    fn test_post_classification() {
        let classify = |op: Value, params: bool, status: u16| {
            let op = op.as_object().cloned().unwrap_or_default();
            let id = op.get("operationId").and_then(Value::as_str).unwrap_or("").to_string();
            classify_operation(&Method::POST, &op, &id, params, status)
        };
        assert_eq!(classify(json!({"operationId": "createUser"}), false, 200), OperationKind::Create);
        assert_eq!(classify(json!({"operationId": "searchUsers", "summary": "Fetch users"}), false, 200), OperationKind::Read);
        assert_eq!(classify(json!({"operationId": "archive"}), true, 204), OperationKind::Delete);
        assert_eq!(classify(json!({"operationId": "archive"}), true, 200), OperationKind::Update);
        assert_eq!(classify(json!({"operationId": "archive"}), false, 200), OperationKind::Other);
        // "address" must not count as "add"
        assert_eq!(classify(json!({"operationId": "verifyAddress"}), false, 200), OperationKind::Other);
    }

    #[test]
    fn test_unclassified_post_warns() {
        let paths = json!({"/jobs": {"post": {"operationId": "runJob"}}});
        let model = extract_model(&doc(paths, user_schema())).unwrap();
        assert_eq!(model.warnings.len(), 1);
        assert_eq!(model.warnings[0].kind, IssueKind::UnclassifiedOperation);
    }

    #[test]
    fn test_error_responses_and_success_status() {
        let paths = json!({"/users": {"post": {"operationId": "createUser", "responses": {
            "201": {"description": "created"},
            "400": {"description": "Invalid payload"},
            "500": {"description": "boom"},
            "404": {}
        }}}});
        let model = extract_model(&doc(paths, user_schema())).unwrap();
        let op = &model.operations[0];
        assert_eq!(op.success_status, 201);
        assert_eq!(op.status_text, "Created");
        let statuses: Vec<u16> = op.error_responses.iter().map(|e| e.status).collect();
        assert_eq!(statuses, [400, 404]);
        assert_eq!(op.error_responses[0].exception, "BadRequestError");
        assert_eq!(op.error_responses[0].message, "Invalid payload");
        assert_eq!(op.error_responses[1].message, "Not Found");
    }

    #[test]
    fn test_module_name_collision_is_duplicate() {
        let schemas = json!({"UserProfile": {"type": "object"}, "user_profile": {"type": "object"}});
        let err = extract_model(&doc(json!({}), schemas)).unwrap_err();
        assert!(matches!(err, GenerationError::DuplicateSchema { .. }));
    }

    #[test]
    fn test_array_schema_model() {
        let schemas = json!({
            "Tag": {"type": "object", "properties": {"label": {"type": "string"}}},
            "Tags": {"type": "array", "maxItems": 3, "items": {"$ref": "#/components/schemas/Tag"}}
        });
        let model = extract_model(&doc(json!({}), schemas)).unwrap();
        let tags = model.schema("Tags").unwrap();
        assert!(tags.is_array);
        assert_eq!(tags.max_items, Some(3));
        assert_eq!(tags.item_type, Some(FieldType::Ref("Tag".into())));
        assert_eq!(tags.item_example, Some(json!({"label": "STRING_VALUE"})));
        assert_eq!(tags.nested_references().collect::<Vec<_>>(), ["Tag"]);
    }
}
