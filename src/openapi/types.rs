use crate::validator::ValidationIssue;
use http::Method;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Prefix of every reference into `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// HTTP methods recognised on a path item, in the order they are visited.
pub const METHODS: [&str; 8] = [
    "get", "post", "put", "patch", "delete", "head", "options", "trace",
];

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<FieldType>),
    Object,
    /// Reference to another entry of `components.schemas`.
    Ref(String),
    Unknown,
}

impl FieldType {
    /// Name of the schema this type points at, looking through arrays.
    pub fn referenced_schema(&self) -> Option<&str> {
        match self {
            FieldType::Ref(name) => Some(name),
            FieldType::Array(inner) => inner.referenced_schema(),
            _ => None,
        }
    }

    /// Type hint used in the generated Python sources.
    pub fn python_type(&self) -> String {
        match self {
            FieldType::String => "str".to_string(),
            FieldType::Integer => "int".to_string(),
            FieldType::Number => "float".to_string(),
            FieldType::Boolean => "bool".to_string(),
            FieldType::Array(inner) => format!("list[{}]", inner.python_type()),
            FieldType::Object => "dict".to_string(),
            FieldType::Ref(name) => name.clone(),
            FieldType::Unknown => "Any".to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Number => f.write_str("number"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Array(inner) => write!(f, "array<{inner}>"),
            FieldType::Object => f.write_str("object"),
            FieldType::Ref(name) => f.write_str(name),
            FieldType::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One property of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldModel {
    /// Property name as written in the document.
    pub name: String,
    pub snake_name: String,
    pub ty: FieldType,
    pub python_type: String,
    pub required: bool,
}

/// A data entity discovered in `components.schemas`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaModel {
    pub name: String,
    pub fields: Vec<FieldModel>,
    /// Value of the `x-persistent` marker, when present.
    pub explicit_persistence: Option<bool>,
    /// Set once by [`apply_classification`](crate::dao::apply_classification).
    pub is_persistent: bool,
    /// Top-level `type: array` schema.
    pub is_array: bool,
    pub item_type: Option<FieldType>,
    pub max_items: Option<usize>,
    pub example_value: Value,
    /// Example of one element, for array schemas.
    pub item_example: Option<Value>,
}

impl SchemaModel {
    /// Schemas this one points at through its fields or items.
    pub fn nested_references(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter_map(|f| f.ty.referenced_schema())
            .chain(self.item_type.iter().filter_map(FieldType::referenced_schema))
    }
}

/// Reference to a schema, as found at a request/response position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    /// Names an existing entry of `components.schemas`.
    Resolved(String),
    /// Anything else; never survives model construction.
    Unresolved(String),
}

impl SchemaRef {
    pub fn resolve(raw: &str, schemas: &Map<String, Value>) -> SchemaRef {
        match raw.strip_prefix(SCHEMA_REF_PREFIX) {
            Some(name) if schemas.contains_key(name) => SchemaRef::Resolved(name.to_string()),
            _ => SchemaRef::Unresolved(raw.to_string()),
        }
    }
}

/// CRUD intent of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
    List,
    Other,
}

/// A `{param}` of the path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathParameter {
    pub name: String,
    pub snake_name: String,
    pub ty: FieldType,
}

/// A documented error response (400/401/403/404/422).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub exception: String,
    pub message: String,
    pub status_text: String,
}

/// One path + method pair of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationBinding {
    pub operation_id: String,
    pub path: String,
    #[serde(serialize_with = "serialize_method")]
    pub http_method: Method,
    /// Resource group: first OpenAPI tag, else first static path segment.
    pub tag: String,
    pub request_schema_ref: Option<String>,
    pub response_schema_ref: Option<String>,
    /// The success response is a sequence of `response_schema_ref`.
    pub response_is_array: bool,
    pub path_parameters: Vec<PathParameter>,
    pub kind: OperationKind,
    pub success_status: u16,
    pub status_text: String,
    pub error_responses: Vec<ErrorResponse>,
}

impl OperationBinding {
    /// Whether `schema` is this operation's request or response.
    pub fn references(&self, schema: &str) -> bool {
        self.request_schema_ref.as_deref() == Some(schema)
            || self.response_schema_ref.as_deref() == Some(schema)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.path_parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// `/users GET`-style location used in diagnostics.
    pub fn location(&self) -> String {
        format!("{} {}", self.path, self.http_method)
    }
}

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

/// Position of a method in generated output: GET, POST, PUT, PATCH, DELETE,
/// HEAD, OPTIONS, TRACE, then anything else.
pub fn method_rank(method: &Method) -> usize {
    METHODS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(method.as_str()))
        .unwrap_or(METHODS.len())
}

/// Everything extracted from one OpenAPI document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiModel {
    /// Document order.
    pub schemas: Vec<SchemaModel>,
    /// Document order: paths, then [`METHODS`] order within a path.
    pub operations: Vec<OperationBinding>,
    /// The raw `components.schemas` table, used for example generation.
    pub schema_table: Map<String, Value>,
    pub warnings: Vec<ValidationIssue>,
}

impl ApiModel {
    pub fn schema(&self, name: &str) -> Option<&SchemaModel> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_display_and_python() {
        let ty = FieldType::Array(Box::new(FieldType::Ref("User".into())));
        assert_eq!(ty.to_string(), "array<User>");
        assert_eq!(ty.python_type(), "list[User]");
        assert_eq!(ty.referenced_schema(), Some("User"));
        assert_eq!(FieldType::Number.python_type(), "float");
    }

    #[test]
    fn test_method_rank_orders_verbs() {
        assert!(method_rank(&Method::GET) < method_rank(&Method::POST));
        assert!(method_rank(&Method::PATCH) < method_rank(&Method::DELETE));
        assert_eq!(method_rank(&Method::from_bytes(b"PURGE").unwrap_or(Method::GET)), METHODS.len());
    }

    #[test]
    fn test_schema_ref_resolution() {
        let mut schemas = Map::new();
        schemas.insert("User".into(), Value::Null);
        assert_eq!(
            SchemaRef::resolve("#/components/schemas/User", &schemas),
            SchemaRef::Resolved("User".into())
        );
        assert_eq!(
            SchemaRef::resolve("#/components/schemas/Ghost", &schemas),
            SchemaRef::Unresolved("#/components/schemas/Ghost".into())
        );
        assert_eq!(
            SchemaRef::resolve("#/definitions/User", &schemas),
            SchemaRef::Unresolved("#/definitions/User".into())
        );
    }
}
