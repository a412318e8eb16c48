use super::classifier::Classification;
use crate::naming::sanitize_identifier;
use crate::openapi::{ApiModel, FieldModel, OperationBinding, SchemaModel};
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Number of instances per object schema in the aggregated fixtures.
pub const AGGREGATED_INSTANCES: usize = 5;

/// Storage operation a DAO exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudCapability {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl CrudCapability {
    pub fn as_str(self) -> &'static str {
        match self {
            CrudCapability::Create => "create",
            CrudCapability::Read => "read",
            CrudCapability::Update => "update",
            CrudCapability::Delete => "delete",
            CrudCapability::List => "list",
        }
    }
}

impl fmt::Display for CrudCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation that gave a DAO one of its capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityBinding {
    pub operation_id: String,
    pub capability: CrudCapability,
}

/// Storage accessor description for one persistent schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaoSpec {
    pub schema: String,
    /// `<snake>_dao`
    pub module_name: String,
    /// `<Name>DAO`
    pub class_name: String,
    /// Path parameter names identifying one instance.
    pub natural_key: Vec<String>,
    pub fields: Vec<FieldModel>,
    /// Sorted, without duplicates.
    pub capabilities: Vec<CrudCapability>,
    /// Operation order.
    pub operations: Vec<CapabilityBinding>,
    pub is_array: bool,
}

impl DaoSpec {
    pub fn supports(&self, capability: CrudCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Capability that `operation_id` maps to on this DAO.
    pub fn capability_for(&self, operation_id: &str) -> Option<CrudCapability> {
        self.operations
            .iter()
            .find(|b| b.operation_id == operation_id)
            .map(|b| b.capability)
    }
}

/// Deterministic sample data for the persistent schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaoFixtures {
    /// Object schemas map `"1".."5"` to instances; array schemas hold a list.
    pub aggregated: Map<String, Value>,
    /// One instance per schema.
    pub single: Map<String, Value>,
}

/// One [`DaoSpec`] per persistent schema, ordered by schema name.
pub fn build_dao_specs(model: &ApiModel, classification: &Classification) -> Vec<DaoSpec> {
    classification
        .persistent_names()
        .filter_map(|name| model.schema(name))
        .map(|schema| dao_spec(schema, &model.operations))
        .collect()
}

fn dao_spec(schema: &SchemaModel, operations: &[OperationBinding]) -> DaoSpec {
    let name = schema.name.as_str();
    let natural_key = natural_key(name, operations);
    let owning_tags: Vec<&str> = operations
        .iter()
        .filter(|op| op.references(name))
        .map(|op| op.tag.as_str())
        .collect();

    let mut bindings = Vec::new();
    for op in operations {
        let capability = if op.http_method == Method::POST
            && op.request_schema_ref.as_deref() == Some(name)
        {
            Some(CrudCapability::Create)
        } else if op.http_method == Method::GET && op.response_schema_ref.as_deref() == Some(name) {
            match (op.response_is_array, op.path_parameters.is_empty()) {
                (false, false) => Some(CrudCapability::Read),
                (true, true) => Some(CrudCapability::List),
                _ => None,
            }
        } else if (op.http_method == Method::PUT || op.http_method == Method::PATCH)
            && op.references(name)
        {
            Some(CrudCapability::Update)
        } else if op.http_method == Method::DELETE
            && op.response_schema_ref.as_deref() != Some(name)
            && !natural_key.is_empty()
            && op.parameter_names() == natural_key
            && (op.references(name) || owning_tags.contains(&op.tag.as_str()))
        {
            Some(CrudCapability::Delete)
        } else {
            None
        };
        if let Some(capability) = capability {
            bindings.push(CapabilityBinding {
                operation_id: op.operation_id.clone(),
                capability,
            });
        }
    }

    let mut capabilities: Vec<CrudCapability> = bindings.iter().map(|b| b.capability).collect();
    capabilities.sort();
    capabilities.dedup();

    DaoSpec {
        schema: name.to_string(),
        module_name: format!("{}_dao", sanitize_identifier(name)),
        class_name: format!("{name}DAO"),
        natural_key,
        fields: schema.fields.clone(),
        capabilities,
        operations: bindings,
        is_array: schema.is_array,
    }
}

/// Path parameters of the first single-instance GET of the schema, falling
/// back to the first referencing operation that has any.
fn natural_key(name: &str, operations: &[OperationBinding]) -> Vec<String> {
    let read = operations.iter().find(|op| {
        op.http_method == Method::GET
            && op.response_schema_ref.as_deref() == Some(name)
            && !op.response_is_array
            && !op.path_parameters.is_empty()
    });
    let source = read.or_else(|| {
        operations
            .iter()
            .find(|op| op.references(name) && !op.path_parameters.is_empty())
    });
    source
        .map(|op| op.path_parameters.iter().map(|p| p.name.clone()).collect())
        .unwrap_or_default()
}

/// Aggregated and single-instance fixtures for every persistent schema.
pub fn build_fixtures(model: &ApiModel, classification: &Classification) -> DaoFixtures {
    let mut fixtures = DaoFixtures::default();
    for schema in classification.persistent_names().filter_map(|n| model.schema(n)) {
        let aggregated = if schema.is_array {
            let count = schema
                .max_items
                .map_or(AGGREGATED_INSTANCES, |max| max.min(AGGREGATED_INSTANCES));
            let item = schema.item_example.clone().unwrap_or(Value::Null);
            Value::Array(vec![item; count])
        } else {
            Value::Object(
                (1..=AGGREGATED_INSTANCES)
                    .map(|i| (i.to_string(), schema.example_value.clone()))
                    .collect(),
            )
        };
        fixtures.aggregated.insert(schema.name.clone(), aggregated);
        fixtures
            .single
            .insert(schema.name.clone(), schema.example_value.clone());
    }
    fixtures
}
