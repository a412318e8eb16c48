#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::openapi::{extract_model, ApiModel};
use crate::validator::IssueKind;
use serde_json::{json, Value};

fn user_ref() -> Value {
    json!({"application/json": {"schema": {"$ref": "#/components/schemas/User"}}})
}

fn crud_model() -> ApiModel {
    let doc = json!({
        "paths": {
            "/users": {
                "get": {"operationId": "listUsers", "tags": ["users"], "responses": {"200": {"content": {
                    "application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/User"}}}}}}},
                "post": {"operationId": "createUser", "tags": ["users"],
                    "requestBody": {"content": user_ref()},
                    "responses": {"201": {"content": user_ref()}}}
            },
            "/users/{userId}": {
                "get": {"operationId": "getUser", "tags": ["users"], "responses": {"200": {"content": user_ref()}}},
                "put": {"operationId": "updateUser", "tags": ["users"],
                    "requestBody": {"content": user_ref()},
                    "responses": {"200": {"content": user_ref()}}},
                "delete": {"operationId": "deleteUser", "tags": ["users"], "responses": {"204": {"description": "gone"}}}
            },
            "/login": {
                "post": {"operationId": "login", "requestBody": {"content": {
                    "application/json": {"schema": {"$ref": "#/components/schemas/LoginRequest"}}}}}
            }
        },
        "components": {"schemas": {
            "User": {"type": "object", "properties": {
                "id": {"type": "integer"},
                "walletAddress": {"type": "string"},
                "address": {"$ref": "#/components/schemas/Address"}
            }},
            "Address": {"type": "object", "properties": {"street": {"type": "string"}}},
            "LoginRequest": {"type": "object", "properties": {"email": {"type": "string"}}},
            "Orphan": {"type": "object"},
            "AuditLog": {"type": "object", "x-persistent": true, "properties": {"entry": {"type": "string"}}}
        }}
    });
    extract_model(&doc).unwrap()
}

#[test]
fn test_usage_rule_marks_user_persistent() {
    let model = crud_model();
    let c = classify(&model.schemas, &model.operations);
    assert!(c.is_persistent("User"));
    assert!(!c.is_persistent("LoginRequest"));
    assert!(!c.is_persistent("Address"));
}

#[test]
fn test_explicit_marker_is_authoritative() {
    let model = crud_model();
    let c = classify(&model.schemas, &model.operations);
    assert!(c.is_persistent("AuditLog"));

    let doc = json!({
        "paths": {
            "/a": {"get": {"responses": {"200": {"content": user_ref()}}}},
            "/b": {"get": {"responses": {"200": {"content": user_ref()}}}}
        },
        "components": {"schemas": {"User": {"type": "object", "x-persistent": false}}}
    });
    let model = extract_model(&doc).unwrap();
    assert!(!classify(&model.schemas, &model.operations).is_persistent("User"));
}

#[test]
fn test_single_request_use_is_transient() {
    let doc = json!({
        "paths": {"/users": {"post": {"requestBody": {"content": user_ref()}}}},
        "components": {"schemas": {"User": {"type": "object"}}}
    });
    let model = extract_model(&doc).unwrap();
    assert!(!classify(&model.schemas, &model.operations).is_persistent("User"));
}

#[test]
fn test_dead_schema_warning_skips_nested_references() {
    let model = crud_model();
    let c = classify(&model.schemas, &model.operations);
    let dead: Vec<&str> = c
        .warnings
        .iter()
        .filter(|w| w.kind == IssueKind::DeadSchema)
        .map(|w| w.location.as_str())
        .collect();
    assert_eq!(dead, ["schema:Orphan", "schema:AuditLog"]);
}

#[test]
fn test_apply_classification_sets_flags() {
    let mut model = crud_model();
    apply_classification(&mut model);
    assert!(model.schema("User").unwrap().is_persistent);
    assert!(!model.schema("Orphan").unwrap().is_persistent);
}

#[test]
fn test_user_dao_has_full_crud() {
    let model = crud_model();
    let c = classify(&model.schemas, &model.operations);
    let specs = build_dao_specs(&model, &c);
    let names: Vec<&str> = specs.iter().map(|s| s.schema.as_str()).collect();
    assert_eq!(names, ["AuditLog", "User"]);

    let user = &specs[1];
    assert_eq!(user.module_name, "user_dao");
    assert_eq!(user.class_name, "UserDAO");
    assert_eq!(user.natural_key, ["userId"]);
    assert_eq!(
        user.capabilities,
        [
            CrudCapability::Create,
            CrudCapability::Read,
            CrudCapability::Update,
            CrudCapability::Delete,
            CrudCapability::List
        ]
    );
    assert_eq!(user.capability_for("deleteUser"), Some(CrudCapability::Delete));
    assert_eq!(user.capability_for("login"), None);
}

#[test]
fn test_marker_only_dao_has_no_capabilities() {
    let model = crud_model();
    let c = classify(&model.schemas, &model.operations);
    let specs = build_dao_specs(&model, &c);
    assert!(specs[0].capabilities.is_empty());
    assert!(specs[0].natural_key.is_empty());
}

#[test]
fn test_delete_requires_matching_key() {
    let doc = json!({
        "paths": {
            "/users/{userId}": {"get": {"tags": ["users"], "responses": {"200": {"content": user_ref()}}}},
            "/users/{userId}/sessions/{sessionId}": {"delete": {"tags": ["users"]}},
            "/users/all": {"get": {"tags": ["users"], "responses": {"200": {"content": user_ref()}}}}
        },
        "components": {"schemas": {"User": {"type": "object"}}}
    });
    let model = extract_model(&doc).unwrap();
    let c = classify(&model.schemas, &model.operations);
    let specs = build_dao_specs(&model, &c);
    assert!(!specs[0].supports(CrudCapability::Delete));
}

#[test]
fn test_fixtures_shape() {
    let doc = json!({
        "paths": {
            "/tags": {"get": {"responses": {"200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Tags"}}}}}}},
            "/tags/{id}": {"put": {"responses": {"200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Tags"}}}}}}}
        },
        "components": {"schemas": {
            "Tags": {"type": "array", "maxItems": 3, "items": {"type": "object", "properties": {"chain_id": {"type": "string"}}}},
            "User": {"type": "object", "x-persistent": true, "properties": {"id": {"type": "integer"}}}
        }}
    });
    let model = extract_model(&doc).unwrap();
    let c = classify(&model.schemas, &model.operations);
    let fixtures = build_fixtures(&model, &c);

    let keys: Vec<&String> = fixtures.aggregated.keys().collect();
    assert_eq!(keys, ["Tags", "User"]);
    assert_eq!(fixtures.aggregated["Tags"].as_array().unwrap().len(), 3);
    assert_eq!(fixtures.aggregated["Tags"][0], json!({"chain_id": "1"}));

    let users = fixtures.aggregated["User"].as_object().unwrap();
    assert_eq!(users.keys().cloned().collect::<Vec<_>>(), ["1", "2", "3", "4", "5"]);
    assert_eq!(users["3"], json!({"id": 42}));
    assert_eq!(fixtures.single["User"], json!({"id": 42}));
}

#[test]
fn test_specs_are_deterministic() {
    let model = crud_model();
    let c = classify(&model.schemas, &model.operations);
    assert_eq!(build_dao_specs(&model, &c), build_dao_specs(&model, &c));
    assert_eq!(
        serde_json::to_string(&build_fixtures(&model, &c)).unwrap(),
        serde_json::to_string(&build_fixtures(&model, &c)).unwrap()
    );
}

#[test]
fn test_read_only_resource_disables_update_and_delete() {
    let doc = json!({
        "paths": {
            "/users/{id}": {"get": {"operationId": "getUser", "responses": {"200": {"content": user_ref()}}}},
            "/users": {
                "get": {"operationId": "listUsers", "responses": {"200": {"content": {
                    "application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/User"}}}}}}},
                "post": {"operationId": "createUser", "requestBody": {"content": user_ref()}}
            }
        },
        "components": {"schemas": {"User": {"type": "object", "properties": {"name": {"type": "string"}}}}}
    });
    let model = extract_model(&doc).unwrap();
    let c = classify(&model.schemas, &model.operations);
    let specs = build_dao_specs(&model, &c);
    assert_eq!(specs.len(), 1);
    let user = &specs[0];
    assert_eq!(
        user.capabilities,
        [CrudCapability::Create, CrudCapability::Read, CrudCapability::List]
    );
    assert!(!user.supports(CrudCapability::Update));
    assert!(!user.supports(CrudCapability::Delete));
}
