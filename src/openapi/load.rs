use crate::error::GenerationError;
use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Read an OpenAPI (or FSM) document, choosing YAML or JSON by extension.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?
    };
    Ok(value)
}

/// The part of a `component.yaml` the generator cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    pub api_spec: Option<PathBuf>,
}

pub fn load_component(path: &Path) -> anyhow::Result<ComponentConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ComponentConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Location of the OpenAPI document named by `component.yaml`, relative to the
/// directory that holds the component file.
pub fn api_spec_path(component_path: &Path) -> anyhow::Result<PathBuf> {
    let config = load_component(component_path)?;
    let api_spec = config
        .api_spec
        .with_context(|| format!("No 'api_spec' key found in {}", component_path.display()))?;
    let base = component_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(api_spec))
}

/// Combine several documents into one.
///
/// `paths` and every `components` section are merged key by key. Identical
/// duplicates collapse; differing definitions of the same schema or path fail.
pub fn merge_documents(documents: &[Value]) -> Result<Value, GenerationError> {
    let mut merged = Map::new();
    let mut paths = Map::new();
    let mut components: Map<String, Value> = Map::new();

    for doc in documents {
        let root = doc
            .as_object()
            .ok_or_else(|| {
                GenerationError::spec("document", "expected a mapping at the top level")
            })?;
        for (key, value) in root {
            match key.as_str() {
                "paths" => merge_section(&mut paths, value, "path")?,
                "components" => {
                    let Some(sections) = value.as_object() else {
                        return Err(GenerationError::spec("components", "expected a mapping"));
                    };
                    for (section, entries) in sections {
                        let target = components
                            .entry(section.clone())
                            .or_insert_with(|| Value::Object(Map::new()));
                        if let Value::Object(target) = target {
                            merge_section(target, entries, section)?;
                        }
                    }
                }
                _ => {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
    }

    merged.insert("paths".to_string(), Value::Object(paths));
    merged.insert("components".to_string(), Value::Object(components));
    Ok(Value::Object(merged))
}

fn merge_section(
    target: &mut Map<String, Value>,
    incoming: &Value,
    what: &str,
) -> Result<(), GenerationError> {
    let Some(entries) = incoming.as_object() else {
        return Err(GenerationError::spec(what, "expected a mapping"));
    };
    for (name, definition) in entries {
        match target.get(name) {
            None => {
                target.insert(name.clone(), definition.clone());
            }
            Some(existing) if existing == definition => {}
            Some(existing) => {
                let marker = |v: &Value| v.get("x-persistent").and_then(Value::as_bool);
                let message = match (marker(existing), marker(definition)) {
                    (Some(a), Some(b)) if a != b => {
                        format!("conflicting x-persistent markers ({a} and {b})")
                    }
                    _ => format!("{what} defined twice with different contents"),
                };
                return Err(GenerationError::duplicate(name.clone(), message));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_dedupes_identical_schemas() {
        let a = json!({"openapi": "3.0.0", "paths": {"/a": {}}, "components": {"schemas": {"User": {"type": "object"}}}});
        let b = json!({"paths": {"/b": {}}, "components": {"schemas": {"User": {"type": "object"}}}});
        let merged = merge_documents(&[a, b]).unwrap();
        assert_eq!(merged["openapi"], json!("3.0.0"));
        assert_eq!(merged["paths"].as_object().unwrap().len(), 2);
        assert_eq!(merged["components"]["schemas"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_merge_rejects_conflicting_persistence_markers() {
        let a = json!({"components": {"schemas": {"User": {"type": "object", "x-persistent": true}}}});
        let b = json!({"components": {"schemas": {"User": {"type": "object", "x-persistent": false}}}});
        let err = merge_documents(&[a, b]).unwrap_err();
        match err {
            GenerationError::DuplicateSchema { name, message } => {
                assert_eq!(name, "User");
                assert!(message.contains("x-persistent"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_spec_path_is_relative_to_component() {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("component.yaml");
        std::fs::write(&component, "name: demo\napi_spec: api/openapi.yaml\n").unwrap();
        assert_eq!(api_spec_path(&component).unwrap(), dir.path().join("api/openapi.yaml"));
    }

    #[test]
    fn test_api_spec_path_requires_key() {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("component.yaml");
        std::fs::write(&component, "name: demo\n").unwrap();
        let err = api_spec_path(&component).unwrap_err();
        assert!(err.to_string().contains("api_spec"));
    }
}
