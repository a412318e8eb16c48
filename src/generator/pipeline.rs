use super::literal::python_literal;
use crate::dao::{apply_classification, build_dao_specs, build_fixtures, Classification};
use crate::error::{GenerationError, Result};
use crate::fsm::{ensure_valid, to_diagram, to_generation_bindings, FsmModel};
use crate::handler::build_handler_specs;
use crate::openapi::{extract_model, ApiModel};
use crate::render::{
    TemplateRenderer, BASE_DAO_TEMPLATE, DAO_TEMPLATE, DAO_TEST_TEMPLATE, HANDLER_TEMPLATE,
    ROUNDS_TEMPLATE,
};
use crate::validator::{log_issues, ValidationIssue};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::info;

/// One generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Artifact {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Rendered artifacts plus the warnings raised while building them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub artifacts: Vec<Artifact>,
    pub warnings: Vec<ValidationIssue>,
}

impl Generation {
    /// Artifact paths in generation order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.artifacts.iter().map(|a| &a.path)
    }
}

/// DAO layer for every persistent schema of an OpenAPI document.
///
/// Produces nothing when no schema is persistent.
pub fn generate_daos(document: &Value, renderer: &dyn TemplateRenderer) -> Result<Generation> {
    let (model, classification, warnings) = classified_model(document)?;
    let daos = build_dao_specs(&model, &classification);
    if daos.is_empty() {
        info!("no persistent schemas, no DAOs to generate");
        return Ok(Generation {
            artifacts: Vec::new(),
            warnings,
        });
    }
    let fixtures = build_fixtures(&model, &classification);

    let mut artifacts = Vec::with_capacity(daos.len() + 4);
    artifacts.push(Artifact::new(
        "dao/__init__.py",
        package_init(
            "Generated data access objects.",
            daos.iter().map(|d| (d.module_name.as_str(), d.class_name.as_str())),
        ),
    ));
    artifacts.push(Artifact::new(
        "dao/base_dao.py",
        renderer.render(BASE_DAO_TEMPLATE, &json!({}))?,
    ));
    for dao in &daos {
        let bindings = json!({ "dao": to_bindings(DAO_TEMPLATE, dao)? });
        artifacts.push(Artifact::new(
            format!("dao/{}.py", dao.module_name),
            renderer.render(DAO_TEMPLATE, &bindings)?,
        ));
    }
    artifacts.push(Artifact::new(
        "dao/aggregated_data.json",
        json_text("dao/aggregated_data.json", &fixtures.aggregated)?,
    ));

    let samples: Map<String, Value> = daos
        .iter()
        .map(|dao| {
            let sample = fixtures
                .single
                .get(&dao.schema)
                .map_or_else(|| "{}".to_string(), python_literal);
            (dao.schema.clone(), Value::String(sample))
        })
        .collect();
    let bindings = json!({ "daos": to_bindings(DAO_TEST_TEMPLATE, &daos)?, "samples": samples });
    artifacts.push(Artifact::new(
        "tests/test_dao.py",
        renderer.render(DAO_TEST_TEMPLATE, &bindings)?,
    ));

    info!(daos = daos.len(), artifacts = artifacts.len(), "rendered DAO layer");
    Ok(Generation { artifacts, warnings })
}

/// One handler module per tag of an OpenAPI document.
pub fn generate_handlers(
    document: &Value,
    use_daos: bool,
    renderer: &dyn TemplateRenderer,
) -> Result<Generation> {
    let (model, classification, warnings) = classified_model(document)?;
    let daos = if use_daos {
        build_dao_specs(&model, &classification)
    } else {
        Vec::new()
    };
    let specs = build_handler_specs(&model, &daos, use_daos)?;

    let mut artifacts = Vec::with_capacity(specs.len() + 1);
    artifacts.push(Artifact::new(
        "handlers/__init__.py",
        package_init(
            "Generated request handlers.",
            specs.iter().map(|s| (s.module_name.as_str(), s.class_name.as_str())),
        ),
    ));
    for spec in &specs {
        let bindings = json!({ "handler": to_bindings(HANDLER_TEMPLATE, spec)? });
        artifacts.push(Artifact::new(
            format!("handlers/{}.py", spec.module_name),
            renderer.render(HANDLER_TEMPLATE, &bindings)?,
        ));
    }

    info!(handlers = specs.len(), use_daos, "rendered handlers");
    Ok(Generation { artifacts, warnings })
}

/// Skill package for one FSM: rounds, diagram and the canonical document.
///
/// Structural errors abort before anything is rendered.
pub fn generate_fsm(model: &FsmModel, renderer: &dyn TemplateRenderer) -> Result<Generation> {
    let warnings = ensure_valid(model)?;
    log_issues(&warnings);

    let bindings = to_generation_bindings(model);
    let dir = PathBuf::from(&bindings.label_snake);
    let rounds = renderer.render(ROUNDS_TEMPLATE, &to_bindings(ROUNDS_TEMPLATE, &bindings)?)?;
    let yaml = model.to_yaml().map_err(|e| GenerationError::Render {
        template: "fsm_specification.yaml".to_string(),
        source: Box::new(e),
    })?;

    let artifacts = vec![
        Artifact::new(dir.join("__init__.py"), format!("\"\"\"{} skill.\"\"\"\n", model.label)),
        Artifact::new(dir.join("rounds.py"), rounds),
        Artifact::new(dir.join("diagram.mmd"), to_diagram(model)),
        Artifact::new(dir.join("fsm_specification.yaml"), yaml),
    ];
    info!(label = %model.label, states = model.states.len(), "rendered FSM skill");
    Ok(Generation { artifacts, warnings })
}

/// Extracted and classified model, with every warning so far logged.
fn classified_model(document: &Value) -> Result<(ApiModel, Classification, Vec<ValidationIssue>)> {
    let mut model = extract_model(document)?;
    let classification = apply_classification(&mut model);
    let mut warnings = model.warnings.clone();
    warnings.extend(classification.warnings.iter().cloned());
    log_issues(&warnings);
    Ok((model, classification, warnings))
}

fn to_bindings<T: Serialize + ?Sized>(template: &str, value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| GenerationError::Render {
        template: template.to_string(),
        source: Box::new(e),
    })
}

fn json_text(name: &str, value: &Map<String, Value>) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| GenerationError::Render {
        template: name.to_string(),
        source: Box::new(e),
    })?;
    text.push('\n');
    Ok(text)
}

/// `__init__.py` re-exporting one class per module.
fn package_init<'a>(
    doc: &str,
    modules: impl Iterator<Item = (&'a str, &'a str)> + Clone,
) -> String {
    let imports: String = modules
        .clone()
        .map(|(module, class)| format!("from .{module} import {class}\n"))
        .collect();
    let names: String = modules.map(|(_, class)| format!("    \"{class}\",\n")).collect();
    format!("\"\"\"{doc}\"\"\"\n\n{imports}\n__all__ = [\n{names}]\n")
}
