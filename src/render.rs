//! Template rendering seam.
//!
//! The engine only ever calls [`TemplateRenderer::render`] with a template id
//! and serializable bindings. [`MiniJinjaRenderer`] is the default
//! implementation; its templates are compiled into the binary and can be
//! replaced one by one from an override directory.

use crate::error::{GenerationError, Result};
use crate::generator::python_literal;
use crate::naming::{camel_to_snake, to_camel_case};
use anyhow::Context;
use minijinja::{AutoEscape, Environment, ErrorKind};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub const BASE_DAO_TEMPLATE: &str = "dao/base_dao.py.j2";
pub const DAO_TEMPLATE: &str = "dao/dao.py.j2";
pub const DAO_TEST_TEMPLATE: &str = "dao/test_dao.py.j2";
pub const HANDLER_TEMPLATE: &str = "handler/handler.py.j2";
pub const ROUNDS_TEMPLATE: &str = "fsm/rounds.py.j2";

/// Template id and source of every embedded template.
pub const EMBEDDED_TEMPLATES: [(&str, &str); 5] = [
    (BASE_DAO_TEMPLATE, include_str!("../templates/dao/base_dao.py.j2")),
    (DAO_TEMPLATE, include_str!("../templates/dao/dao.py.j2")),
    (DAO_TEST_TEMPLATE, include_str!("../templates/dao/test_dao.py.j2")),
    (HANDLER_TEMPLATE, include_str!("../templates/handler/handler.py.j2")),
    (ROUNDS_TEMPLATE, include_str!("../templates/fsm/rounds.py.j2")),
];

/// Turns a template id plus bindings into text.
pub trait TemplateRenderer {
    fn render(&self, template_id: &str, bindings: &Value) -> Result<String>;
}

/// [`TemplateRenderer`] backed by a `minijinja` environment.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Renderer over the embedded templates.
    pub fn new() -> Result<Self> {
        let mut env = base_environment();
        for (id, source) in EMBEDDED_TEMPLATES {
            env.add_template(id, source).map_err(|e| render_error(id, e))?;
        }
        Ok(MiniJinjaRenderer { env })
    }

    /// Embedded templates, replaced by any file with the same relative path
    /// under `dir`.
    pub fn with_overrides(dir: &Path) -> anyhow::Result<Self> {
        let mut renderer = Self::new()?;
        for (id, _) in EMBEDDED_TEMPLATES {
            let path = dir.join(id);
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template override {}", path.display()))?;
            renderer
                .env
                .add_template_owned(id, source)
                .map_err(|e| render_error(id, e))?;
            debug!(template = id, path = %path.display(), "using template override");
        }
        Ok(renderer)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template_id: &str, bindings: &Value) -> Result<String> {
        let template = self
            .env
            .get_template(template_id)
            .map_err(|e| render_error(template_id, e))?;
        template
            .render(bindings)
            .map_err(|e| render_error(template_id, e))
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("snake", |s: String| camel_to_snake(&s));
    env.add_filter("camel", |s: String| to_camel_case(&s));
    env.add_filter("pyrepr", pyrepr);
    env
}

/// Python literal for any template value, quotes escaped.
fn pyrepr(value: minijinja::Value) -> std::result::Result<String, minijinja::Error> {
    let json = serde_json::to_value(&value)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
    Ok(python_literal(&json))
}

fn render_error(template: &str, source: minijinja::Error) -> GenerationError {
    GenerationError::Render {
        template: template.to_string(),
        source: Box::new(source),
    }
}
