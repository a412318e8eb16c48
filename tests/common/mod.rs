#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use adev::fsm::FsmModel;
use adev::openapi::{extract_model, load_document, ApiModel};
use adev::render::MiniJinjaRenderer;
use serde_json::Value;
use std::path::PathBuf;

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_document(name: &str) -> Value {
    load_document(&fixture(name)).expect("fixture document should load")
}

pub fn users_model() -> ApiModel {
    extract_model(&fixture_document("users_api.yaml")).expect("users fixture should extract")
}

pub fn hello_world_fsm() -> FsmModel {
    let text = std::fs::read_to_string(fixture("fsm_specification.yaml")).unwrap();
    FsmModel::from_yaml_str(&text).expect("FSM fixture should load")
}

pub fn renderer() -> MiniJinjaRenderer {
    MiniJinjaRenderer::new().expect("embedded templates should compile")
}
