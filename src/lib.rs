//! # adev
//!
//! **adev** scaffolds the storage, HTTP and state-machine layers of an agent
//! service from two kinds of declarative input: OpenAPI 3 documents and FSM
//! transition tables.
//!
//! ## Architecture
//!
//! - **[`openapi`]** - Loading, merging and extracting an [`openapi::ApiModel`]
//! - **[`dao`]** - Persistence classification, DAO specs and fixtures
//! - **[`handler`]** - Per-tag dispatch tables
//! - **[`fsm`]** - FSM model, validation, diagrams, bindings and chaining
//! - **[`render`]** - The [`render::TemplateRenderer`] seam and its `minijinja` implementation
//! - **[`generator`]** - In-memory artifacts and the file writer
//! - **[`cli`]**, **[`config`]**, **[`logging`]** - The `adev` binary
//!
//! ### Generation flow
//!
//! ```text
//! OpenAPI ──extract_model──▶ ApiModel ──classify──▶ build_dao_specs ─────┐
//!                                      └──────────▶ build_handler_specs ─┤
//! FSM YAML / Mermaid ──▶ FsmModel ──validate──▶ to_generation_bindings ──┤
//!                                                                       ▼
//!                                        TemplateRenderer ─▶ Vec<Artifact> ─▶ write_artifacts
//! ```
//!
//! Every model is built and checked before the first template is rendered,
//! and every artifact is rendered before the first file is written.
//!
//! ## Example
//!
//! ```rust,ignore
//! use adev::fsm::FsmModel;
//! use adev::generator::generate_fsm;
//! use adev::render::MiniJinjaRenderer;
//!
//! let model = FsmModel::from_yaml_str(&std::fs::read_to_string("fsm_specification.yaml")?)?;
//! let generation = generate_fsm(&model, &MiniJinjaRenderer::new()?)?;
//! for artifact in &generation.artifacts {
//!     println!("{}", artifact.path.display());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dao;
pub mod dummy_value;
pub mod error;
pub mod fsm;
pub mod generator;
pub mod handler;
pub mod logging;
pub mod naming;
pub mod openapi;
pub mod render;
pub mod validator;

pub use error::{GenerationError, Result};
