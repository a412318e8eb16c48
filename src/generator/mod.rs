//! # Generator Module
//!
//! Turns generation models into files.
//!
//! ```text
//! OpenAPI document → ApiModel → DaoSpec / HandlerSpec ─┐
//!                                                      ├→ TemplateRenderer → Vec<Artifact> → write_artifacts
//! FSM document     → FsmModel → FsmBindings ───────────┘
//! ```
//!
//! Every `generate_*` function renders all of its artifacts in memory and
//! returns them together with the non-fatal warnings collected on the way.
//! Nothing touches the filesystem until [`write_artifacts`], so a failure at
//! any point leaves the output directory as it was.
//!
//! ## Generated layout
//!
//! ```text
//! dao/
//! ├── __init__.py
//! ├── base_dao.py
//! ├── <schema>_dao.py           # one per persistent schema
//! └── aggregated_data.json
//! tests/test_dao.py
//! handlers/
//! ├── __init__.py
//! └── <tag>_handler.py          # one per tag
//! <fsm_label>/
//! ├── __init__.py
//! ├── rounds.py
//! ├── diagram.mmd
//! └── fsm_specification.yaml
//! ```
//!
//! Output is deterministic: the same input yields byte-identical artifacts.

mod literal;
mod pipeline;
mod write;

pub use literal::python_literal;
pub use pipeline::*;
pub use write::*;
