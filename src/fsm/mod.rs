//! # FSM Module
//!
//! Declarative state machines ("ABCI apps") and their projections.
//!
//! An FSM document lists `states`, an input alphabet (`alphabet_in`), a
//! `transition_func` keyed by `"(State, EVENT)"`, the start states and the
//! final states. Loading turns the composite keys into ordered
//! [`Transition`]s; nothing downstream sees the string form again.
//!
//! ```text
//! YAML / Mermaid → FsmModel → validate → to_diagram | to_generation_bindings
//! ```

mod chain;
mod mermaid;
mod model;
mod project;
mod validate;

pub use chain::*;
pub use model::*;
pub use project::*;
pub use validate::*;
