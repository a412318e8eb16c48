//! # CLI Module
//!
//! Command-line front end of the `adev` binary.
//!
//! ## Commands
//!
//! ```bash
//! adev dao --component component.yaml --output out
//! adev handler --spec api.yaml --spec admin.yaml --use-daos
//! adev fsm from-file fsm_specification.yaml --output mermaid
//! adev fsm validate a.yaml b.mmd
//! adev fsm scaffold fsm_specification.yaml --output skills
//! adev fsm chain first.yaml second.yaml --label ComposedAbciApp
//! ```
//!
//! Generating commands share `--output`, `--force` and `--dry-run`; their
//! defaults come from `adev.toml` (or `--config FILE`) and `ADEV_*`
//! environment variables. Commands that convert documents print them to
//! stdout; logs always go to stderr.

mod commands;

pub use commands::*;

#[cfg(test)]
mod tests;
