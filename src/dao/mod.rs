//! # DAO Module
//!
//! Turns a normalized [`ApiModel`](crate::openapi::ApiModel) into storage
//! accessor descriptions.
//!
//! ```text
//! ApiModel → classify → persistent schemas → DaoSpec* + DaoFixtures
//! ```
//!
//! A schema needs a DAO when it carries an explicit `x-persistent: true`
//! marker, or when it is returned by one operation and exchanged by another.
//! Capabilities (create/read/update/delete/list) come from the HTTP method,
//! the position of the schema in the operation and the shape of its path.

mod builder;
mod classifier;

pub use builder::*;
pub use classifier::*;

#[cfg(test)]
mod tests;
