//! Handler dispatch descriptions, one per resource group (OpenAPI tag).

mod builder;

pub use builder::*;
