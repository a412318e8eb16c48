//! OpenAPI document loading and normalization into [`ApiModel`].
mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::*;
