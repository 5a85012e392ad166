//! Model metadata resolution.
//!
//! Takes a batch of raw class and mixin definitions and links them into an
//! immutable [`Registry`]: mixins merged, identity and foreign-key fields
//! synthesized, inheritance linked and single-table hierarchies collapsed
//! onto shared storage. Every problem found along the way is collected into
//! one ordered [`ErrorList`] instead of stopping at the first.

pub mod config;
pub mod error;
pub mod node;
pub mod raw;
pub mod registry;
pub mod resolve;
pub mod types;
mod validate;

use crate::{config::ConfigError, error::LoadError};
use thiserror::Error as ThisError;

pub use crate::{
    config::ResolveConfig,
    error::{AssociationQueryError, ErrorClass, ErrorList, ResolveError},
    raw::RawBatch,
    registry::{ClassRef, Registry},
    resolve::{Loaded, Resolver},
};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        error::{ErrorClass, ErrorList, ResolveError},
        node::*,
        registry::{ClassRef, Registry},
        types::{AssociationKind, FieldType},
    };
    pub use indexmap::IndexMap;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value as JsonValue;
    pub use std::sync::Arc;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    LoadError(#[from] LoadError),
}

/// Resolve a batch with the given naming config.
#[must_use]
pub fn load(batch: &RawBatch, config: &ResolveConfig) -> Loaded {
    Resolver::new(config).resolve(batch)
}

/// Parse a TOML config and resolve a batch, failing on any diagnostic.
pub fn load_with_toml(batch: &RawBatch, config: &str) -> Result<Registry, Error> {
    let config = ResolveConfig::from_toml_str(config)?;

    Ok(load(batch, &config).into_result()?)
}
