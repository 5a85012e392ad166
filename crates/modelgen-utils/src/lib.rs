//! Shared helpers for modelgen: identifier inflection and the typed list
//! formatting used by generated SQL fragments.

pub mod case;
pub mod sql;

pub use case::{pluralize, tableize, underscore};
pub use sql::{JoinError, ListValues, join_values, parse_nullable};
