//! The resolution pipeline.
//!
//! A [`Resolver`] owns everything one run needs. Phases run in a fixed order
//! and never stop early; each one appends its diagnostics and leaves the
//! arena in a state the next phase can walk safely.

mod association;
mod fields;
mod inherit;
mod mixin;
mod sti;

pub(crate) mod registry;

pub(crate) use sti::is_sti;

use crate::{
    config::ResolveConfig,
    error::LoadError,
    prelude::*,
    raw::{RawBatch, RawClass},
    validate::validate_arena,
};
use self::registry::ClassArena;
use tracing::debug;

///
/// Loaded
///
/// Outcome of a resolution run. The registry is always present so it can be
/// inspected, but it is only fit for generation when `errors` is empty.
///

#[derive(Debug)]
pub struct Loaded {
    pub registry: Registry,
    pub errors: ErrorList,
    pub warnings: Vec<String>,
}

impl Loaded {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Registry, LoadError> {
        if self.errors.is_empty() {
            Ok(self.registry)
        } else {
            Err(LoadError {
                errors: self.errors,
                warnings: self.warnings,
            })
        }
    }
}

///
/// Resolver
///
/// Explicit context for one resolution run.
///

#[derive(Debug)]
pub struct Resolver<'a> {
    config: &'a ResolveConfig,
    arena: ClassArena,
    errors: ErrorList,
    warnings: Vec<String>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(config: &'a ResolveConfig) -> Self {
        Self {
            config,
            arena: ClassArena::new(),
            errors: ErrorList::new(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn resolve(mut self, batch: &RawBatch) -> Loaded {
        let mixins = mixin::resolve_mixins(batch, &mut self.errors);
        debug!(mixins = mixins.len(), "resolved mixins");

        let declared = self.register(batch);
        debug!(classes = declared.len(), "registered classes");

        fields::load_own_fields(
            &mut self.arena,
            &declared,
            &mixins,
            &mut self.errors,
            &mut self.warnings,
        );

        inherit::link_bases(&mut self.arena, &declared, &mut self.errors);
        inherit::break_cycles(&mut self.arena, &mut self.errors);
        inherit::assign_identity(&mut self.arena, &mut self.errors);
        debug!(errors = self.errors.len(), "linked inheritance");

        association::resolve_associations(&mut self.arena, &declared, &mut self.errors);
        debug!(errors = self.errors.len(), "resolved associations");

        inherit::flatten_fields(&mut self.arena, &mut self.errors);
        inherit::link_children(&mut self.arena);
        sti::collapse_storage(&mut self.arena, &mut self.errors);

        validate_arena(&self.arena, &mut self.errors);
        debug!(
            classes = self.arena.len(),
            errors = self.errors.len(),
            warnings = self.warnings.len(),
            "resolution finished"
        );

        Loaded {
            registry: Registry::from_arena(self.arena),
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    // Skipped duplicates keep their error and take no further part.
    fn register<'b>(&mut self, batch: &'b RawBatch) -> Vec<(ClassId, &'b RawClass)> {
        let mut declared = Vec::new();

        for raw in batch.classes() {
            match self.arena.register(raw, self.config) {
                Ok(id) => declared.push((id, raw)),
                Err(err) => self.errors.add(err),
            }
        }

        declared
    }
}
