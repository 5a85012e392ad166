//! The finished, read-only model graph.

mod class_ref;
mod query;

pub use class_ref::ClassRef;

use crate::{prelude::*, resolve::registry::ClassArena, validate::storage_root};
use std::collections::BTreeMap;

///
/// Registry
///
/// Immutable after construction and safe to share between threads.
///

#[derive(Debug, Serialize)]
pub struct Registry {
    classes: Vec<Class>,

    #[serde(skip)]
    by_name: BTreeMap<String, ClassId>,

    #[serde(skip)]
    by_normalized: BTreeMap<String, ClassId>,

    #[serde(skip)]
    by_storage: BTreeMap<String, ClassId>,
}

impl Registry {
    pub(crate) fn from_arena(arena: ClassArena) -> Self {
        // the highest class of each storage group answers storage lookups
        let mut by_storage = BTreeMap::new();
        for class in arena.iter() {
            by_storage
                .entry(class.storage_name.clone())
                .or_insert_with(|| storage_root(&arena, class.id));
        }

        let (classes, by_name, by_normalized) = arena.into_parts();

        Self {
            classes,
            by_name,
            by_normalized,
            by_storage,
        }
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<ClassRef<'_>> {
        self.by_name.get(name).map(|&id| self.class(id))
    }

    #[must_use]
    pub fn find_by_normalized_name(&self, normalized: &str) -> Option<ClassRef<'_>> {
        self.by_normalized.get(normalized).map(|&id| self.class(id))
    }

    #[must_use]
    pub fn find_by_storage_name(&self, storage: &str) -> Option<ClassRef<'_>> {
        self.by_storage.get(storage).map(|&id| self.class(id))
    }

    /// Every class in registration order.
    pub fn all(&self) -> impl Iterator<Item = ClassRef<'_>> {
        self.classes.iter().map(|class| ClassRef::new(self, class))
    }

    /// Distinct storage names with the class that owns each.
    pub fn storage_groups(&self) -> impl Iterator<Item = (&str, ClassRef<'_>)> {
        self.by_storage
            .iter()
            .map(|(storage, &id)| (storage.as_str(), self.class(id)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Look up a class by id.
    ///
    /// # Panics
    /// If `id` was issued by a different registry.
    #[must_use]
    pub fn class(&self, id: ClassId) -> ClassRef<'_> {
        ClassRef::new(self, &self.classes[id.index()])
    }

    #[must_use]
    pub fn get(&self, id: ClassId) -> Option<ClassRef<'_>> {
        self.classes
            .get(id.index())
            .map(|class| ClassRef::new(self, class))
    }
}
