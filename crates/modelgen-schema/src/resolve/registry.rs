use crate::{config::ResolveConfig, prelude::*, raw::RawClass};
use std::collections::BTreeMap;

///
/// ClassArena
///
/// Classes under construction, indexed by `ClassId`. Every class is
/// registered before any cross-reference is resolved so forward references
/// in the input work.
///

#[derive(Debug, Default)]
pub(crate) struct ClassArena {
    classes: Vec<Class>,
    by_name: BTreeMap<String, ClassId>,
    by_normalized: BTreeMap<String, ClassId>,
}

impl ClassArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. A name or normalized name that is already taken is
    /// rejected and the definition is skipped.
    pub fn register(
        &mut self,
        raw: &RawClass,
        config: &ResolveConfig,
    ) -> Result<ClassId, ResolveError> {
        if self.by_name.contains_key(&raw.name) {
            return Err(ResolveError::DuplicateClass(raw.name.clone()));
        }

        let normalized = config.underscore(&raw.name);
        if let Some(existing) = self.by_normalized.get(&normalized) {
            return Err(ResolveError::DuplicateNormalizedName {
                class: raw.name.clone(),
                normalized,
                existing: self.get(*existing).name.clone(),
            });
        }

        let storage = match raw.table.as_deref() {
            Some(table) if !table.is_empty() => table.to_string(),
            _ => config.storage_name(&raw.name),
        };

        let id = ClassId::new(self.classes.len());
        let mut class = Class::new(id, &raw.name, normalized.clone(), storage, raw.is_abstract);
        class.annotations.clone_from(&raw.annotations);
        class.labels = Labels {
            label: raw.label.clone(),
            index: raw.index_label.clone(),
            new: raw.new_label.clone(),
            edit: raw.edit_label.clone(),
        };

        self.classes.push(class);
        self.by_name.insert(raw.name.clone(), id);
        self.by_normalized.insert(normalized, id);

        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + use<> {
        (0..self.classes.len()).map(ClassId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// `id` followed by its ancestors, nearest first.
    pub fn chain(&self, id: ClassId) -> Chain<'_> {
        Chain {
            arena: self,
            next: Some(id),
        }
    }

    pub fn ancestors(&self, id: ClassId) -> Chain<'_> {
        Chain {
            arena: self,
            next: self.get(id).super_class,
        }
    }

    pub fn into_parts(self) -> (Vec<Class>, BTreeMap<String, ClassId>, BTreeMap<String, ClassId>) {
        (self.classes, self.by_name, self.by_normalized)
    }
}

///
/// Chain
///
/// Upward walk over `super` edges. Only used once cycles have been broken.
///

pub(crate) struct Chain<'a> {
    arena: &'a ClassArena,
    next: Option<ClassId>,
}

impl Iterator for Chain<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let id = self.next?;
        self.next = self.arena.get(id).super_class;

        Some(id)
    }
}
