use crate::{prelude::*, resolve::is_sti};
use std::{fmt, ops::Deref};

///
/// ClassRef
///
/// A class together with the registry it lives in, so graph edges can be
/// followed. Dereferences to the underlying [`Class`].
///

#[derive(Clone, Copy)]
pub struct ClassRef<'a> {
    registry: &'a Registry,
    class: &'a Class,
}

impl<'a> ClassRef<'a> {
    pub(crate) const fn new(registry: &'a Registry, class: &'a Class) -> Self {
        Self { registry, class }
    }

    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// The underlying class, borrowed for the registry's lifetime.
    #[must_use]
    pub const fn class(&self) -> &'a Class {
        self.class
    }

    #[must_use]
    pub fn super_class(&self) -> Option<Self> {
        self.class.super_class.map(|id| self.registry.class(id))
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = ClassRef<'a>> + use<'a> {
        std::iter::successors(self.super_class(), ClassRef::super_class)
    }

    /// This class followed by its ancestors.
    pub fn chain(&self) -> impl Iterator<Item = ClassRef<'a>> + use<'a> {
        std::iter::successors(Some(*self), ClassRef::super_class)
    }

    #[must_use]
    pub fn root(&self) -> Self {
        self.ancestors().last().unwrap_or(*self)
    }

    pub fn own_children(&self) -> impl Iterator<Item = ClassRef<'a>> + use<'a> {
        let registry = self.registry;

        self.class.own_children.iter().map(move |&id| registry.class(id))
    }

    /// Direct and transitive subclasses.
    pub fn children(&self) -> impl Iterator<Item = ClassRef<'a>> + use<'a> {
        let registry = self.registry;

        self.class.children.iter().map(move |&id| registry.class(id))
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.class.own_children.is_empty()
    }

    /// Strict: a class is not a subclass of itself.
    #[must_use]
    pub fn is_subclass_of(&self, other: &ClassRef<'_>) -> bool {
        self.ancestors().any(|ancestor| ancestor.id == other.id)
    }

    /// The class itself or any subclass of `other`.
    #[must_use]
    pub fn is_assignable_to(&self, other: &ClassRef<'_>) -> bool {
        self.id == other.id || self.is_subclass_of(other)
    }

    /// A `type` discriminator is visible and the class has a parent or a
    /// child. A hierarchy root with children counts.
    #[must_use]
    pub fn is_sti(&self) -> bool {
        is_sti(self.class)
    }

    /// Own key groups, or those of the nearest ancestor that declares any.
    #[must_use]
    pub fn keys(&self) -> &'a [Key] {
        self.chain()
            .map(|member| member.class().own_keys())
            .find(|keys| !keys.is_empty())
            .unwrap_or_default()
    }

    /// This class or a descendant with the given normalized name.
    #[must_use]
    pub fn find_by_normalized_name(&self, normalized: &str) -> Option<Self> {
        self.subtree()
            .find(|member| member.normalized_name == normalized)
    }

    /// This class or a descendant stored under the given name.
    #[must_use]
    pub fn find_by_storage_name(&self, storage: &str) -> Option<Self> {
        self.subtree().find(|member| member.storage_name == storage)
    }

    fn subtree(&self) -> impl Iterator<Item = ClassRef<'a>> + use<'a> {
        std::iter::once(*self).chain(self.children())
    }
}

impl Deref for ClassRef<'_> {
    type Target = Class;

    fn deref(&self) -> &Class {
        self.class
    }
}

impl PartialEq for ClassRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.class.id == other.class.id
    }
}

impl Eq for ClassRef<'_> {}

impl fmt::Debug for ClassRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("id", &self.class.id)
            .field("name", &self.class.name)
            .finish()
    }
}

impl fmt::Display for ClassRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.class.name)?;
        if let Some(parent) = self.super_class() {
            write!(f, " < {}", parent.class.name)?;
        }

        let fields = self
            .class
            .own_fields
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if fields.is_empty() {
            write!(f, " {{ }}")
        } else {
            write!(f, " {{ {fields} }}")
        }
    }
}
