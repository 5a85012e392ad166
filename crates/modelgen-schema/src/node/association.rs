use crate::{prelude::*, registry::ClassRef};
use std::ops::Not;

///
/// Association
///
/// A resolved relationship declared on its owning class.
///
/// `foreign_key` is the field holding the reference: on the owner for
/// belongs-to, on the target for has-one/has-many, and the join-side key name
/// for has-and-belongs-to-many.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Association {
    pub kind: AssociationKind,
    pub target: ClassId,
    pub foreign_key: String,

    /// Declared association name, when the input gives one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Not::not")]
    pub polymorphic: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<ClassId>,
}

impl Association {
    /// A plain association with no name, join class or polymorphism.
    #[must_use]
    pub const fn new(kind: AssociationKind, target: ClassId, foreign_key: String) -> Self {
        Self {
            kind,
            target,
            foreign_key,
            name: None,
            polymorphic: false,
            through: None,
        }
    }

    /// Whether `key` names this association's foreign key or its declared name.
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        self.foreign_key == key || self.name.as_deref() == Some(key)
    }

    /// Resolve the target class in the registry that produced this association.
    #[must_use]
    pub fn target<'a>(&self, registry: &'a Registry) -> ClassRef<'a> {
        registry.class(self.target)
    }

    /// Join class of a has-and-belongs-to-many association.
    #[must_use]
    pub fn through<'a>(&self, registry: &'a Registry) -> Option<ClassRef<'a>> {
        self.through.map(|id| registry.class(id))
    }

    /// Class that physically holds `foreign_key`, given the owning class.
    #[must_use]
    pub const fn key_holder(&self, owner: ClassId) -> ClassId {
        if self.kind.key_on_target() {
            self.target
        } else {
            owner
        }
    }
}
