use crate::prelude::*;
use derive_more::{Deref, IntoIterator};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Coarse classification of resolution diagnostics.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum ErrorClass {
    Ambiguity,
    Consistency,
    Duplication,
    Reference,
    TypeConflict,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ambiguity => "ambiguity",
            Self::Consistency => "consistency",
            Self::Duplication => "duplication",
            Self::Reference => "reference",
            Self::TypeConflict => "type_conflict",
        };
        write!(f, "{label}")
    }
}

///
/// FieldOwner
///
/// The definition a field set belongs to while it is being merged.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldOwner {
    Class(String),
    Mixin(String),
}

impl fmt::Display for FieldOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, "class '{name}'"),
            Self::Mixin(name) => write!(f, "mixin '{name}'"),
        }
    }
}

///
/// ResolveError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum ResolveError {
    #[error("class '{class}': {kind} target '{target}' is not defined")]
    AssociationTargetNotFound {
        class: String,
        target: String,
        kind: AssociationKind,
    },

    #[error("class '{class}': base class '{base}' is not defined")]
    BaseNotFound { class: String, base: String },

    #[error("class '{0}' is defined more than once")]
    DuplicateClass(String),

    #[error("{owner}: field '{field}' is declared twice ({first} and {second})")]
    DuplicateField {
        owner: FieldOwner,
        field: String,
        first: FieldSource,
        second: FieldSource,
    },

    #[error("mixin '{0}' is defined more than once")]
    DuplicateMixin(String),

    #[error("class '{class}' normalizes to '{normalized}', which is already taken by class '{existing}'")]
    DuplicateNormalizedName {
        class: String,
        normalized: String,
        existing: String,
    },

    #[error(
        "class '{class}': {kind} '{target}' needs field '{field}' on class '{holder}' to be {expected}, found {found}"
    )]
    FieldTypeConflict {
        class: String,
        target: String,
        kind: AssociationKind,
        holder: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("class '{class}': identity field 'id' must be objectId, found {found}")]
    IdentityTypeConflict { class: String, found: String },

    #[error("cyclic base class declaration: {}", .cycle.join(" -> "))]
    InheritanceCycle { cycle: Vec<String> },

    #[error("class '{class}': field '{field}' is {found} but class '{ancestor}' declares it as {expected}")]
    InheritedFieldConflict {
        class: String,
        field: String,
        ancestor: String,
        expected: String,
        found: String,
    },

    #[error("class '{class}': key field '{field}' is not declared")]
    KeyFieldNotFound { class: String, field: String },

    #[error("concrete class '{0}' has no objectId identity field 'id'")]
    MissingIdentity(String),

    #[error("cyclic mixin include: {}", .path.join(" -> "))]
    MixinCycle { path: Vec<String> },

    #[error("{owner}: included mixin '{include}' is not defined")]
    MixinNotFound { owner: FieldOwner, include: String },

    #[error(
        "class '{class}': polymorphic {kind} '{target}' may not declare foreign key '{foreign_key}'"
    )]
    PolymorphicForeignKey {
        class: String,
        target: String,
        kind: AssociationKind,
        foreign_key: String,
    },

    #[error(
        "class '{class}': base class '{ancestor}' uses single-table inheritance but subclass does not declare a 'type' field"
    )]
    StiBreak { class: String, ancestor: String },

    #[error("classes '{first}' and '{second}' share storage '{storage}' without a common single-table root")]
    StorageConflict {
        storage: String,
        first: String,
        second: String,
    },

    #[error("class '{class}': has_and_belongs_to_many '{target}' join class '{through}' is not defined")]
    ThroughNotFound {
        class: String,
        target: String,
        through: String,
    },
}

impl ResolveError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::AssociationTargetNotFound { .. }
            | Self::BaseNotFound { .. }
            | Self::KeyFieldNotFound { .. }
            | Self::MixinNotFound { .. }
            | Self::ThroughNotFound { .. } => ErrorClass::Reference,

            Self::DuplicateClass(_)
            | Self::DuplicateField { .. }
            | Self::DuplicateMixin(_)
            | Self::DuplicateNormalizedName { .. } => ErrorClass::Duplication,

            Self::FieldTypeConflict { .. }
            | Self::IdentityTypeConflict { .. }
            | Self::InheritedFieldConflict { .. } => ErrorClass::TypeConflict,

            Self::PolymorphicForeignKey { .. } => ErrorClass::Ambiguity,

            Self::InheritanceCycle { .. }
            | Self::MissingIdentity(_)
            | Self::MixinCycle { .. }
            | Self::StiBreak { .. }
            | Self::StorageConflict { .. } => ErrorClass::Consistency,
        }
    }
}

///
/// ErrorList
///
/// Ordered, append-only diagnostics collected across every resolution phase.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct ErrorList(Vec<ResolveError>);

impl ErrorList {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(&mut self, err: impl Into<ResolveError>) {
        self.0.push(err.into());
    }

    /// Number of diagnostics in the given class.
    #[must_use]
    pub fn count(&self, class: ErrorClass) -> usize {
        self.0.iter().filter(|err| err.class() == class).count()
    }

    pub fn result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {err}", err.class())?;
        }

        Ok(())
    }
}

///
/// LoadError
///

#[derive(Debug, ThisError)]
#[error("model resolution failed with {} error(s):\n{errors}", .errors.len())]
pub struct LoadError {
    pub errors: ErrorList,
    pub warnings: Vec<String>,
}

///
/// AssociationQueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AssociationQueryError {
    #[error(
        "class '{class}' has more than one {} association to '{target}'{}: {}",
        kinds_label(.kinds),
        key_label(.key),
        .candidates.join(", ")
    )]
    Ambiguous {
        class: String,
        target: String,
        kinds: Vec<AssociationKind>,
        key: String,
        candidates: Vec<String>,
    },

    #[error(
        "class '{class}' has no {} association to '{target}'{}",
        kinds_label(.kinds),
        key_label(.key)
    )]
    NoSuchAssociation {
        class: String,
        target: String,
        kinds: Vec<AssociationKind>,
        key: String,
    },
}

impl AssociationQueryError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Ambiguity
    }
}

fn kinds_label(kinds: &[AssociationKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

fn key_label(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        format!(" with key '{key}'")
    }
}
