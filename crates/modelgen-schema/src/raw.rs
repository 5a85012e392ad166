//! Deserialized input records.
//!
//! These mirror the model documents field for field; nothing here is
//! validated. Document parsing itself is the caller's concern, any serde
//! format works.

use crate::{node::Annotations, prelude::*};

///
/// RawBatch
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawBatch {
    pub documents: Vec<RawDocument>,
}

impl RawBatch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_document(mut self, document: RawDocument) -> Self {
        self.documents.push(document);
        self
    }

    pub fn mixins(&self) -> impl Iterator<Item = &RawMixin> {
        self.documents.iter().flat_map(|doc| doc.mixins.iter())
    }

    pub fn classes(&self) -> impl Iterator<Item = &RawClass> {
        self.documents.iter().flat_map(|doc| doc.classes.iter())
    }
}

///
/// RawDocument
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawDocument {
    pub mixins: Vec<RawMixin>,
    pub classes: Vec<RawClass>,
}

impl RawDocument {
    #[must_use]
    pub fn with_mixin(mut self, mixin: RawMixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: RawClass) -> Self {
        self.classes.push(class);
        self
    }
}

///
/// RawMixin
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawMixin {
    pub name: String,

    #[serde(default, alias = "include")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub fields: Vec<RawField>,
}

impl RawMixin {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            includes: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn include(mut self, mixin: &str) -> Self {
        self.includes.push(mixin.to_string());
        self
    }

    #[must_use]
    pub fn field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }
}

///
/// RawClass
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default, alias = "index_label")]
    pub index_label: Option<String>,

    #[serde(default, alias = "new_label")]
    pub new_label: Option<String>,

    #[serde(default, alias = "edit_label")]
    pub edit_label: Option<String>,

    #[serde(default)]
    pub base: Option<String>,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default)]
    pub table: Option<String>,

    #[serde(default, alias = "include")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub fields: Vec<RawField>,

    #[serde(default)]
    pub key_field_names: Vec<String>,

    #[serde(default)]
    pub combined_keys: Vec<Vec<String>>,

    /// Key groups in the `keys` spelling; resolved like `combined_keys`.
    #[serde(default)]
    pub keys: Vec<Vec<String>>,

    /// One key group, resolved ahead of every other group.
    #[serde(default)]
    pub primary_key: Vec<String>,

    #[serde(default)]
    pub belongs_to: Vec<RawBelongsTo>,

    #[serde(default)]
    pub has_many: Vec<RawHasMany>,

    #[serde(default)]
    pub has_one: Vec<RawHasMany>,

    #[serde(default)]
    pub has_and_belongs_to_many: Vec<RawHasAndBelongsToMany>,

    #[serde(default)]
    pub annotations: Annotations,
}

impl RawClass {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            index_label: None,
            new_label: None,
            edit_label: None,
            base: None,
            is_abstract: false,
            table: None,
            includes: Vec::new(),
            fields: Vec::new(),
            key_field_names: Vec::new(),
            combined_keys: Vec::new(),
            keys: Vec::new(),
            primary_key: Vec::new(),
            belongs_to: Vec::new(),
            has_many: Vec::new(),
            has_one: Vec::new(),
            has_and_belongs_to_many: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    #[must_use]
    pub fn base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    #[must_use]
    pub const fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    #[must_use]
    pub fn include(mut self, mixin: &str) -> Self {
        self.includes.push(mixin.to_string());
        self
    }

    #[must_use]
    pub fn field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn combined_key(mut self, names: &[&str]) -> Self {
        self.combined_keys
            .push(names.iter().map(ToString::to_string).collect());
        self
    }

    #[must_use]
    pub fn primary_key(mut self, names: &[&str]) -> Self {
        self.primary_key = names.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn belongs_to(mut self, assoc: RawBelongsTo) -> Self {
        self.belongs_to.push(assoc);
        self
    }

    #[must_use]
    pub fn has_many(mut self, assoc: RawHasMany) -> Self {
        self.has_many.push(assoc);
        self
    }

    #[must_use]
    pub fn has_one(mut self, assoc: RawHasMany) -> Self {
        self.has_one.push(assoc);
        self
    }

    #[must_use]
    pub fn has_and_belongs_to_many(mut self, assoc: RawHasAndBelongsToMany) -> Self {
        self.has_and_belongs_to_many.push(assoc);
        self
    }
}

///
/// RawField
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: FieldType,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default, alias = "is_array")]
    pub is_array: bool,

    #[serde(default)]
    pub embedded: bool,

    #[serde(default)]
    pub key: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default, alias = "readOnly")]
    pub readonly: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub default: Option<JsonValue>,

    #[serde(default)]
    pub unit: Option<String>,

    #[serde(default)]
    pub restrictions: Option<Restrictions>,

    #[serde(default)]
    pub annotations: Annotations,
}

impl RawField {
    #[must_use]
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            label: None,
            description: None,
            format: None,
            is_array: false,
            embedded: false,
            key: false,
            required: false,
            readonly: false,
            unique: false,
            default: None,
            unit: None,
            restrictions: None,
            annotations: Annotations::new(),
        }
    }

    #[must_use]
    pub const fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    #[must_use]
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

///
/// RawBelongsTo
///
/// `name` is the foreign-key field on the owning class.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RawBelongsTo {
    pub target: String,

    #[serde(default, alias = "foreignKey")]
    pub name: Option<String>,
}

impl RawBelongsTo {
    #[must_use]
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            name: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

///
/// RawHasMany
///
/// Shared by `hasMany` and `hasOne`; `foreign_key` lives on the target.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHasMany {
    pub target: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub foreign_key: Option<String>,

    #[serde(default)]
    pub polymorphic: bool,
}

impl RawHasMany {
    #[must_use]
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            name: None,
            foreign_key: None,
            polymorphic: false,
        }
    }

    #[must_use]
    pub fn foreign_key(mut self, name: &str) -> Self {
        self.foreign_key = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub const fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }
}

///
/// RawHasAndBelongsToMany
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHasAndBelongsToMany {
    pub target: String,

    #[serde(default)]
    pub through: Option<String>,

    #[serde(default)]
    pub foreign_key: Option<String>,
}

impl RawHasAndBelongsToMany {
    #[must_use]
    pub fn new(target: &str, through: &str) -> Self {
        Self {
            target: target.to_string(),
            through: Some(through.to_string()),
            foreign_key: None,
        }
    }
}
