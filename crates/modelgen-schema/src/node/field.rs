use crate::{prelude::*, raw::RawField};
use std::{collections::BTreeMap, fmt};

/// Open key/value bag carried through from the input documents.
pub type Annotations = BTreeMap<String, JsonValue>;

/// Declaration-ordered field map keyed by field name.
pub type FieldMap = IndexMap<String, Arc<Field>>;

///
/// Field
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    pub collection: bool,
    pub required: bool,
    pub read_only: bool,
    pub unique: bool,
    pub embedded: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: Annotations,

    pub source: FieldSource,
}

impl Field {
    pub const IDENTITY: &'static str = "id";
    pub const PARENT_ID: &'static str = "parent_id";
    pub const PARENT_TYPE: &'static str = "parent_type";
    pub const DISCRIMINATOR: &'static str = "type";

    /// Build a field from its raw declaration.
    #[must_use]
    pub fn from_raw(raw: &RawField, source: FieldSource) -> Self {
        Self {
            name: raw.name.clone(),
            ty: raw.ty,
            label: raw.label.clone(),
            description: raw.description.clone(),
            format: raw.format.clone(),
            collection: raw.is_array,
            required: raw.required,
            read_only: raw.readonly,
            unique: raw.unique,
            embedded: raw.embedded,
            default: raw.default.clone(),
            unit: raw.unit.clone(),
            restrictions: raw.restrictions.clone(),
            annotations: raw.annotations.clone(),
            source,
        }
    }

    fn synthesized(name: &str, ty: FieldType, source: FieldSource) -> Self {
        Self {
            name: name.to_string(),
            ty,
            label: None,
            description: None,
            format: None,
            collection: false,
            required: false,
            read_only: false,
            unique: false,
            embedded: false,
            default: None,
            unit: None,
            restrictions: None,
            annotations: Annotations::new(),
            source,
        }
    }

    /// The implicit `id: objectId` identity field.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            required: true,
            read_only: true,
            ..Self::synthesized(Self::IDENTITY, FieldType::ObjectId, FieldSource::Identity)
        }
    }

    /// A synthesized object-id foreign key.
    #[must_use]
    pub fn foreign_key(name: &str) -> Self {
        Self::synthesized(name, FieldType::ObjectId, FieldSource::ForeignKey)
    }

    /// A synthesized polymorphic type tag.
    #[must_use]
    pub fn type_tag(name: &str) -> Self {
        Self::synthesized(name, FieldType::String, FieldSource::ForeignKey)
    }

    /// Whether this is a single-valued field of the given type.
    #[must_use]
    pub fn is_scalar(&self, ty: FieldType) -> bool {
        self.ty == ty && !self.collection
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.name == Self::IDENTITY && self.is_scalar(FieldType::ObjectId)
    }

    /// Same name, type and cardinality.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty && self.collection == other.collection
    }

    /// Set by the `embedded` flag or a truthy `embedded` annotation.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        if self.embedded {
            return true;
        }

        match self.annotations.get("embedded") {
            Some(JsonValue::Bool(flag)) => *flag,
            Some(JsonValue::String(s)) => {
                s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes")
            }
            _ => false,
        }
    }

    /// Type rendering used in diagnostics, `[string]` for collections.
    #[must_use]
    pub fn type_label(&self) -> String {
        if self.collection {
            format!("[{}]", self.ty)
        } else {
            self.ty.to_string()
        }
    }
}

///
/// FieldSource
///
/// Where a field came from, recorded for diagnostics.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Declared,
    Mixin(String),
    Identity,
    ForeignKey,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared => write!(f, "declared field"),
            Self::Mixin(name) => write!(f, "mixin '{name}'"),
            Self::Identity => write!(f, "synthesized identity"),
            Self::ForeignKey => write!(f, "synthesized foreign key"),
        }
    }
}

///
/// Restrictions
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enumerations: Vec<EnumerationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

///
/// EnumerationValue
///
/// Accepts either a bare string or a `{ label, value }` record.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumerationValue {
    Plain(String),
    Labeled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        value: String,
    },
}

impl EnumerationValue {
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Labeled { value, .. } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_required_object_id() {
        let id = Field::identity();

        assert!(id.is_identity());
        assert!(id.required && id.read_only);
        assert_eq!(id.source, FieldSource::Identity);
    }

    #[test]
    fn type_label_marks_collections() {
        let mut field = Field::foreign_key("tag_ids");
        assert_eq!(field.type_label(), "objectId");

        field.collection = true;
        assert_eq!(field.type_label(), "[objectId]");
        assert!(!field.is_scalar(FieldType::ObjectId));
    }

    #[test]
    fn embedded_annotation_accepts_bool_and_text() {
        let mut field = Field::type_tag("kind");
        assert!(!field.is_embedded());

        field
            .annotations
            .insert("embedded".into(), JsonValue::String("YES".into()));
        assert!(field.is_embedded());

        field
            .annotations
            .insert("embedded".into(), JsonValue::Bool(false));
        assert!(!field.is_embedded());
    }

    #[test]
    fn declared_metadata_is_carried_from_raw() {
        let raw: RawField = serde_json::from_str(
            r#"{
                "name": "address",
                "type": "string",
                "label": "Address",
                "description": "Postal address",
                "format": "multiline",
                "embedded": true,
                "is_array": true
            }"#,
        )
        .unwrap();

        let field = Field::from_raw(&raw, FieldSource::Declared);
        assert_eq!(field.label.as_deref(), Some("Address"));
        assert_eq!(field.description.as_deref(), Some("Postal address"));
        assert_eq!(field.format.as_deref(), Some("multiline"));
        assert!(field.is_embedded());
        assert!(field.collection);
    }

    #[test]
    fn restrictions_accept_plain_and_labeled_enumerations() {
        let restrictions: Restrictions = serde_json::from_str(
            r#"{ "enumerations": ["a", { "label": "Bee", "value": "b" }], "maxLength": 250 }"#,
        )
        .unwrap();

        let values: Vec<_> = restrictions
            .enumerations
            .iter()
            .map(EnumerationValue::value)
            .collect();
        assert_eq!(values, vec!["a", "b"]);
        assert_eq!(restrictions.max_length, Some(250));
    }
}
