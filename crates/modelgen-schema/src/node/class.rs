use crate::prelude::*;
use derive_more::Display;
use std::fmt;

///
/// ClassId
///
/// Arena index of a class. Only meaningful for the registry that issued it.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

///
/// Key
///
/// One candidate uniqueness key: a group of one or more fields.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Key {
    pub fields: Vec<Arc<Field>>,
}

impl Key {
    #[must_use]
    pub const fn new(fields: Vec<Arc<Field>>) -> Self {
        Self { fields }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    #[must_use]
    pub const fn is_combined(&self) -> bool {
        self.fields.len() > 1
    }

    fn same_names(&self, other: &Self) -> bool {
        self.names().eq(other.names())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names().collect::<Vec<_>>().join(", ");

        write!(f, "({names})")
    }
}

///
/// Class
///
/// One entity definition. Graph edges (`super_class`, children,
/// association targets) are arena indices; use `ClassRef` to follow them.
///

#[derive(Clone, Debug, Serialize)]
pub struct Class {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) normalized_name: String,
    pub(crate) storage_name: String,
    pub(crate) is_abstract: bool,
    pub(crate) own_fields: FieldMap,
    pub(crate) fields: FieldMap,
    pub(crate) keys: Vec<Key>,
    pub(crate) super_class: Option<ClassId>,
    pub(crate) own_children: Vec<ClassId>,
    pub(crate) children: Vec<ClassId>,
    pub(crate) associations: Vec<Association>,

    #[serde(skip_serializing_if = "Labels::is_empty")]
    pub(crate) labels: Labels,

    #[serde(skip_serializing_if = "Annotations::is_empty")]
    pub(crate) annotations: Annotations,
}

impl Class {
    pub(crate) fn new(
        id: ClassId,
        name: &str,
        normalized_name: String,
        storage_name: String,
        is_abstract: bool,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            normalized_name,
            storage_name,
            is_abstract,
            own_fields: FieldMap::new(),
            fields: FieldMap::new(),
            keys: Vec::new(),
            super_class: None,
            own_children: Vec::new(),
            children: Vec::new(),
            associations: Vec::new(),
            labels: Labels::default(),
            annotations: Annotations::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ClassId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underscore form of the class name.
    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Physical storage grouping (table name) after single-table-inheritance collapse.
    #[must_use]
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[must_use]
    pub const fn super_id(&self) -> Option<ClassId> {
        self.super_class
    }

    /// Field declared on this class, directly, via a mixin, or synthesized.
    #[must_use]
    pub fn get_own_property(&self, name: &str) -> Option<&Arc<Field>> {
        self.own_fields.get(name)
    }

    /// Field visible on this class, own or inherited.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Arc<Field>> {
        self.fields.get(name)
    }

    pub fn own_properties(&self) -> impl Iterator<Item = &Arc<Field>> {
        self.own_fields.values()
    }

    /// Own and inherited fields, root class first.
    pub fn properties(&self) -> impl Iterator<Item = &Arc<Field>> {
        self.fields.values()
    }

    /// Key groups declared on this class only.
    #[must_use]
    pub fn own_keys(&self) -> &[Key] {
        &self.keys
    }

    /// Associations declared on this class only.
    #[must_use]
    pub fn own_associations(&self) -> &[Association] {
        &self.associations
    }

    /// Display labels used by generated views.
    #[must_use]
    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    #[must_use]
    pub const fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    // Append a key group unless an identical one is already present.
    pub(crate) fn push_key(&mut self, key: Key) {
        if !self.keys.iter().any(|existing| existing.same_names(&key)) {
            self.keys.push(key);
        }
    }
}

///
/// Labels
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Labels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
}

impl Labels {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.label.is_none() && self.index.is_none() && self.new.is_none() && self.edit.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Arc<Field> {
        Arc::new(Field {
            name: name.to_string(),
            ..Field::foreign_key(name)
        })
    }

    #[test]
    fn key_display_lists_field_names() {
        let key = Key::new(vec![field("tenant_id"), field("code")]);

        assert_eq!(key.to_string(), "(tenant_id, code)");
        assert!(key.is_combined());
    }

    #[test]
    fn push_key_skips_identical_groups() {
        let mut class = Class::new(
            ClassId::new(0),
            "Post",
            "post".into(),
            "tpt_posts".into(),
            false,
        );
        class.push_key(Key::new(vec![field("slug")]));
        class.push_key(Key::new(vec![field("slug")]));
        class.push_key(Key::new(vec![field("slug"), field("lang")]));

        assert_eq!(class.own_keys().len(), 2);
    }
}
