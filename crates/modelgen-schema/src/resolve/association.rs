use super::registry::ClassArena;
use crate::{
    prelude::*,
    raw::{RawBelongsTo, RawClass, RawHasAndBelongsToMany, RawHasMany},
};

/// Resolve every declared association and synthesize the foreign-key
/// fields it implies.
pub(crate) fn resolve_associations(
    arena: &mut ClassArena,
    declared: &[(ClassId, &RawClass)],
    errs: &mut ErrorList,
) {
    let mut linker = Linker { arena, errs };

    for &(owner, raw) in declared {
        for assoc in &raw.belongs_to {
            linker.belongs_to(owner, assoc);
        }
        for assoc in &raw.has_many {
            linker.has(owner, assoc, AssociationKind::HasMany);
        }
        for assoc in &raw.has_one {
            linker.has(owner, assoc, AssociationKind::HasOne);
        }
        for assoc in &raw.has_and_belongs_to_many {
            linker.has_and_belongs_to_many(owner, assoc);
        }
    }
}

// Treat an empty name the same as an absent one.
fn explicit(name: Option<&String>) -> Option<&str> {
    name.map(String::as_str).filter(|name| !name.is_empty())
}

///
/// Linker
///

struct Linker<'a> {
    arena: &'a mut ClassArena,
    errs: &'a mut ErrorList,
}

impl Linker<'_> {
    fn belongs_to(&mut self, owner: ClassId, raw: &RawBelongsTo) {
        let kind = AssociationKind::BelongsTo;
        let Some(target) = self.target(owner, &raw.target, kind) else {
            return;
        };

        let foreign_key = match explicit(raw.name.as_ref()) {
            Some(name) => name.to_string(),
            None => format!("{}_id", self.arena.get(target).normalized_name),
        };

        let site = Site {
            owner,
            target: &raw.target,
            kind,
        };
        if self.ensure_field(&site, owner, Field::foreign_key(&foreign_key)) {
            self.record(owner, Association::new(kind, target, foreign_key));
        }
    }

    fn has(&mut self, owner: ClassId, raw: &RawHasMany, kind: AssociationKind) {
        let Some(target) = self.target(owner, &raw.target, kind) else {
            return;
        };
        let site = Site {
            owner,
            target: &raw.target,
            kind,
        };

        if raw.polymorphic {
            if let Some(name) = explicit(raw.foreign_key.as_ref()) {
                self.errs.add(ResolveError::PolymorphicForeignKey {
                    class: self.arena.get(owner).name.clone(),
                    target: raw.target.clone(),
                    kind,
                    foreign_key: name.to_string(),
                });
                return;
            }

            let id_ok = self.ensure_field(&site, target, Field::foreign_key(Field::PARENT_ID));
            let type_ok = self.ensure_field(&site, target, Field::type_tag(Field::PARENT_TYPE));
            if id_ok && type_ok {
                let assoc = Association {
                    name: raw.name.clone(),
                    polymorphic: true,
                    ..Association::new(kind, target, Field::PARENT_ID.to_string())
                };
                self.record(owner, assoc);
            }
            return;
        }

        let foreign_key = match explicit(raw.foreign_key.as_ref()) {
            Some(name) => name.to_string(),
            None => format!("{}_id", self.arena.get(owner).normalized_name),
        };
        if self.ensure_field(&site, target, Field::foreign_key(&foreign_key)) {
            let assoc = Association {
                name: raw.name.clone(),
                ..Association::new(kind, target, foreign_key)
            };
            self.record(owner, assoc);
        }
    }

    fn has_and_belongs_to_many(&mut self, owner: ClassId, raw: &RawHasAndBelongsToMany) {
        let kind = AssociationKind::HasAndBelongsToMany;
        let target = self.target(owner, &raw.target, kind);

        let through_name = explicit(raw.through.as_ref()).unwrap_or_default();
        let through = self.arena.find(through_name);
        if through.is_none() {
            self.errs.add(ResolveError::ThroughNotFound {
                class: self.arena.get(owner).name.clone(),
                target: raw.target.clone(),
                through: through_name.to_string(),
            });
        }

        let (Some(target), Some(through)) = (target, through) else {
            return;
        };
        let foreign_key = match explicit(raw.foreign_key.as_ref()) {
            Some(name) => name.to_string(),
            None => format!("{}_id", self.arena.get(owner).normalized_name),
        };

        let assoc = Association {
            through: Some(through),
            ..Association::new(kind, target, foreign_key)
        };
        self.record(owner, assoc);
    }

    fn target(&mut self, owner: ClassId, name: &str, kind: AssociationKind) -> Option<ClassId> {
        let found = self.arena.find(name);
        if found.is_none() {
            self.errs.add(ResolveError::AssociationTargetNotFound {
                class: self.arena.get(owner).name.clone(),
                target: name.to_string(),
                kind,
            });
        }

        found
    }

    // Accept a visible field of the expected shape or synthesize it on `holder`.
    fn ensure_field(&mut self, site: &Site<'_>, holder: ClassId, expected: Field) -> bool {
        let visible = self
            .arena
            .chain(holder)
            .find_map(|id| self.arena.get(id).own_fields.get(&expected.name));

        match visible {
            Some(field) if field.is_scalar(expected.ty) => true,
            Some(field) => {
                let found = field.type_label();
                self.errs.add(ResolveError::FieldTypeConflict {
                    class: self.arena.get(site.owner).name.clone(),
                    target: site.target.to_string(),
                    kind: site.kind,
                    holder: self.arena.get(holder).name.clone(),
                    field: expected.name.clone(),
                    expected: expected.type_label(),
                    found,
                });
                false
            }
            None => {
                self.arena
                    .get_mut(holder)
                    .own_fields
                    .insert(expected.name.clone(), Arc::new(expected));
                true
            }
        }
    }

    fn record(&mut self, owner: ClassId, assoc: Association) {
        self.arena.get_mut(owner).associations.push(assoc);
    }
}

///
/// Site
///
/// Where an association was declared, for diagnostics.
///

struct Site<'a> {
    owner: ClassId,
    target: &'a str,
    kind: AssociationKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ResolveConfig, raw::RawField, resolve::inherit::link_bases};

    fn resolve(classes: &[RawClass]) -> (ClassArena, ErrorList) {
        let config = ResolveConfig::default();
        let mut arena = ClassArena::new();
        let mut errs = ErrorList::new();
        let mut declared = Vec::new();

        for raw in classes {
            let id = arena.register(raw, &config).unwrap();
            arena.get_mut(id).own_fields = raw
                .fields
                .iter()
                .map(|f| (f.name.clone(), Arc::new(Field::from_raw(f, FieldSource::Declared))))
                .collect();
            declared.push((id, raw));
        }
        link_bases(&mut arena, &declared, &mut errs);
        resolve_associations(&mut arena, &declared, &mut errs);

        (arena, errs)
    }

    fn own(arena: &ClassArena, class: &str, field: &str) -> Option<Arc<Field>> {
        let id = arena.find(class)?;
        arena.get(id).get_own_property(field).cloned()
    }

    #[test]
    fn belongs_to_synthesizes_key_on_owner() {
        let (arena, errs) = resolve(&[
            RawClass::new("BlogPost"),
            RawClass::new("Comment").belongs_to(RawBelongsTo::new("BlogPost")),
        ]);

        assert!(errs.is_empty());
        let key = own(&arena, "Comment", "blog_post_id").unwrap();
        assert!(key.is_scalar(FieldType::ObjectId));
        assert_eq!(key.source, FieldSource::ForeignKey);
        assert!(own(&arena, "BlogPost", "blog_post_id").is_none());
    }

    #[test]
    fn has_many_synthesizes_key_on_target() {
        let (arena, errs) = resolve(&[
            RawClass::new("Post").has_many(RawHasMany::new("Comment")),
            RawClass::new("Comment"),
        ]);

        assert!(errs.is_empty());
        assert!(own(&arena, "Comment", "post_id").is_some());
        let post = arena.get(arena.find("Post").unwrap());
        assert_eq!(post.own_associations()[0].foreign_key, "post_id");
        assert_eq!(post.own_associations()[0].name, None);
    }

    #[test]
    fn has_many_keeps_declared_name() {
        let (arena, errs) = resolve(&[
            RawClass::new("Post").has_many(RawHasMany::new("Comment").named("replies")),
            RawClass::new("Comment"),
        ]);

        assert!(errs.is_empty());
        let post = arena.get(arena.find("Post").unwrap());
        let assoc = &post.own_associations()[0];
        assert_eq!(assoc.name.as_deref(), Some("replies"));
        assert!(assoc.matches_key("replies") && assoc.matches_key("post_id"));
    }

    #[test]
    fn polymorphic_has_many_adds_parent_fields() {
        let (arena, errs) = resolve(&[
            RawClass::new("Image").has_many(RawHasMany::new("Tag").polymorphic()),
            RawClass::new("Tag"),
        ]);

        assert!(errs.is_empty());
        assert!(own(&arena, "Tag", "parent_id").unwrap().is_scalar(FieldType::ObjectId));
        assert!(own(&arena, "Tag", "parent_type").unwrap().is_scalar(FieldType::String));
        let image = arena.get(arena.find("Image").unwrap());
        assert!(image.own_associations()[0].polymorphic);
    }

    #[test]
    fn polymorphic_with_explicit_key_is_rejected() {
        let (arena, errs) = resolve(&[
            RawClass::new("Image").has_one(RawHasMany::new("Tag").polymorphic().foreign_key("owner_id")),
            RawClass::new("Tag"),
        ]);

        assert_eq!(errs.count(ErrorClass::Ambiguity), 1);
        assert!(own(&arena, "Tag", "parent_id").is_none());
    }

    #[test]
    fn existing_key_of_wrong_type_is_a_conflict() {
        let (arena, errs) = resolve(&[
            RawClass::new("Post"),
            RawClass::new("Comment")
                .field(RawField::new("post_id", FieldType::Integer))
                .belongs_to(RawBelongsTo::new("Post")),
        ]);

        assert_eq!(errs.count(ErrorClass::TypeConflict), 1);
        assert!(matches!(
            &errs[0],
            ResolveError::FieldTypeConflict { holder, found, .. } if holder == "Comment" && found == "integer"
        ));
        let comment = arena.get(arena.find("Comment").unwrap());
        assert!(comment.own_associations().is_empty());
    }

    #[test]
    fn inherited_key_satisfies_association() {
        let (arena, errs) = resolve(&[
            RawClass::new("Post"),
            RawClass::new("Content").field(RawField::new("post_id", FieldType::ObjectId)),
            RawClass::new("Comment")
                .base("Content")
                .belongs_to(RawBelongsTo::new("Post")),
        ]);

        assert!(errs.is_empty());
        assert!(own(&arena, "Comment", "post_id").is_none());
    }

    #[test]
    fn habtm_requires_target_and_through() {
        let (arena, errs) = resolve(&[
            RawClass::new("Post")
                .has_and_belongs_to_many(RawHasAndBelongsToMany::new("Label", "PostLabel"))
                .has_and_belongs_to_many(RawHasAndBelongsToMany::new("Ghost", "Nowhere")),
            RawClass::new("Label"),
            RawClass::new("PostLabel"),
        ]);

        assert_eq!(errs.len(), 2);
        let post = arena.get(arena.find("Post").unwrap());
        let assoc = &post.own_associations()[0];
        assert_eq!(post.own_associations().len(), 1);
        assert_eq!(assoc.foreign_key, "post_id");
        assert_eq!(assoc.through, arena.find("PostLabel"));
        assert!(own(&arena, "Label", "post_id").is_none());
    }

    fn assert_single_conflict(arena: &ClassArena, errs: &ErrorList, owner: &str, field: &str) {
        assert_eq!(errs.len(), 1, "{errs}");
        assert_eq!(errs.count(ErrorClass::TypeConflict), 1);
        assert!(matches!(
            &errs[0],
            ResolveError::FieldTypeConflict { field: name, .. } if name == field
        ));
        let owner = arena.get(arena.find(owner).unwrap());
        assert!(owner.own_associations().is_empty());
    }

    #[test]
    fn polymorphic_type_tag_must_be_scalar_string() {
        let declared = [
            RawField::new("parent_type", FieldType::Integer),
            RawField::new("parent_type", FieldType::String).array(),
        ];

        for field in declared {
            let (arena, errs) = resolve(&[
                RawClass::new("Image").has_many(RawHasMany::new("Tag").polymorphic()),
                RawClass::new("Tag").field(field),
            ]);

            assert_single_conflict(&arena, &errs, "Image", "parent_type");
        }
    }

    #[test]
    fn polymorphic_parent_id_must_be_object_id() {
        let (arena, errs) = resolve(&[
            RawClass::new("Image").has_one(RawHasMany::new("Tag").polymorphic()),
            RawClass::new("Tag").field(RawField::new("parent_id", FieldType::String)),
        ]);

        assert_single_conflict(&arena, &errs, "Image", "parent_id");
    }

    #[test]
    fn has_many_key_on_target_of_wrong_type_is_a_conflict() {
        let (arena, errs) = resolve(&[
            RawClass::new("Post").has_many(RawHasMany::new("Comment")),
            RawClass::new("Comment").field(RawField::new("post_id", FieldType::Integer)),
        ]);

        assert_single_conflict(&arena, &errs, "Post", "post_id");
        assert!(matches!(
            &errs[0],
            ResolveError::FieldTypeConflict { holder, .. } if holder == "Comment"
        ));
    }

    #[test]
    fn has_one_collection_key_on_target_is_a_conflict() {
        let (arena, errs) = resolve(&[
            RawClass::new("User").has_one(RawHasMany::new("Profile").foreign_key("owner_id")),
            RawClass::new("Profile").field(RawField::new("owner_id", FieldType::ObjectId).array()),
        ]);

        assert_single_conflict(&arena, &errs, "User", "owner_id");
        assert!(errs.to_string().contains("[objectId]"));
    }
}
