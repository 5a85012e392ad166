use super::{
    mixin::{MixinFields, merge_fields},
    registry::ClassArena,
};
use crate::{error::FieldOwner, prelude::*, raw::RawClass};
use std::collections::BTreeMap;

/// Merge each class's declared fields with its mixins and resolve its key groups.
pub(crate) fn load_own_fields(
    arena: &mut ClassArena,
    declared: &[(ClassId, &RawClass)],
    mixins: &BTreeMap<String, MixinFields>,
    errs: &mut ErrorList,
    warnings: &mut Vec<String>,
) {
    for &(id, raw) in declared {
        let owner = FieldOwner::Class(raw.name.clone());
        let mut fields = MixinFields::new();

        let own = raw
            .fields
            .iter()
            .map(|field| Field::from_raw(field, FieldSource::Declared));
        merge_fields(&owner, own, &mut fields, errs);

        for include in &raw.includes {
            match mixins.get(include) {
                Some(mixin) => merge_fields(&owner, mixin.values().cloned(), &mut fields, errs),
                None => errs.add(ResolveError::MixinNotFound {
                    owner: owner.clone(),
                    include: include.clone(),
                }),
            }
        }

        let class = arena.get_mut(id);
        class.own_fields = fields
            .into_iter()
            .map(|(name, field)| (name, Arc::new(field)))
            .collect();

        load_keys(class, raw, errs, warnings);
    }
}

fn load_keys(class: &mut Class, raw: &RawClass, errs: &mut ErrorList, warnings: &mut Vec<String>) {
    if !raw.primary_key.is_empty()
        && let Some(key) = resolve_key(class, &raw.primary_key, errs)
    {
        class.push_key(key);
    }

    let flagged = raw.fields.iter().filter(|field| field.key).map(|field| &field.name);

    for name in flagged.chain(&raw.key_field_names) {
        if let Some(key) = resolve_key(class, std::slice::from_ref(name), errs) {
            class.push_key(key);
        }
    }

    for group in raw.combined_keys.iter().chain(&raw.keys) {
        if group.is_empty() {
            let warning = format!("class '{}': skipping empty combined key", class.name);
            tracing::warn!(class = %class.name, "skipping empty combined key");
            warnings.push(warning);
            continue;
        }
        if let Some(key) = resolve_key(class, group, errs) {
            class.push_key(key);
        }
    }
}

// Every name must resolve to an own field, otherwise the group is dropped.
fn resolve_key(class: &Class, names: &[String], errs: &mut ErrorList) -> Option<Key> {
    let mut fields = Vec::with_capacity(names.len());
    let mut complete = true;

    for name in names {
        match class.own_fields.get(name) {
            Some(field) => fields.push(Arc::clone(field)),
            None => {
                errs.add(ResolveError::KeyFieldNotFound {
                    class: class.name.clone(),
                    field: name.clone(),
                });
                complete = false;
            }
        }
    }

    complete.then(|| Key::new(fields))
}
