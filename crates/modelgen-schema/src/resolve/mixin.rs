use crate::{
    error::FieldOwner,
    prelude::*,
    raw::{RawBatch, RawMixin},
};
use std::collections::BTreeMap;

/// Flattened field set of one mixin, each field tagged with its origin.
pub(crate) type MixinFields = IndexMap<String, Field>;

/// Flatten every mixin in the batch, following includes recursively.
pub(crate) fn resolve_mixins(batch: &RawBatch, errs: &mut ErrorList) -> BTreeMap<String, MixinFields> {
    let mut defs: BTreeMap<&str, &RawMixin> = BTreeMap::new();
    let mut order = Vec::new();
    for mixin in batch.mixins() {
        if defs.contains_key(mixin.name.as_str()) {
            errs.add(ResolveError::DuplicateMixin(mixin.name.clone()));
            continue;
        }
        defs.insert(&mixin.name, mixin);
        order.push(mixin.name.as_str());
    }

    let mut resolved = BTreeMap::new();
    for name in order {
        let mut stack = Vec::new();
        resolve_one(name, &defs, &mut resolved, &mut stack, errs);
    }

    resolved
}

fn resolve_one<'a>(
    name: &'a str,
    defs: &BTreeMap<&'a str, &'a RawMixin>,
    resolved: &mut BTreeMap<String, MixinFields>,
    stack: &mut Vec<&'a str>,
    errs: &mut ErrorList,
) {
    if resolved.contains_key(name) {
        return;
    }
    let Some(&mixin) = defs.get(name) else {
        return;
    };

    stack.push(name);
    let owner = FieldOwner::Mixin(mixin.name.clone());
    let mut fields = MixinFields::new();
    let declared = mixin
        .fields
        .iter()
        .map(|field| Field::from_raw(field, FieldSource::Mixin(mixin.name.clone())));
    merge_fields(&owner, declared, &mut fields, errs);

    for include in &mixin.includes {
        if let Some(pos) = stack.iter().position(|entry| entry == include) {
            let mut path: Vec<String> = stack[pos..].iter().map(ToString::to_string).collect();
            path.push(include.clone());
            errs.add(ResolveError::MixinCycle { path });
            continue;
        }
        if !defs.contains_key(include.as_str()) {
            errs.add(ResolveError::MixinNotFound {
                owner: owner.clone(),
                include: include.clone(),
            });
            continue;
        }

        resolve_one(include.as_str(), defs, resolved, stack, errs);
        if let Some(included) = resolved.get(include.as_str()) {
            merge_fields(&owner, included.values().cloned(), &mut fields, errs);
        }
    }
    stack.pop();

    resolved.insert(mixin.name.clone(), fields);
}

/// Append fields to `into`, reporting a duplicate instead of replacing.
///
/// A field reached twice through the same mixin (a diamond include) is
/// merged once and is not a duplicate.
pub(crate) fn merge_fields(
    owner: &FieldOwner,
    fields: impl IntoIterator<Item = Field>,
    into: &mut MixinFields,
    errs: &mut ErrorList,
) {
    for field in fields {
        if let Some(existing) = into.get(&field.name) {
            if matches!(field.source, FieldSource::Mixin(_)) && existing.source == field.source {
                continue;
            }
            errs.add(ResolveError::DuplicateField {
                owner: owner.clone(),
                field: field.name.clone(),
                first: existing.source.clone(),
                second: field.source,
            });
            continue;
        }
        into.insert(field.name.clone(), field);
    }
}
