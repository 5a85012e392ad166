use super::registry::ClassArena;
use crate::{prelude::*, raw::RawClass};
use std::collections::BTreeMap;

/// Resolve declared base classes into `super` edges.
pub(crate) fn link_bases(arena: &mut ClassArena, declared: &[(ClassId, &RawClass)], errs: &mut ErrorList) {
    for &(id, raw) in declared {
        let Some(base) = raw.base.as_deref().filter(|base| !base.is_empty()) else {
            continue;
        };

        match arena.find(base) {
            Some(super_id) => arena.get_mut(id).super_class = Some(super_id),
            None => errs.add(ResolveError::BaseNotFound {
                class: raw.name.clone(),
                base: base.to_string(),
            }),
        }
    }
}

/// Report every `super` cycle once and cut it at the class that closes it.
pub(crate) fn break_cycles(arena: &mut ClassArena, errs: &mut ErrorList) {
    let mut done = vec![false; arena.len()];
    let mut on_path = vec![false; arena.len()];

    for start in arena.ids() {
        let mut path = Vec::new();
        let mut cursor = Some(start);

        while let Some(id) = cursor {
            if done[id.index()] {
                break;
            }
            if on_path[id.index()] {
                let pos = path.iter().position(|&member| member == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[pos..]
                    .iter()
                    .map(|&member| arena.get(member).name.clone())
                    .collect();
                cycle.push(arena.get(id).name.clone());
                errs.add(ResolveError::InheritanceCycle { cycle });

                if let Some(&closing) = path.last() {
                    arena.get_mut(closing).super_class = None;
                }
                break;
            }

            on_path[id.index()] = true;
            path.push(id);
            cursor = arena.get(id).super_class;
        }

        for id in path {
            on_path[id.index()] = false;
            done[id.index()] = true;
        }
    }
}

/// Give every hierarchy root an `id: objectId` field unless it declares one.
pub(crate) fn assign_identity(arena: &mut ClassArena, errs: &mut ErrorList) {
    for id in arena.ids() {
        let class = arena.get_mut(id);
        if class.super_class.is_some() {
            continue;
        }

        match class.own_fields.get(Field::IDENTITY) {
            Some(field) if !field.is_identity() => errs.add(ResolveError::IdentityTypeConflict {
                class: class.name.clone(),
                found: field.type_label(),
            }),
            Some(_) => {}
            None => {
                class.own_fields.shift_insert(
                    0,
                    Field::IDENTITY.to_string(),
                    Arc::new(Field::identity()),
                );
            }
        }
    }
}

/// Build each class's visible field map, root class first.
pub(crate) fn flatten_fields(arena: &mut ClassArena, errs: &mut ErrorList) {
    for id in arena.ids() {
        let mut chain: Vec<ClassId> = arena.chain(id).collect();
        chain.reverse();

        let mut fields = FieldMap::new();
        let mut origin: BTreeMap<&str, ClassId> = BTreeMap::new();

        for &member in &chain {
            for (name, field) in &arena.get(member).own_fields {
                let Some(existing) = fields.get(name) else {
                    fields.insert(name.clone(), Arc::clone(field));
                    origin.insert(name, member);
                    continue;
                };

                // the ancestor's field wins; a shape mismatch is reported
                // by the class that redeclares it
                if member == id && !existing.same_shape(field) {
                    let ancestor = origin.get(name.as_str()).copied().unwrap_or(member);
                    errs.add(ResolveError::InheritedFieldConflict {
                        class: arena.get(id).name.clone(),
                        field: name.clone(),
                        ancestor: arena.get(ancestor).name.clone(),
                        expected: existing.type_label(),
                        found: field.type_label(),
                    });
                }
            }
        }

        arena.get_mut(id).fields = fields;
    }
}

/// Record direct and transitive children on every ancestor.
pub(crate) fn link_children(arena: &mut ClassArena) {
    for id in arena.ids() {
        let ancestors: Vec<ClassId> = arena.ancestors(id).collect();

        if let Some(&parent) = ancestors.first() {
            arena.get_mut(parent).own_children.push(id);
        }
        for ancestor in ancestors {
            arena.get_mut(ancestor).children.push(id);
        }
    }
}
