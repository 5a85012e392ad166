use super::registry::ClassArena;
use crate::prelude::*;

/// Whether a class takes part in single-table inheritance: it sees a `type`
/// discriminator and is linked into a hierarchy.
pub(crate) fn is_sti(class: &Class) -> bool {
    class.fields.contains_key(Field::DISCRIMINATOR)
        && (class.super_class.is_some() || !class.own_children.is_empty())
}

/// Point every single-table class at the storage of the top of its
/// contiguous single-table chain.
pub(crate) fn collapse_storage(arena: &mut ClassArena, errs: &mut ErrorList) {
    let sti: Vec<bool> = arena.iter().map(is_sti).collect();
    let declared: Vec<String> = arena.iter().map(|c| c.storage_name.clone()).collect();

    for id in arena.ids() {
        if !sti[id.index()] {
            if let Some(ancestor) = arena.ancestors(id).find(|a| sti[a.index()]) {
                errs.add(ResolveError::StiBreak {
                    class: arena.get(id).name.clone(),
                    ancestor: arena.get(ancestor).name.clone(),
                });
            }
            continue;
        }

        let mut storage = &declared[id.index()];
        let mut cursor = id;
        while sti[cursor.index()] {
            let Some(parent) = arena.get(cursor).super_class else {
                break;
            };
            storage = &declared[parent.index()];
            cursor = parent;
        }

        arena.get_mut(id).storage_name.clone_from(storage);
    }
}
