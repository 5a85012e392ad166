use crate::{prelude::*, resolve::registry::ClassArena};
use std::collections::{BTreeMap, BTreeSet};

/// Topmost class reachable from `id` without leaving its storage name.
pub(crate) fn storage_root(arena: &ClassArena, id: ClassId) -> ClassId {
    let storage = &arena.get(id).storage_name;

    arena
        .chain(id)
        .take_while(|&member| arena.get(member).storage_name == *storage)
        .last()
        .unwrap_or(id)
}

// Classes sharing a storage name must all collapse onto one root.
pub(crate) fn validate_storage_groups(arena: &ClassArena, errs: &mut ErrorList) {
    let mut roots: BTreeMap<&str, ClassId> = BTreeMap::new();
    let mut reported = BTreeSet::new();

    for class in arena.iter() {
        let root = storage_root(arena, class.id);

        match roots.get(class.storage_name.as_str()) {
            None => {
                roots.insert(&class.storage_name, root);
            }
            Some(&first) if first != root && reported.insert((first, root)) => {
                errs.add(ResolveError::StorageConflict {
                    storage: class.storage_name.clone(),
                    first: arena.get(first).name.clone(),
                    second: arena.get(root).name.clone(),
                });
            }
            Some(_) => {}
        }
    }
}
