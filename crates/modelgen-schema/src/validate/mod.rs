//! Post-resolution consistency checks over the finished arena.

mod identity;
mod storage;

pub(crate) use storage::storage_root;

use crate::{error::ErrorList, resolve::registry::ClassArena};

/// Run the final checks in a fixed order.
pub(crate) fn validate_arena(arena: &ClassArena, errs: &mut ErrorList) {
    // Phase 1: per-class invariants.
    identity::validate_identity(arena, errs);

    // Phase 2: classes that share physical storage.
    storage::validate_storage_groups(arena, errs);
}
