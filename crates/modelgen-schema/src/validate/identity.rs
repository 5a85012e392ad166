use crate::{prelude::*, resolve::registry::ClassArena};

// Every concrete class must see an identity field. Its type is checked when
// the identity is assigned to the hierarchy root.
pub(crate) fn validate_identity(arena: &ClassArena, errs: &mut ErrorList) {
    for class in arena.iter().filter(|class| !class.is_abstract) {
        if !class.fields.contains_key(Field::IDENTITY) {
            errs.add(ResolveError::MissingIdentity(class.name.clone()));
        }
    }
}
