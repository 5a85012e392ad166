use super::ClassRef;
use crate::{error::AssociationQueryError, prelude::*};

fn kind_allowed(kinds: &[AssociationKind], kind: AssociationKind) -> bool {
    kinds.is_empty() || kinds.contains(&kind)
}

impl<'a> ClassRef<'a> {
    /// Own associations followed by inherited ones, nearest class first.
    pub fn associations(&self) -> impl Iterator<Item = &'a Association> + use<'a> {
        self.chain()
            .flat_map(|member| member.class().own_associations().iter())
    }

    /// Associations whose declared target `target` can stand in for.
    pub fn associations_by_target(
        &self,
        target: ClassRef<'a>,
    ) -> impl Iterator<Item = &'a Association> + use<'a> {
        let registry = self.registry();

        self.associations()
            .filter(move |assoc| target.is_assignable_to(&assoc.target(registry)))
    }

    /// Associations of the given kinds; an empty slice selects every kind.
    pub fn associations_by_kinds<'k>(
        &self,
        kinds: &'k [AssociationKind],
    ) -> impl Iterator<Item = &'a Association> + use<'a, 'k> {
        self.associations()
            .filter(move |assoc| kind_allowed(kinds, assoc.kind))
    }

    /// Find the single association to `target` among `kinds`.
    ///
    /// Candidates are first those whose declared target `target` is
    /// assignable to. When there are none, associations whose declared target
    /// is `target` or one of its subclasses are tried instead. A non-empty
    /// `key` then selects by exact foreign-key or association name; an empty `key` requires
    /// the candidate set to already be a single association.
    pub fn get_association(
        &self,
        target: ClassRef<'_>,
        key: &str,
        kinds: &[AssociationKind],
    ) -> Result<&'a Association, AssociationQueryError> {
        let registry = self.registry();

        let mut candidates: Vec<&'a Association> = self
            .associations_by_kinds(kinds)
            .filter(|assoc| target.is_assignable_to(&assoc.target(registry)))
            .collect();

        if candidates.is_empty() {
            candidates = self
                .associations_by_kinds(kinds)
                .filter(|assoc| assoc.target(registry).is_assignable_to(&target))
                .collect();
        }

        if !key.is_empty() {
            candidates.retain(|assoc| assoc.matches_key(key));
        }

        match candidates.as_slice() {
            [] => Err(AssociationQueryError::NoSuchAssociation {
                class: self.name().to_string(),
                target: target.name().to_string(),
                kinds: query_kinds(kinds),
                key: key.to_string(),
            }),
            [single] => Ok(*single),
            many => Err(AssociationQueryError::Ambiguous {
                class: self.name().to_string(),
                target: target.name().to_string(),
                kinds: query_kinds(kinds),
                key: key.to_string(),
                candidates: many
                    .iter()
                    .map(|assoc| {
                        format!(
                            "{} {} ({})",
                            assoc.kind,
                            assoc.target(registry).name(),
                            assoc.foreign_key
                        )
                    })
                    .collect(),
            }),
        }
    }
}

fn query_kinds(kinds: &[AssociationKind]) -> Vec<AssociationKind> {
    if kinds.is_empty() {
        AssociationKind::ALL.to_vec()
    } else {
        kinds.to_vec()
    }
}
