/// Post-composition validation of the merged member set.
use crate::error::{ForgeError, Result};
use crate::model::{Contribution, Member};
use tracing::debug;

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Members in first-occurrence order, duplicates removed.
    pub members: Vec<Contribution>,
    /// Number of textually identical contributions that were dropped.
    pub duplicates: usize,
}

/// Detects conflicting same-named members.
///
/// Members are keyed by kind and name. A repeated member is dropped when it is
/// textually identical to an earlier one. A same-named member from the same
/// trait whose parameter types differ is an overload. Anything else,
/// including methods differing only in return type or modifiers, is a collision.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver<'a> {
    stencil: &'a str,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(stencil: &'a str) -> Self {
        Self { stencil }
    }

    /// Resolves `contributions` against each other and against `reserved`
    /// members, which are checked but never emitted.
    pub fn resolve(
        &self,
        contributions: Vec<Contribution>,
        reserved: &[Contribution],
    ) -> Result<Resolution> {
        let mut members: Vec<Contribution> = Vec::with_capacity(contributions.len());
        let mut duplicates = 0;

        for candidate in contributions {
            let mut duplicate = false;

            for existing in reserved.iter().chain(members.iter()) {
                if existing.member.kind() != candidate.member.kind()
                    || existing.member.name() != candidate.member.name()
                {
                    continue;
                }

                if existing.member == candidate.member {
                    duplicate = true;
                    continue;
                }

                let overload = match (&existing.member, &candidate.member) {
                    (Member::Method(a), Member::Method(b)) => {
                        existing.origin == candidate.origin && a.overload_key() != b.overload_key()
                    }
                    _ => false,
                };
                if !overload {
                    return Err(ForgeError::Collision {
                        stencil: self.stencil.to_string(),
                        member: candidate.member.name().to_string(),
                        first: existing.origin.clone(),
                        second: candidate.origin.clone(),
                    });
                }
            }

            if duplicate {
                debug!(
                    stencil = self.stencil,
                    member = candidate.member.name(),
                    origin = %candidate.origin,
                    "dropping duplicate member"
                );
                duplicates += 1;
            } else {
                members.push(candidate);
            }
        }

        Ok(Resolution {
            members,
            duplicates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeBlock, FieldSpec, MethodSpec, Modifier, Origin, Param};
    use crate::traits::TraitId;

    fn from(name: &str, member: Member) -> Contribution {
        Contribution {
            member,
            origin: Origin::Trait(TraitId::new(name)),
        }
    }

    fn getter(body: &str) -> Member {
        Member::Method(
            MethodSpec::new("getLabel")
                .modifiers(&[Modifier::Public])
                .returns("java.lang.String")
                .body(CodeBlock::statement(body)),
        )
    }

    #[test]
    fn test_identical_members_are_deduplicated() {
        let resolution = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", getter("return label")),
                    from("B", getter("return label")),
                ],
                &[],
            )
            .expect("identical duplicates are tolerated");

        assert_eq!(resolution.members.len(), 1);
        assert_eq!(resolution.duplicates, 1);
        assert_eq!(resolution.members[0].origin, Origin::Trait(TraitId::new("A")));
    }

    #[test]
    fn test_same_signature_different_body_collides() {
        let error = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", getter("return label")),
                    from("B", getter("return \"x\"")),
                ],
                &[],
            )
            .unwrap_err();
        assert!(matches!(error, ForgeError::Collision { .. }));
    }

    #[test]
    fn test_different_signature_across_traits_collides() {
        let error = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", Member::Field(FieldSpec::new("int", "count"))),
                    from("B", Member::Field(FieldSpec::new("long", "count"))),
                ],
                &[],
            )
            .unwrap_err();
        match error {
            ForgeError::Collision {
                stencil,
                member,
                first,
                second,
            } => {
                assert_eq!(stencil, "S");
                assert_eq!(member, "count");
                assert_eq!(first, Origin::Trait(TraitId::new("A")));
                assert_eq!(second, Origin::Trait(TraitId::new("B")));
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn test_overloads_within_one_trait() {
        let one = MethodSpec::new("bind").param(Param::new("int", "id"));
        let two = MethodSpec::new("bind").param(Param::new("java.lang.String", "key"));
        let resolution = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", Member::Method(one)),
                    from("A", Member::Method(two)),
                ],
                &[],
            )
            .expect("overloads from one trait are allowed");
        assert_eq!(resolution.members.len(), 2);
    }

    #[test]
    fn test_same_parameter_types_within_one_trait_collide() {
        let public = MethodSpec::new("bind")
            .modifiers(&[Modifier::Public])
            .param(Param::new("int", "id"));
        let private = MethodSpec::new("bind")
            .modifiers(&[Modifier::Private])
            .returns("int")
            .param(Param::new("int", "other"))
            .body(CodeBlock::statement("return other"));
        let error = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", Member::Method(public)),
                    from("A", Member::Method(private)),
                ],
                &[],
            )
            .unwrap_err();
        match error {
            ForgeError::Collision { member, first, second, .. } => {
                assert_eq!(member, "bind");
                assert_eq!(first, second);
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn test_overloads_across_traits_collide() {
        let one = MethodSpec::new("bind").param(Param::new("int", "id"));
        let two = MethodSpec::new("bind").param(Param::new("java.lang.String", "key"));
        let error = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", Member::Method(one)),
                    from("B", Member::Method(two)),
                ],
                &[],
            )
            .unwrap_err();
        assert!(matches!(error, ForgeError::Collision { .. }));
    }

    #[test]
    fn test_field_and_method_may_share_a_name() {
        let resolution = CollisionResolver::new("S")
            .resolve(
                vec![
                    from("A", Member::Field(FieldSpec::new("int", "tint"))),
                    from("B", Member::Method(MethodSpec::new("tint"))),
                ],
                &[],
            )
            .expect("separate namespaces");
        assert_eq!(resolution.members.len(), 2);
    }

    #[test]
    fn test_reserved_members_block_traits() {
        let reserved = [Contribution {
            member: Member::Method(MethodSpec::new("init").modifiers(&[Modifier::Private])),
            origin: Origin::Stencil,
        }];
        let error = CollisionResolver::new("S")
            .resolve(vec![from("A", Member::Method(MethodSpec::new("init")))], &reserved)
            .unwrap_err();
        assert!(error.origins().contains(&&Origin::Stencil));
    }
}
