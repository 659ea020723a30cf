use crate::config::LinkerConfig;
use crate::model::{MemberIdentity, RelationLink};
use crate::similarity::name_similarity;

/// Infer directed relation edges within one household.
///
/// For each member with a declared relation name, the *first* co-resident in
/// household order whose name clears the similarity threshold becomes the
/// edge source. First-match, not best-match: on well-ordered rolls the real
/// relative is listed before unrelated homonyms, and scanning stops early.
/// A member gets at most one inbound edge (one declaration per record) but
/// may be the source of many.
pub fn link_relations(members: &[MemberIdentity], config: &LinkerConfig) -> Vec<RelationLink> {
    let mut links = Vec::new();

    for member in members {
        if member.relation_name.is_empty() {
            continue;
        }
        let target = members.iter().find(|other| {
            other.id != member.id
                && name_similarity(&other.name, &member.relation_name)
                    >= config.similarity_threshold
        });
        if let Some(other) = target {
            links.push(RelationLink {
                from: other.id,
                to: member.id,
                relation: member.relation,
            });
        }
    }

    links
}
