use rustc_hash::FxHashSet;

use crate::model::MemberIdentity;

/// Drop records whose non-empty voter id has already been seen, keeping the
/// first occurrence. Records without a voter id are never deduplicated;
/// there is nothing safe to match them on. Order-preserving, single pass.
pub fn dedup_members(members: Vec<MemberIdentity>) -> Vec<MemberIdentity> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    members
        .into_iter()
        .filter(|m| m.voter_id.is_empty() || seen.insert(m.voter_id.clone()))
        .collect()
}
