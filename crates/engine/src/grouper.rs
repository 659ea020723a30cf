use rustc_hash::FxHashMap;

use crate::model::{HouseholdKey, MemberIdentity};

/// Grouping key for one member: (batch, house number), or a synthetic
/// per-member key when the house number is empty so houseless records never
/// merge with anything.
pub fn household_key(member: &MemberIdentity) -> HouseholdKey {
    let house = if member.house_no.is_empty() {
        format!("#{}", member.id.0)
    } else {
        member.house_no.clone()
    };
    HouseholdKey {
        batch: member.batch.clone(),
        house,
    }
}

/// Partition members into households.
///
/// Keys appear in first-seen order; within each group members are sorted by
/// descending age with the original roll order preserved on ties. Pure
/// partition: every input member lands in exactly one group, and the same
/// identity data always produces the same groups.
pub fn group_households(members: &[MemberIdentity]) -> Vec<(HouseholdKey, Vec<MemberIdentity>)> {
    let mut order: Vec<HouseholdKey> = Vec::new();
    let mut buckets: FxHashMap<HouseholdKey, Vec<MemberIdentity>> = FxHashMap::default();

    for member in members {
        let key = household_key(member);
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(member.clone());
    }

    order
        .into_iter()
        .map(|key| {
            let mut group = buckets.remove(&key).unwrap_or_default();
            // Vec::sort_by is stable: equal ages keep their roll order
            group.sort_by(|a, b| b.age.cmp(&a.age));
            (key, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, MemberId, RelationType};

    fn member(id: u64, name: &str, age: u32, house: &str, batch: &str) -> MemberIdentity {
        MemberIdentity {
            id: MemberId(id),
            name: name.into(),
            relation_name: String::new(),
            relation: RelationType::SonOf,
            age,
            gender: Gender::Unknown,
            house_no: house.into(),
            voter_id: format!("TN{id:07}"),
            batch: batch.into(),
        }
    }

    #[test]
    fn groups_by_batch_and_house() {
        let members = vec![
            member(1, "A", 40, "12", "P1"),
            member(2, "B", 70, "12", "P1"),
            member(3, "C", 30, "13", "P1"),
            member(4, "D", 55, "12", "P2"),
        ];
        let groups = group_households(&members);
        assert_eq!(groups.len(), 3);

        // First-seen key order
        assert_eq!(groups[0].0.to_string(), "P1/12");
        assert_eq!(groups[1].0.to_string(), "P1/13");
        assert_eq!(groups[2].0.to_string(), "P2/12");

        // Age-descending within the household
        let ids: Vec<u64> = groups[0].1.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn houseless_records_stay_singletons() {
        let members = vec![
            member(1, "A", 40, "", "P1"),
            member(2, "B", 50, "", "P1"),
        ];
        let groups = group_households(&members);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.house, "#1");
        assert_eq!(groups[1].0.house, "#2");
    }

    #[test]
    fn equal_ages_keep_roll_order() {
        let members = vec![
            member(1, "A", 35, "9", "P1"),
            member(2, "B", 35, "9", "P1"),
            member(3, "C", 35, "9", "P1"),
        ];
        let groups = group_households(&members);
        let ids: Vec<u64> = groups[0].1.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn partition_is_complete_and_idempotent() {
        let members = vec![
            member(1, "A", 62, "4", "P1"),
            member(2, "B", 35, "", "P1"),
            member(3, "C", 33, "4", "P1"),
            member(4, "D", 28, "5/1", "P2"),
        ];
        let first = group_households(&members);
        let second = group_households(&members);

        let total: usize = first.iter().map(|(_, g)| g.len()).sum();
        assert_eq!(total, members.len());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.0, b.0);
            assert_eq!(a.1, b.1);
        }
    }
}
