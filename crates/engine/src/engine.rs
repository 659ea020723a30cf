use crate::anomaly::score_household;
use crate::config::EngineConfig;
use crate::dedup::dedup_members;
use crate::grouper::group_households;
use crate::linker::link_relations;
use crate::model::{Household, MemberIdentity, RollInput, RollMeta, RollResult};
use crate::summary::compute_summary;

/// Dedup, group, link, and score a flat member collection.
///
/// Pure over the identity fields: the same input always yields structurally
/// identical households, so callers can memoize freely (see `cache`).
pub fn compute_households(config: &EngineConfig, members: &[MemberIdentity]) -> Vec<Household> {
    let members = dedup_members(members.to_vec());
    group_households(&members)
        .into_iter()
        .map(|(key, group)| {
            let links = link_relations(&group, &config.linker);
            let anomaly = score_household(&group, &links, &config.anomaly);
            Household {
                key,
                members: group,
                links,
                anomaly,
            }
        })
        .collect()
}

/// Run the full pipeline and wrap the result with a summary and run metadata.
pub fn run(config: &EngineConfig, input: &RollInput) -> RollResult {
    let households = compute_households(config, &input.members);
    let summary = compute_summary(&households);

    RollResult {
        meta: RollMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        households,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, MemberId, RelationType};

    fn member(
        id: u64,
        name: &str,
        relation_name: &str,
        age: u32,
        house: &str,
        voter_id: &str,
    ) -> MemberIdentity {
        MemberIdentity {
            id: MemberId(id),
            name: name.into(),
            relation_name: relation_name.into(),
            relation: RelationType::SonOf,
            age,
            gender: Gender::Unknown,
            house_no: house.into(),
            voter_id: voter_id.into(),
            batch: "P1".into(),
        }
    }

    #[test]
    fn pipeline_end_to_end() {
        let members = vec![
            member(1, "MOHAN KUMAR", "", 78, "12", "TN0000001"),
            member(2, "RAJ KUMAR", "MOHAN KUMAR", 52, "12", "TN0000002"),
            // Duplicate voter id, dropped by dedup
            member(3, "RAJ KUMAR", "MOHAN KUMAR", 52, "12", "TN0000002"),
            member(4, "SELVI AMMAL", "", 44, "14", "TN0000004"),
        ];
        let config = EngineConfig::default();
        let result = run(&config, &RollInput { members });

        assert_eq!(result.summary.households, 2);
        assert_eq!(result.summary.members, 3);
        assert_eq!(result.summary.links, 1);
        assert_eq!(result.summary.flagged, 0);

        let first = &result.households[0];
        assert_eq!(first.key.to_string(), "P1/12");
        assert_eq!(first.head().map(|m| m.id), Some(MemberId(1)));
        assert_eq!(first.links[0].from, MemberId(1));
        assert_eq!(first.links[0].to, MemberId(2));

        assert_eq!(result.meta.config_name, "default");
        assert!(!result.meta.engine_version.is_empty());
    }

    #[test]
    fn identical_input_identical_households() {
        let members = vec![
            member(1, "MOHAN KUMAR", "", 78, "12", "A"),
            member(2, "RAJ KUMAR", "MOHAN KUMAR", 52, "12", "B"),
            member(3, "KAVITHA", "", 17, "9", "C"),
        ];
        let config = EngineConfig::default();
        let a = compute_households(&config, &members);
        let b = compute_households(&config, &members);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.key, y.key);
            assert_eq!(x.members, y.members);
            assert_eq!(x.links, y.links);
            assert_eq!(x.anomaly, y.anomaly);
        }
    }

    #[test]
    fn flagged_household_surfaces_in_summary() {
        let members: Vec<_> = (1..=9)
            .map(|i| {
                member(
                    i,
                    &format!("MEMBER {i} DISTINCT"),
                    "",
                    18 + i as u32 * 6,
                    "77",
                    &format!("V{i}"),
                )
            })
            .collect();
        let result = run(&EngineConfig::default(), &RollInput { members });

        assert_eq!(result.summary.flagged, 1);
        let household = &result.households[0];
        assert!(household.anomaly.flagged);
        assert!(household
            .anomaly
            .reasons
            .iter()
            .any(|r| r.contains("no family links")));
    }

    #[test]
    fn result_serializes_to_json() {
        let members = vec![member(1, "MOHAN KUMAR", "", 78, "12", "A")];
        let result = run(&EngineConfig::default(), &RollInput { members });
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["summary"]["households"].is_u64());
        assert_eq!(value["households"][0]["key"]["house"], "12");
        assert_eq!(value["households"][0]["members"][0]["relation"], "S/O");
    }
}
