//! Rule-based household plausibility scoring.
//!
//! Six independent heuristics, evaluated in a fixed order, each adding a
//! fixed weight and a human-readable reason per trigger. Rules are advisory:
//! a household that trips none of them simply scores zero. Nothing here can
//! fail on odd input.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::config::AnomalyConfig;
use crate::model::{AnomalyReport, MemberIdentity, RelationLink, RelationType};
use crate::similarity::name_similarity;

/// The plausibility rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRule {
    ImplausibleParentage,
    TooManyHeads,
    UnderageVoter,
    FlatAgeSpread,
    DuplicateIdentity,
    UnlinkedLargeHousehold,
}

impl fmt::Display for AnomalyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImplausibleParentage => write!(f, "implausible_parentage"),
            Self::TooManyHeads => write!(f, "too_many_heads"),
            Self::UnderageVoter => write!(f, "underage_voter"),
            Self::FlatAgeSpread => write!(f, "flat_age_spread"),
            Self::DuplicateIdentity => write!(f, "duplicate_identity"),
            Self::UnlinkedLargeHousehold => write!(f, "unlinked_large_household"),
        }
    }
}

/// Relations that declare toward (or as) a household head.
fn declares_head(relation: RelationType) -> bool {
    matches!(
        relation,
        RelationType::SonOf | RelationType::WifeOf | RelationType::HusbandOf | RelationType::FatherOf
    )
}

/// Score one household. Pure and stable: the same members and links always
/// produce the identical report, reasons included, so results are cacheable
/// and directly comparable in tests.
pub fn score_household(
    members: &[MemberIdentity],
    links: &[RelationLink],
    config: &AnomalyConfig,
) -> AnomalyReport {
    let mut report = AnomalyReport::default();

    check_parentage_gaps(members, config, &mut report);
    check_head_count(members, config, &mut report);
    check_voting_age(members, config, &mut report);
    check_age_spread(members, config, &mut report);
    check_duplicate_identities(members, config, &mut report);
    check_unlinked_size(members, links, config, &mut report);

    report.flagged = !report.reasons.is_empty();
    report
}

fn trigger(report: &mut AnomalyReport, rule: AnomalyRule, weight: u32, reason: String) {
    report.score += weight;
    report.rules.push(rule);
    report.reasons.push(reason);
}

/// Rule 1: a declared son/daughter whose matched parent is fewer than
/// `min_parent_gap` years older. One trigger per such pair.
fn check_parentage_gaps(
    members: &[MemberIdentity],
    config: &AnomalyConfig,
    report: &mut AnomalyReport,
) {
    for member in members {
        if !matches!(
            member.relation,
            RelationType::SonOf | RelationType::DaughterOf
        ) || member.relation_name.is_empty()
        {
            continue;
        }
        let parent = members.iter().find(|other| {
            other.id != member.id
                && name_similarity(&other.name, &member.relation_name)
                    >= config.similarity_threshold
        });
        if let Some(parent) = parent {
            let gap = parent.age as i64 - member.age as i64;
            if gap < config.min_parent_gap as i64 {
                trigger(
                    report,
                    AnomalyRule::ImplausibleParentage,
                    config.rule_weight,
                    format!(
                        "{} (age {}) and declared parent {} (age {}) are fewer than {} years apart",
                        member.name, member.age, parent.name, parent.age, config.min_parent_gap
                    ),
                );
            }
        }
    }
}

/// Rule 2: more head-type declarations than one household plausibly holds.
fn check_head_count(
    members: &[MemberIdentity],
    config: &AnomalyConfig,
    report: &mut AnomalyReport,
) {
    let heads = members.iter().filter(|m| declares_head(m.relation)).count();
    if heads > config.max_heads {
        trigger(
            report,
            AnomalyRule::TooManyHeads,
            config.rule_weight,
            format!("{heads} head-type relation declarations in one household"),
        );
    }
}

/// Rule 3: a voter roll should carry only eligible ages. Fires once.
fn check_voting_age(
    members: &[MemberIdentity],
    config: &AnomalyConfig,
    report: &mut AnomalyReport,
) {
    if let Some(youngest) = members.iter().map(|m| m.age).min() {
        if youngest < config.min_voter_age {
            trigger(
                report,
                AnomalyRule::UnderageVoter,
                config.rule_weight,
                format!(
                    "member aged {youngest} is below the voting age of {}",
                    config.min_voter_age
                ),
            );
        }
    }
}

/// Rule 4: many members, nearly identical ages. Real multigenerational
/// households spread wider; a flat band suggests duplicated entries.
/// Unknown ages (0) are excluded entirely so OCR blanks cannot fabricate
/// a flat household.
fn check_age_spread(
    members: &[MemberIdentity],
    config: &AnomalyConfig,
    report: &mut AnomalyReport,
) {
    let known: Vec<u32> = members.iter().map(|m| m.age).filter(|&a| a > 0).collect();
    if known.len() <= config.spread_min_members {
        return;
    }
    let (min, max) = known
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), &a| (lo.min(a), hi.max(a)));
    let spread = max - min;
    if spread < config.min_age_spread {
        trigger(
            report,
            AnomalyRule::FlatAgeSpread,
            config.rule_weight,
            format!(
                "{} members span only {} years of age",
                known.len(),
                spread
            ),
        );
    }
}

/// Rule 5: repeated (name, relation) pairs. One trigger per duplicated pair.
fn check_duplicate_identities(
    members: &[MemberIdentity],
    config: &AnomalyConfig,
    report: &mut AnomalyReport,
) {
    let mut counts: FxHashMap<(&str, RelationType), usize> = FxHashMap::default();
    for member in members {
        *counts
            .entry((member.name.as_str(), member.relation))
            .or_insert(0) += 1;
    }

    // Walk members in roll order so reason order is deterministic
    let mut reported: FxHashSet<(&str, RelationType)> = FxHashSet::default();
    for member in members {
        let key = (member.name.as_str(), member.relation);
        let count = counts[&key];
        if count >= 2 && reported.insert(key) {
            trigger(
                report,
                AnomalyRule::DuplicateIdentity,
                config.rule_weight,
                format!(
                    "{} appears {} times with relation {}",
                    member.name, count, member.relation
                ),
            );
        }
    }
}

/// Rule 6: a large household where nothing links to anything.
fn check_unlinked_size(
    members: &[MemberIdentity],
    links: &[RelationLink],
    config: &AnomalyConfig,
    report: &mut AnomalyReport,
) {
    if members.len() > config.large_household && links.is_empty() {
        trigger(
            report,
            AnomalyRule::UnlinkedLargeHousehold,
            config.rule_weight,
            format!(
                "household of {} members has no family links",
                members.len()
            ),
        );
    }
}
