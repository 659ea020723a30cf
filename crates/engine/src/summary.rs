use std::collections::HashMap;

use crate::model::{Household, RollSummary};

/// Fold a household sequence into run-level counts.
pub fn compute_summary(households: &[Household]) -> RollSummary {
    let mut rule_counts: HashMap<String, usize> = HashMap::new();
    let mut members = 0;
    let mut links = 0;
    let mut flagged = 0;

    for household in households {
        members += household.members.len();
        links += household.links.len();
        if household.anomaly.flagged {
            flagged += 1;
        }
        for rule in &household.anomaly.rules {
            *rule_counts.entry(rule.to_string()).or_insert(0) += 1;
        }
    }

    RollSummary {
        households: households.len(),
        members,
        flagged,
        links,
        rule_counts,
    }
}
