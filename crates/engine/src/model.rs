use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque member identifier, unique within one ingestion batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

/// Relation a member declared toward the person named in their relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "S/O")]
    SonOf,
    #[serde(rename = "D/O")]
    DaughterOf,
    #[serde(rename = "W/O")]
    WifeOf,
    #[serde(rename = "H/O")]
    HusbandOf,
    #[serde(rename = "C/O")]
    CareOf,
    #[serde(rename = "F/O")]
    FatherOf,
}

impl RelationType {
    /// Parse a wire string. Unknown or empty input defaults to `S/O`, the
    /// most common relation on the source rolls.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "D/O" => Self::DaughterOf,
            "W/O" => Self::WifeOf,
            "H/O" => Self::HusbandOf,
            "C/O" => Self::CareOf,
            "F/O" => Self::FatherOf,
            _ => Self::SonOf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SonOf => "S/O",
            Self::DaughterOf => "D/O",
            Self::WifeOf => "W/O",
            Self::HusbandOf => "H/O",
            Self::CareOf => "C/O",
            Self::FatherOf => "F/O",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "?")]
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "?",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The immutable identity of a voter record. Grouping, linking, and anomaly
/// scoring are pure functions of these fields and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberIdentity {
    pub id: MemberId,
    /// Normalized uppercase full name.
    pub name: String,
    /// Free-text relative name as declared on the roll, may be empty.
    pub relation_name: String,
    pub relation: RelationType,
    /// Age in years, 0 when unknown.
    pub age: u32,
    pub gender: Gender,
    /// Normalized house number, may be empty.
    pub house_no: String,
    /// External voter identifier, may be empty.
    pub voter_id: String,
    /// Source sheet or roll part this record came from.
    pub batch: String,
}

// ---------------------------------------------------------------------------
// Visit status (presentation-side, never an input to derivation)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    NotVisited,
    Visited,
    FollowUp,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStatus {
    pub visit: VisitStatus,
    pub last_visit: Option<NaiveDate>,
    pub notes: String,
}

impl Default for MemberStatus {
    fn default() -> Self {
        Self {
            visit: VisitStatus::NotVisited,
            last_visit: None,
            notes: String::new(),
        }
    }
}

/// Mutable visit-tracking state keyed by member id.
///
/// Kept outside the derivation pipeline on purpose: editing a status must
/// never force households to be regrouped or rescored. The join back to
/// identities happens at presentation time only.
#[derive(Debug, Default, Clone, Serialize)]
pub struct StatusBook {
    statuses: HashMap<MemberId, MemberStatus>,
}

impl StatusBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status for a member, defaulting to not-visited for unknown ids.
    pub fn status(&self, id: MemberId) -> MemberStatus {
        self.statuses.get(&id).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, id: MemberId, status: MemberStatus) {
        self.statuses.insert(id, status);
    }

    pub fn record_visit(&mut self, id: MemberId, visit: VisitStatus, date: Option<NaiveDate>) {
        let entry = self.statuses.entry(id).or_default();
        entry.visit = visit;
        entry.last_visit = date;
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Households
// ---------------------------------------------------------------------------

/// Household grouping key: batch + normalized house number, or a synthetic
/// per-member key (`#<id>`) when the house number is missing. Normalized
/// house numbers never contain `#`, so synthetic keys cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HouseholdKey {
    pub batch: String,
    pub house: String,
}

impl fmt::Display for HouseholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.batch, self.house)
    }
}

/// Directed relation edge: `from` is the inferred parent/spouse, `to` the
/// member who declared the relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationLink {
    pub from: MemberId,
    pub to: MemberId,
    pub relation: RelationType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub flagged: bool,
    pub score: u32,
    pub reasons: Vec<String>,
    /// One entry per rule trigger, in rule order; feeds the run summary.
    pub rules: Vec<crate::anomaly::AnomalyRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Household {
    pub key: HouseholdKey,
    /// Sorted by descending age; equal ages keep their roll order.
    pub members: Vec<MemberIdentity>,
    pub links: Vec<RelationLink>,
    pub anomaly: AnomalyReport,
}

impl Household {
    /// The oldest member, by the sorted order invariant.
    pub fn head(&self) -> Option<&MemberIdentity> {
        self.members.first()
    }
}

// ---------------------------------------------------------------------------
// Family tree
// ---------------------------------------------------------------------------

/// Layout position in abstract units, centered around x = 0 per level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChildEdge {
    pub child: MemberId,
    pub relation: RelationType,
}

/// Rooted, leveled layout of one household, rebuilt on each request.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyTree {
    pub root: MemberId,
    pub levels: HashMap<MemberId, u32>,
    pub children: HashMap<MemberId, Vec<ChildEdge>>,
    pub positions: HashMap<MemberId, NodePosition>,
    pub members: HashMap<MemberId, MemberIdentity>,
}

/// An empty household has no tree; that is a normal outcome, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TreeOutcome {
    Tree(FamilyTree),
    Unavailable,
}

impl TreeOutcome {
    pub fn tree(&self) -> Option<&FamilyTree> {
        match self {
            Self::Tree(t) => Some(t),
            Self::Unavailable => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Run input / output
// ---------------------------------------------------------------------------

/// Pre-loaded member records for one engine run.
#[derive(Debug, Clone)]
pub struct RollInput {
    pub members: Vec<MemberIdentity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollSummary {
    pub households: usize,
    pub members: usize,
    pub flagged: usize,
    pub links: usize,
    /// Rule name to total trigger count across all households.
    pub rule_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollResult {
    pub meta: RollMeta,
    pub summary: RollSummary,
    pub households: Vec<Household>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_parse_defaults_to_son_of() {
        assert_eq!(RelationType::parse("D/O"), RelationType::DaughterOf);
        assert_eq!(RelationType::parse("W/O"), RelationType::WifeOf);
        assert_eq!(RelationType::parse(""), RelationType::SonOf);
        assert_eq!(RelationType::parse("X/O"), RelationType::SonOf);
        assert_eq!(RelationType::parse(" H/O "), RelationType::HusbandOf);
    }

    #[test]
    fn relation_display_round_trip() {
        for rel in [
            RelationType::SonOf,
            RelationType::DaughterOf,
            RelationType::WifeOf,
            RelationType::HusbandOf,
            RelationType::CareOf,
            RelationType::FatherOf,
        ] {
            assert_eq!(RelationType::parse(rel.as_str()), rel);
        }
    }

    #[test]
    fn household_key_display() {
        let key = HouseholdKey {
            batch: "PART-12".into(),
            house: "12/5A".into(),
        };
        assert_eq!(key.to_string(), "PART-12/12/5A");
    }

    #[test]
    fn status_book_defaults_unknown_ids() {
        let book = StatusBook::new();
        let status = book.status(MemberId(99));
        assert_eq!(status.visit, VisitStatus::NotVisited);
        assert!(status.last_visit.is_none());
        assert!(status.notes.is_empty());
    }

    #[test]
    fn status_book_records_visits() {
        let mut book = StatusBook::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14);
        book.record_visit(MemberId(7), VisitStatus::Visited, date);

        let status = book.status(MemberId(7));
        assert_eq!(status.visit, VisitStatus::Visited);
        assert_eq!(status.last_visit, date);
        assert_eq!(book.len(), 1);
    }
}
