use rollscope_engine::model::{MemberId, MemberIdentity, RelationType};

use crate::error::IoError;
use crate::normalize::{clean_name, normalize_house_no, parse_age, parse_gender};

/// Header positions for the roll sheet layout. Only `name` is mandatory;
/// every other column degrades to its field default when absent.
pub(crate) struct ColumnIndex {
    name: usize,
    voter_id: Option<usize>,
    relation_type: Option<usize>,
    relation_name: Option<usize>,
    house_number: Option<usize>,
    age: Option<usize>,
    gender: Option<usize>,
    part_no: Option<usize>,
}

impl ColumnIndex {
    pub fn from_headers(headers: &[String], source: &str) -> Result<Self, IoError> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };

        let name = find("name").ok_or_else(|| IoError::MissingColumn {
            source: source.into(),
            column: "name".into(),
        })?;

        Ok(Self {
            name,
            voter_id: find("voter_id"),
            relation_type: find("relation_type"),
            relation_name: find("relation_name"),
            house_number: find("house_number"),
            age: find("age"),
            gender: find("gender"),
            part_no: find("part_no"),
        })
    }

    /// Build one identity from a row of cell texts. Rows without a usable
    /// name are skipped, not errors; OCR regularly produces them.
    pub fn member_from_row(&self, row: &[String], id: u64, batch: &str) -> Option<MemberIdentity> {
        let get = |idx: Option<usize>| -> &str {
            idx.and_then(|i| row.get(i)).map(|s| s.as_str()).unwrap_or("")
        };

        let name = clean_name(row.get(self.name).map(|s| s.as_str()).unwrap_or(""));
        if name.is_empty() {
            return None;
        }

        let part = get(self.part_no).trim();
        let batch = if part.is_empty() { batch } else { part };

        Some(MemberIdentity {
            id: MemberId(id),
            name,
            relation_name: clean_name(get(self.relation_name)),
            relation: RelationType::parse(get(self.relation_type)),
            age: parse_age(get(self.age)),
            gender: parse_gender(get(self.gender)),
            house_no: normalize_house_no(get(self.house_number)),
            voter_id: get(self.voter_id).trim().to_string(),
            batch: batch.to_string(),
        })
    }
}
