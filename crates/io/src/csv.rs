// CSV/TSV roll import

use std::path::Path;

use rollscope_engine::MemberIdentity;

use crate::columns::ColumnIndex;
use crate::error::IoError;

/// Load roll rows from CSV text. Member ids are assigned sequentially in
/// row order, so the same file always yields the same ids.
pub fn load_roll_csv(data: &str, batch: &str) -> Result<Vec<MemberIdentity>, IoError> {
    load_with_delimiter(data, batch, b',')
}

pub fn load_roll_tsv(data: &str, batch: &str) -> Result<Vec<MemberIdentity>, IoError> {
    load_with_delimiter(data, batch, b'\t')
}

pub fn load_roll_csv_path(path: &Path, batch: &str) -> Result<Vec<MemberIdentity>, IoError> {
    let data = std::fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        load_roll_tsv(&data, batch)
    } else {
        load_roll_csv(&data, batch)
    }
}

fn load_with_delimiter(
    data: &str,
    batch: &str,
    delimiter: u8,
) -> Result<Vec<MemberIdentity>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Csv {
            source: batch.into(),
            detail: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let columns = ColumnIndex::from_headers(&headers, batch)?;

    let mut members = Vec::new();
    let mut next_id: u64 = 1;

    for record in reader.records() {
        let record = record.map_err(|e| IoError::Csv {
            source: batch.into(),
            detail: e.to_string(),
        })?;
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        if let Some(member) = columns.member_from_row(&fields, next_id, batch) {
            members.push(member);
            next_id += 1;
        }
    }

    Ok(members)
}
