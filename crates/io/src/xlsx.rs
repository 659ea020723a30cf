// Excel roll import (xlsx, xls, xlsb, ods)
//
// One-way conversion: the first worksheet's rows become member identities
// under the same column semantics as the CSV loader.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use rollscope_engine::MemberIdentity;

use crate::columns::ColumnIndex;
use crate::error::IoError;

pub fn load_roll_xlsx(path: &Path, batch: &str) -> Result<Vec<MemberIdentity>, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Workbook {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IoError::EmptyWorkbook {
            path: path.display().to_string(),
        })?
        .map_err(|e| IoError::Workbook {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => {
            return Err(IoError::EmptyWorkbook {
                path: path.display().to_string(),
            })
        }
    };

    let columns = ColumnIndex::from_headers(&headers, &path.display().to_string())?;

    let mut members = Vec::new();
    let mut next_id: u64 = 1;
    for row in rows {
        let fields: Vec<String> = row.iter().map(cell_text).collect();
        if let Some(member) = columns.member_from_row(&fields, next_id, batch) {
            members.push(member);
            next_id += 1;
        }
    }

    Ok(members)
}

/// Text form of a cell. Whole floats print as integers so ages read back
/// as `52`, not `52.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(v) => {
            if v.fract() == 0.0 {
                format!("{}", *v as i64)
            } else {
                v.to_string()
            }
        }
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_read_as_integers() {
        assert_eq!(cell_text(&Data::Float(52.0)), "52");
        assert_eq!(cell_text(&Data::Float(52.5)), "52.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
    }

    #[test]
    fn strings_are_trimmed_and_blanks_empty() {
        assert_eq!(cell_text(&Data::String("  Mohan Kumar ".into())), "Mohan Kumar");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn missing_file_is_a_workbook_error() {
        let err = load_roll_xlsx(Path::new("/nonexistent/roll.xlsx"), "P1").unwrap_err();
        assert!(matches!(err, IoError::Workbook { .. }));
    }
}
