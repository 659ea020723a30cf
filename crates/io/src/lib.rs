// Roll file ingestion - CSV, Excel

mod columns;
pub mod csv;
pub mod error;
pub mod normalize;
pub mod xlsx;

pub use error::IoError;

/// Load a roll file by extension: `.csv`/`.tsv` as delimited text, anything
/// calamine understands (`.xlsx`, `.xls`, `.xlsb`, `.ods`) as a workbook.
pub fn load_roll(
    path: &std::path::Path,
    batch: &str,
) -> Result<Vec<rollscope_engine::MemberIdentity>, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" => csv::load_roll_csv_path(path, batch),
        _ => xlsx::load_roll_xlsx(path, batch),
    }
}
