use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File read error.
    Read { path: String, detail: String },
    /// CSV parse error.
    Csv { source: String, detail: String },
    /// Workbook open/parse error.
    Workbook { path: String, detail: String },
    /// Workbook has no sheets or no header row.
    EmptyWorkbook { path: String },
    /// A required column is absent from the header row.
    MissingColumn { source: String, column: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, detail } => write!(f, "cannot read {path}: {detail}"),
            Self::Csv { source, detail } => write!(f, "{source}: CSV error: {detail}"),
            Self::Workbook { path, detail } => write!(f, "cannot open workbook {path}: {detail}"),
            Self::EmptyWorkbook { path } => write!(f, "workbook {path} has no usable sheet"),
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for IoError {}
