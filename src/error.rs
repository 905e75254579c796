use std::path::PathBuf;

/// Errors that can stop the dashboard from loading or rendering a view.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The input CSV is not where we expect it.
    #[error("'{}' not found. Put the CSV file in the same folder.", path.display())]
    MissingInputFile { path: PathBuf },

    /// None of the configured encodings produced a usable table.
    #[error("could not decode '{}' with any of: {}", path.display(), tried.join(", "))]
    Decode { path: PathBuf, tried: Vec<String> },

    /// The header row lacks one or more required columns.
    #[error("missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A count cell could not be read as a non-negative integer (strict mode only).
    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    MalformedRow {
        line: u64,
        column: String,
        value: String,
    },

    #[error("region '{0}' does not appear in the dataset")]
    UnknownRegion(String),

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
