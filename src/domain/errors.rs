use thiserror::Error;

/// Errors raised while fetching a report file from the exchange
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request for {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Errors raised while locating the metric-ton table inside a report sheet
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not decode report spreadsheet: {reason}")]
    Decode { reason: String },

    #[error("No metric-ton table marker found in report sheet")]
    StartMarkerNotFound,

    #[error("Summary row at index {end} precedes table marker at index {start}")]
    MarkersOutOfOrder { start: usize, end: usize },

    #[error("Report file name carries no publication timestamp: {name}")]
    BadFileName { name: String },
}

/// Errors raised while mapping a cleaned report row to a trading result
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Product code too short to decompose: {code:?}")]
    MalformedProductCode { code: String },

    #[error("Row is missing its {column} cell")]
    MissingCell { column: &'static str },

    #[error("{column} is not a whole number: {value:?}")]
    InvalidNumber { column: &'static str, value: String },

    #[error("{column} must be non-negative, got {value}")]
    NegativeNumber { column: &'static str, value: i64 },
}

/// Caller-side misuse of the repository API
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("Record ids are assigned by the store and must not be supplied on add")]
    PresetId,

    #[error("Unknown trading result field: {name}")]
    UnknownField { name: String },
}

/// Backing-store failures surfaced by a repository or unit of work
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database failure: {reason}")]
    Database { reason: String },
}

/// Either way a repository operation can fail
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything that can go wrong while ingesting one report file.
/// A failure of this type is scoped to its date; sibling ingestions proceed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_formatting() {
        let err = ExtractionError::MarkersOutOfOrder { start: 12, end: 4 };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("4"));
    }

    #[test]
    fn test_parse_error_formatting() {
        let err = ParseError::InvalidNumber {
            column: "volume",
            value: "n/a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("volume"));
        assert!(msg.contains("n/a"));
    }

    #[test]
    fn test_ingest_error_wraps_transport() {
        let err = IngestError::from(TransportError::Status {
            url: "https://example.com/report.xls".to_string(),
            status: 404,
        });
        assert!(err.to_string().contains("404"));
    }
}
