// Report ingestion pipeline driver
pub mod ingest;

// Report URL and file-name conventions
pub mod reports;
