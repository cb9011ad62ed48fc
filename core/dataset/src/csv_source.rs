//! FILENAME: core/dataset/src/csv_source.rs
//! CSV ingestion - remote fetch and text parsing into records.

use std::path::Path;

use drill_engine::Record;

use crate::error::SourceError;

/// Parses headered CSV text into records. Ragged rows are tolerated
/// (missing trailing fields read as empty) and fully blank lines are
/// skipped. Values are kept verbatim; trimming happens at field
/// resolution.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let mut record = Record::new();
        for (index, header) in headers.iter().enumerate() {
            record.push(header.clone(), row.get(index).unwrap_or(""));
        }
        records.push(record);
    }
    Ok(records)
}

/// Reads and parses a local CSV file.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<Record>, SourceError> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text)
}

/// Fetches and parses a remote CSV. Non-success HTTP statuses are errors;
/// callers are expected to degrade to an empty dataset and surface a
/// warning rather than fail the view.
pub async fn fetch_csv(url: &str) -> Result<Vec<Record>, SourceError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let text = response.text().await?;
    parse_csv(&text)
}
