//! FILENAME: core/dataset/src/export.rs
//! Flat CSV export of the filtered record set.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use drill_engine::Record;

use crate::error::SourceError;

/// Serializes records as CSV. Column order follows the first record;
/// every field is quoted, with embedded quotes doubled. An empty record
/// set writes nothing.
pub fn export_csv<W: Write>(records: &[&Record], writer: W) -> Result<(), SourceError> {
    let mut out = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    let Some(first) = records.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.column_names().collect();
    out.write_record(&headers)?;

    for record in records {
        let row: Vec<&str> = headers
            .iter()
            .map(|header| record.get(header).unwrap_or(""))
            .collect();
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_csv_file(records: &[&Record], path: impl AsRef<Path>) -> Result<(), SourceError> {
    let file = File::create(path)?;
    export_csv(records, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_source::{parse_csv, read_csv_file};

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_export_quotes_every_field() {
        let a = record(&[("Market", "Boston"), ("COST", "$10")]);
        let records = vec![&a];
        let mut buffer = Vec::new();
        export_csv(&records, &mut buffer).expect("export");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, "\"Market\",\"COST\"\n\"Boston\",\"$10\"\n");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let a = record(&[("Note", "a \"quoted\" value")]);
        let records = vec![&a];
        let mut buffer = Vec::new();
        export_csv(&records, &mut buffer).expect("export");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.contains("\"a \"\"quoted\"\" value\""));
    }

    #[test]
    fn test_empty_set_writes_nothing() {
        let mut buffer = Vec::new();
        export_csv(&[], &mut buffer).expect("export");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_export_then_reparse_round_trips() {
        let a = record(&[("Regions", "East"), ("COST", "$1,234.50")]);
        let b = record(&[("Regions", "West"), ("COST", "$7")]);
        let records = vec![&a, &b];

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tradeins_export.csv");
        export_csv_file(&records, &path).expect("export");

        let reloaded = read_csv_file(&path).expect("reload");
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].get("COST"), Some("$1,234.50"));
        assert_eq!(reloaded[1].get("Regions"), Some("West"));
    }

    #[test]
    fn test_parse_export_symmetry_on_text() {
        let text = "Regions,COST\nEast,$10\n";
        let parsed = parse_csv(text).expect("parse");
        let borrowed: Vec<&Record> = parsed.iter().collect();
        let mut buffer = Vec::new();
        export_csv(&borrowed, &mut buffer).expect("export");
        let reparsed = parse_csv(&String::from_utf8(buffer).expect("utf8")).expect("reparse");
        assert_eq!(parsed, reparsed);
    }
}
