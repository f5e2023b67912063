use crate::error::{AppError, Result};
use crate::ingest::decode::EncodingCandidates;
use crate::models::{AssetRecord, REQUIRED_COLUMNS};
use std::path::Path;
use tracing::info;

/// Reads asset inventories from CSV bytes or files
#[derive(Debug, Clone, Default)]
pub struct DatasetReader {
    candidates: EncodingCandidates,
}

impl DatasetReader {
    pub fn new(candidates: EncodingCandidates) -> Self {
        Self { candidates }
    }

    /// Read a dataset from disk
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<AssetRecord>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let records = self.read_bytes(&bytes)?;
        info!(path = %path.display(), rows = records.len(), "Loaded dataset");
        Ok(records)
    }

    /// Decode and parse raw dataset bytes
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Vec<AssetRecord>> {
        let decoded = self.candidates.decode(bytes)?;
        Self::parse_csv(&decoded.text)
    }

    /// Parse decoded CSV text; the header must name every required column
    ///
    /// Rows shorter than the header are accepted and their trailing fields
    /// read as missing values.
    pub fn parse_csv(text: &str) -> Result<Vec<AssetRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Dataset(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let width = headers.len();
        let mut records = Vec::new();
        for result in reader.records() {
            let mut record = result?;
            while record.len() < width {
                record.push_field("");
            }
            records.push(record.deserialize::<AssetRecord>(Some(&headers))?);
        }

        if records.is_empty() {
            return Err(AppError::Dataset("dataset contains no rows".to_string()));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "hostname,ip,location,operating_system,system_owner,application_owner";

    #[test]
    fn test_parse_minimal_dataset() {
        let text = format!("{}\nweb-01,10.0.0.1,NYC,Linux,Ops,Billing\n", HEADER);
        let records = DatasetReader::parse_csv(&text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hostname, "web-01");
        assert_eq!(records[0].system_owner.as_deref(), Some("Ops"));
        assert_eq!(records[0].application_owner.as_deref(), Some("Billing"));
    }

    #[test]
    fn test_column_order_and_extra_columns_are_ignored() {
        let text = "serial,application_owner,system_owner,operating_system,location,ip,hostname\n\
                    S1,Billing,Ops,Linux,NYC,10.0.0.1,web-01\n";
        let records = DatasetReader::parse_csv(text).unwrap();

        assert_eq!(records[0].hostname, "web-01");
        assert_eq!(records[0].location, "NYC");
    }

    #[test]
    fn test_empty_cells_become_missing_values() {
        let text = format!("{}\nweb-01,,,,Ops,\n", HEADER);
        let records = DatasetReader::parse_csv(&text).unwrap();

        assert_eq!(records[0].ip, "");
        assert_eq!(records[0].location, "");
        assert_eq!(records[0].application_owner, None);
    }

    #[test]
    fn test_short_row_reads_trailing_fields_as_missing() {
        let text = format!(
            "{}\nweb-01,10.0.0.1,NYC,Linux,Ops,Billing\nweb-02,10.0.0.2,NYC,Linux,Ops\nweb-03,10.0.0.3\n",
            HEADER
        );
        let records = DatasetReader::parse_csv(&text).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].system_owner.as_deref(), Some("Ops"));
        assert_eq!(records[1].application_owner, None);
        assert_eq!(records[2].location, "");
        assert_eq!(records[2].operating_system, "");
        assert_eq!(records[2].system_owner, None);
    }

    #[test]
    fn test_missing_column_is_dataset_error() {
        let text = "hostname,ip,location\nweb-01,10.0.0.1,NYC\n";
        let err = DatasetReader::parse_csv(text).unwrap_err();

        match err {
            AppError::Dataset(msg) => {
                assert!(msg.contains("operating_system"));
                assert!(msg.contains("application_owner"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_dataset_error() {
        let err = DatasetReader::parse_csv(HEADER).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[test]
    fn test_read_path_with_latin1_bytes() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(HEADER.as_bytes())?;
        file.write_all(b"\nweb-01,10.0.0.1,Z\xfcrich,Linux,Ops,Billing\n")?;
        file.flush()?;

        let records = DatasetReader::default().read_path(file.path())?;
        assert_eq!(records[0].location, "Zürich");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DatasetReader::default()
            .read_path("/nonexistent/dataset.csv")
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
