//! Audit reports produced while reconciling and checking string tables.
//!
//! A [`ReportSink`] receives one row per changeset entry or audit finding.
//! [`CsvReportSink`] writes one CSV file per report kind; [`MemoryReportSink`]
//! keeps the rows in memory.

use std::{
    collections::{HashMap, hash_map::Entry},
    fs::{self, File},
    path::PathBuf,
};

use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRow {
    pub index: usize,
    pub key: String,
    pub old_value: String,
    pub new_value: String,
}

/// An inserted or deleted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    pub index: usize,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRow {
    pub from_index: usize,
    pub to_index: usize,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateValueRow {
    pub source: String,
    pub value: String,
    /// Colliding keys joined with `;`.
    pub duplicated_keys: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateKeyRow {
    pub source: String,
    pub key: String,
}

/// An XLIFF unit whose source text no longer matches the JSON baseline value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XliffReconciliationRow {
    pub key: String,
    pub json_base_value: String,
    pub translated_base_value: String,
}

/// Destination of audit rows, one method per report kind.
pub trait ReportSink {
    fn replace(&mut self, row: ReplaceRow) -> Result<(), Error>;
    fn insert(&mut self, row: ItemRow) -> Result<(), Error>;
    fn delete(&mut self, row: ItemRow) -> Result<(), Error>;
    fn moved(&mut self, row: MoveRow) -> Result<(), Error>;
    fn duplicate_value(&mut self, row: DuplicateValueRow) -> Result<(), Error>;
    fn duplicate_key(&mut self, row: DuplicateKeyRow) -> Result<(), Error>;
    fn xliff_reconciliation(&mut self, row: XliffReconciliationRow) -> Result<(), Error>;
}

pub const REPLACES_FILE: &str = "Replaces.csv";
pub const INSERTS_FILE: &str = "Inserts.csv";
pub const DELETES_FILE: &str = "Deletes.csv";
pub const MOVES_FILE: &str = "Moves.csv";
pub const DUPLICATE_VALUES_FILE: &str = "DuplicateValuesFile.csv";
pub const DUPLICATE_KEYS_FILE: &str = "DuplicateKeysFile.csv";
pub const XLIFF_RECONCILIATION_FILE: &str = "ParseXLIFFReconciliation.csv";

/// Reports of a reconciliation run.
pub const CHANGESET_REPORTS: [&str; 4] = [REPLACES_FILE, INSERTS_FILE, DELETES_FILE, MOVES_FILE];
/// Reports of a duplicate audit.
pub const DUPLICATE_REPORTS: [&str; 2] = [DUPLICATE_VALUES_FILE, DUPLICATE_KEYS_FILE];

const HEADERS: [(&str, &[&str]); 7] = [
    (REPLACES_FILE, &["index", "key", "oldValue", "newValue"]),
    (INSERTS_FILE, &["index", "key", "value"]),
    (DELETES_FILE, &["index", "key", "value"]),
    (MOVES_FILE, &["fromIndex", "toIndex", "key", "value"]),
    (DUPLICATE_VALUES_FILE, &["source", "value", "duplicatedKeys"]),
    (DUPLICATE_KEYS_FILE, &["source", "key"]),
    (
        XLIFF_RECONCILIATION_FILE,
        &["key", "jsonBaseValue", "translatedBaseValue"],
    ),
];

/// Writes each report kind to its own CSV file inside `dir`.
///
/// A file starts with its header row and is created on its first row.
/// Reports passed to [`CsvReportSink::with_reports`] are written on
/// [`flush`](CsvReportSink::flush) even without rows. Every field is double-quoted.
pub struct CsvReportSink {
    dir: PathBuf,
    reports: Vec<&'static str>,
    writers: HashMap<&'static str, csv::Writer<File>>,
}

impl CsvReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_reports(dir, &[])
    }

    /// A sink that always leaves the files in `reports` behind.
    pub fn with_reports(dir: impl Into<PathBuf>, reports: &[&'static str]) -> Self {
        CsvReportSink {
            dir: dir.into(),
            reports: reports.to_vec(),
            writers: HashMap::new(),
        }
    }

    fn writer(&mut self, file_name: &'static str) -> Result<&mut csv::Writer<File>, Error> {
        match self.writers.entry(file_name) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                fs::create_dir_all(&self.dir)?;
                let mut writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .quote_style(csv::QuoteStyle::Always)
                    .from_path(self.dir.join(file_name))?;
                writer.write_record(header(file_name))?;
                Ok(entry.insert(writer))
            }
        }
    }

    fn write_row<T: Serialize>(&mut self, file_name: &'static str, row: T) -> Result<(), Error> {
        self.writer(file_name)?.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        for file_name in self.reports.clone() {
            self.writer(file_name)?;
        }
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

fn header(file_name: &str) -> &'static [&'static str] {
    HEADERS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, header)| *header)
        .unwrap_or(&[])
}

impl ReportSink for CsvReportSink {
    fn replace(&mut self, row: ReplaceRow) -> Result<(), Error> {
        self.write_row(REPLACES_FILE, row)
    }

    fn insert(&mut self, row: ItemRow) -> Result<(), Error> {
        self.write_row(INSERTS_FILE, row)
    }

    fn delete(&mut self, row: ItemRow) -> Result<(), Error> {
        self.write_row(DELETES_FILE, row)
    }

    fn moved(&mut self, row: MoveRow) -> Result<(), Error> {
        self.write_row(MOVES_FILE, row)
    }

    fn duplicate_value(&mut self, row: DuplicateValueRow) -> Result<(), Error> {
        self.write_row(DUPLICATE_VALUES_FILE, row)
    }

    fn duplicate_key(&mut self, row: DuplicateKeyRow) -> Result<(), Error> {
        self.write_row(DUPLICATE_KEYS_FILE, row)
    }

    fn xliff_reconciliation(&mut self, row: XliffReconciliationRow) -> Result<(), Error> {
        self.write_row(XLIFF_RECONCILIATION_FILE, row)
    }
}

/// Collects rows in memory, for tests and dry runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryReportSink {
    pub replaces: Vec<ReplaceRow>,
    pub inserts: Vec<ItemRow>,
    pub deletes: Vec<ItemRow>,
    pub moves: Vec<MoveRow>,
    pub duplicate_values: Vec<DuplicateValueRow>,
    pub duplicate_keys: Vec<DuplicateKeyRow>,
    pub xliff_reconciliations: Vec<XliffReconciliationRow>,
}

impl MemoryReportSink {
    pub fn is_empty(&self) -> bool {
        self == &MemoryReportSink::default()
    }
}

impl ReportSink for MemoryReportSink {
    fn replace(&mut self, row: ReplaceRow) -> Result<(), Error> {
        self.replaces.push(row);
        Ok(())
    }

    fn insert(&mut self, row: ItemRow) -> Result<(), Error> {
        self.inserts.push(row);
        Ok(())
    }

    fn delete(&mut self, row: ItemRow) -> Result<(), Error> {
        self.deletes.push(row);
        Ok(())
    }

    fn moved(&mut self, row: MoveRow) -> Result<(), Error> {
        self.moves.push(row);
        Ok(())
    }

    fn duplicate_value(&mut self, row: DuplicateValueRow) -> Result<(), Error> {
        self.duplicate_values.push(row);
        Ok(())
    }

    fn duplicate_key(&mut self, row: DuplicateKeyRow) -> Result<(), Error> {
        self.duplicate_keys.push(row);
        Ok(())
    }

    fn xliff_reconciliation(&mut self, row: XliffReconciliationRow) -> Result<(), Error> {
        self.xliff_reconciliations.push(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_csv_sink_writes_header_once_and_quotes_fields() {
        let dir = tempdir().unwrap();
        let mut sink = CsvReportSink::new(dir.path());
        sink.replace(ReplaceRow {
            index: 1,
            key: "b".to_string(),
            old_value: "B".to_string(),
            new_value: "Say \"B2\"".to_string(),
        })
        .unwrap();
        sink.replace(ReplaceRow {
            index: 3,
            key: "d".to_string(),
            old_value: "D".to_string(),
            new_value: "D2".to_string(),
        })
        .unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(dir.path().join(REPLACES_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], r#""index","key","oldValue","newValue""#);
        assert_eq!(lines[1], r#""1","b","B","Say ""B2""""#);
        assert_eq!(lines[2], r#""3","d","D","D2""#);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_sink_creates_files_lazily() {
        let dir = tempdir().unwrap();
        let mut sink = CsvReportSink::new(dir.path().join("reports"));
        sink.duplicate_value(DuplicateValueRow {
            source: "Common.strings.json".to_string(),
            value: "OK".to_string(),
            duplicated_keys: "ok;done".to_string(),
        })
        .unwrap();
        sink.flush().unwrap();

        let reports = dir.path().join("reports");
        assert!(reports.join(DUPLICATE_VALUES_FILE).exists());
        assert!(!reports.join(REPLACES_FILE).exists());
        let content = fs::read_to_string(reports.join(DUPLICATE_VALUES_FILE)).unwrap();
        assert!(content.starts_with(r#""source","value","duplicatedKeys""#));
    }

    #[test]
    fn test_declared_reports_get_a_header_without_rows() {
        let dir = tempdir().unwrap();
        let mut sink = CsvReportSink::with_reports(dir.path(), &CHANGESET_REPORTS);
        sink.insert(ItemRow {
            index: 0,
            key: "c".to_string(),
            value: "C".to_string(),
        })
        .unwrap();
        sink.flush().unwrap();

        let moves = fs::read_to_string(dir.path().join(MOVES_FILE)).unwrap();
        assert_eq!(moves.lines().collect::<Vec<_>>(), [r#""fromIndex","toIndex","key","value""#]);
        let inserts = fs::read_to_string(dir.path().join(INSERTS_FILE)).unwrap();
        assert_eq!(inserts.lines().count(), 2);
        assert!(!dir.path().join(DUPLICATE_VALUES_FILE).exists());
    }

    #[test]
    fn test_memory_sink_collects_rows() {
        let mut sink = MemoryReportSink::default();
        assert!(sink.is_empty());
        sink.moved(MoveRow {
            from_index: 1,
            to_index: 2,
            key: "b".to_string(),
            value: "B".to_string(),
        })
        .unwrap();
        assert_eq!(sink.moves.len(), 1);
        assert!(!sink.is_empty());
    }
}
