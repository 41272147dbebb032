//! # Generic CSV Table
//!
//! [`CsvTable`] owns one backing file and its in-memory rows for the
//! duration of a session. Each session opens its own handle; there is no
//! process-wide shared table state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Binds a row type to its backing file and declared column schema.
pub trait TableRecord: Serialize + DeserializeOwned + Clone {
    /// File stem under the data directory, e.g. `"departments"` for
    /// `departments.csv`.
    const FILE_STEM: &'static str;

    /// Header row, in column order. Must match the serde field names the
    /// row type serializes with.
    const COLUMNS: &'static [&'static str];
}

/// Errors from table load or rewrite.
///
/// "Row not found" is never an error; scans return empty results.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing file could not be created, read or rewritten.
    #[error("table {path}: io failure: {message}")]
    Io { path: String, message: String },

    /// The backing file exists but its content does not parse against the
    /// declared schema. Fatal at load time.
    #[error("table {path}: malformed content: {message}")]
    Malformed { path: String, message: String },
}

/// A durable table with a fixed schema, loaded whole at open time.
#[derive(Debug)]
pub struct CsvTable<R> {
    path: PathBuf,
    rows: Vec<R>,
}

impl<R: TableRecord> CsvTable<R> {
    /// Open the table under `dir`, creating an empty file with a header
    /// row when absent.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = dir.as_ref().join(format!("{}.csv", R::FILE_STEM));

        if !path.exists() {
            debug!(table = R::FILE_STEM, "backing file absent, creating with headers");
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| io_err(&path, e))?;
            }
            let mut writer = csv::Writer::from_path(&path).map_err(|e| csv_io_err(&path, e))?;
            writer
                .write_record(R::COLUMNS)
                .and_then(|()| writer.flush().map_err(Into::into))
                .map_err(|e| csv_io_err(&path, e))?;
            return Ok(Self { path, rows: Vec::new() });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| csv_io_err(&path, e))?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            let row: R = row.map_err(|e| StoreError::Malformed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            rows.push(row);
        }
        debug!(table = R::FILE_STEM, rows = rows.len(), "table loaded");
        Ok(Self { path, rows })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows currently loaded.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Linear scan for any row matching `pred`. Used by callers to enforce
    /// natural-key uniqueness before [`append`](Self::append).
    pub fn exists(&self, pred: impl Fn(&R) -> bool) -> bool {
        self.rows.iter().any(pred)
    }

    /// All rows matching `pred`, insertion order preserved.
    pub fn query(&self, pred: impl Fn(&R) -> bool) -> Vec<R> {
        self.rows.iter().filter(|r| pred(r)).cloned().collect()
    }

    /// First row matching `pred`, if any.
    pub fn find(&self, pred: impl Fn(&R) -> bool) -> Option<R> {
        self.rows.iter().find(|r| pred(r)).cloned()
    }

    /// Append one row and rewrite the backing file. Performs no
    /// uniqueness check of its own.
    pub fn append(&mut self, row: R) -> Result<(), StoreError> {
        self.rows.push(row);
        self.rewrite()
    }

    /// Mutate the first row matching `pred` in place and rewrite the
    /// backing file. Returns false (and leaves the file untouched) when
    /// nothing matches.
    pub fn update_where(
        &mut self,
        pred: impl Fn(&R) -> bool,
        mutate: impl FnOnce(&mut R),
    ) -> Result<bool, StoreError> {
        match self.rows.iter_mut().find(|r| pred(r)) {
            Some(row) => {
                mutate(row);
                self.rewrite()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Full read-modify-write cycle: serialize every row back to the file.
    /// No locking; last writer wins across sessions.
    fn rewrite(&self) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| csv_io_err(&self.path, e))?;
        if self.rows.is_empty() {
            writer
                .write_record(R::COLUMNS)
                .map_err(|e| csv_io_err(&self.path, e))?;
        }
        for row in &self.rows {
            writer.serialize(row).map_err(|e| csv_io_err(&self.path, e))?;
        }
        writer.flush().map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}

fn io_err(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn csv_io_err(path: &Path, e: csv::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct NoteRow {
        owner: String,
        body: String,
        count: u64,
    }

    impl TableRecord for NoteRow {
        const FILE_STEM: &'static str = "notes";
        const COLUMNS: &'static [&'static str] = &["owner", "body", "count"];
    }

    fn note(owner: &str, body: &str, count: u64) -> NoteRow {
        NoteRow {
            owner: owner.into(),
            body: body.into(),
            count,
        }
    }

    #[test]
    fn absent_file_is_created_with_headers() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        assert!(table.is_empty());
        let content = fs::read_to_string(table.path()).unwrap();
        assert_eq!(content.trim(), "owner,body,count");
    }

    #[test]
    fn append_then_reopen_round_trips() {
        let dir = TempDir::new().unwrap();
        {
            let mut table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
            table.append(note("ann", "first", 1)).unwrap();
            table.append(note("bob", "second", 2)).unwrap();
        }
        let table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.find(|r| r.owner == "ann"), Some(note("ann", "first", 1)));
    }

    #[test]
    fn query_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        table.append(note("ann", "a", 1)).unwrap();
        table.append(note("ann", "b", 2)).unwrap();
        table.append(note("bob", "c", 3)).unwrap();

        let anns = table.query(|r| r.owner == "ann");
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].body, "a");
        assert_eq!(anns[1].body, "b");
    }

    #[test]
    fn update_where_mutates_first_match_only() {
        let dir = TempDir::new().unwrap();
        let mut table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        table.append(note("ann", "a", 1)).unwrap();
        table.append(note("ann", "b", 2)).unwrap();

        let hit = table
            .update_where(|r| r.owner == "ann", |r| r.count = 99)
            .unwrap();
        assert!(hit);

        let reloaded: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        let rows = reloaded.query(|r| r.owner == "ann");
        assert_eq!(rows[0].count, 99);
        assert_eq!(rows[1].count, 2);
    }

    #[test]
    fn update_where_without_match_returns_false() {
        let dir = TempDir::new().unwrap();
        let mut table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        table.append(note("ann", "a", 1)).unwrap();
        let hit = table
            .update_where(|r| r.owner == "zed", |r| r.count = 0)
            .unwrap();
        assert!(!hit);
    }

    #[test]
    fn malformed_content_is_fatal_at_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.csv");
        fs::write(&path, "owner,body,count\nann,first,not-a-number\n").unwrap();
        let err = CsvTable::<NoteRow>::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn exists_distinguishes_empty_from_match() {
        let dir = TempDir::new().unwrap();
        let mut table: CsvTable<NoteRow> = CsvTable::open(dir.path()).unwrap();
        assert!(!table.exists(|r| r.owner == "ann"));
        table.append(note("ann", "a", 1)).unwrap();
        assert!(table.exists(|r| r.owner == "ann"));
    }
}
