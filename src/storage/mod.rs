use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, ScrapingError};

pub const CSV_HEADER: [&str; 5] = ["name", "Agency", "Phone Number 1", "Phone Number 2", "Address"];

/// One agent card, in output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRecord {
    pub name: String,
    pub business_name: String,
    pub phone_primary: String,
    pub phone_secondary: String,
    pub profile_link: String,
}

/// Append-only CSV output. The header is written once, when the sink is
/// created; every page gets its own `PageWriter`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Truncates (or creates) `path` and writes the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)
            .map_err(|e| ScrapingError::StorageError(format!("Failed to create {:?}: {}", path, e)))?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        info!("Initialized output file {:?}", path);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open_page(&self) -> Result<PageWriter> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| ScrapingError::StorageError(format!("Failed to open {:?} for append: {}", self.path, e)))?;

        Ok(PageWriter {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(file),
            rows_written: 0,
        })
    }
}

pub struct PageWriter {
    writer: csv::Writer<File>,
    rows_written: u64,
}

impl PageWriter {
    /// Rows are flushed one by one so a crash keeps everything written so far.
    pub fn write_record(&mut self, record: &AgentRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows_written += 1;
        debug!("Wrote row for {}", record.name);
        Ok(())
    }

    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}
