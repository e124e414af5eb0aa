use crate::error::{Result, VouchError};
use crate::io;
use crate::record::VouchRecord;
use std::path::{Path, PathBuf};

// ─── RecordStore ──────────────────────────────────────────────────────────

/// The flat-file collection of every vouch, kept as one pretty-printed JSON
/// array.
///
/// Every operation reads the whole file and `append` rewrites it whole.
/// There is no locking: two appends that interleave can both compute the
/// same next id, and the later write drops the earlier record.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists. An empty array still counts.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load all records in insertion order. A missing file is an empty store;
    /// a file that is not a JSON array of records is a parse error.
    pub fn load(&self) -> Result<Vec<VouchRecord>> {
        let Some(raw) = io::read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| VouchError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// The id the next appended record should carry: `len + 1`.
    pub fn next_id(&self) -> Result<u64> {
        Ok(self.load()?.len() as u64 + 1)
    }

    /// Read-modify-write: load, push `record` at the end, overwrite the file.
    pub fn append(&self, record: VouchRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        let data = serde_json::to_string_pretty(&records)?;
        io::atomic_write(&self.path, data.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "store written");
        Ok(())
    }
}
