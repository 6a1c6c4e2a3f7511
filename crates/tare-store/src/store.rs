//! The file-backed weight log store.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use tare_config::StoreConfig;
use tare_core::WeightEntry;

use crate::error::StoreError;
use crate::format::{self, HEADER, SyncKey};

/// Append-only CSV weight log.
///
/// The store exclusively owns the backing file. Every operation — append,
/// read, rewrite — runs under one internal mutex, so an append can never be
/// lost inside a concurrent rewrite and a reader never observes a
/// half-written row. Contention blocks; nothing is ever dropped.
///
/// Shared across tasks as `Arc<WeightLogStore>`.
pub struct WeightLogStore {
    path: PathBuf,
    datetime_format: String,
    /// Serializes all access to the backing file.
    file_lock: Mutex<()>,
}

impl WeightLogStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, datetime_format: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            datetime_format: datetime_format.into(),
            file_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.log_path, &config.datetime_format)
    }

    /// Location of the backing CSV file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one fresh, unsynced entry. The row is flushed and fsynced
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Core` for a zero user id and `StoreError::Io`
    /// when the file cannot be written.
    pub fn append(
        &self,
        user_id: u32,
        weight_kg: f64,
        logged_at: NaiveDateTime,
    ) -> Result<WeightEntry, StoreError> {
        let entry = WeightEntry::new(user_id, weight_kg, logged_at)?;
        let row = format::format_row(&entry, &self.datetime_format);

        let _guard = self.lock();
        self.ensure_file()?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{row}")?;
        file.flush()?;
        file.sync_all()?;

        tracing::info!(
            user_id,
            weight_kg = %format::format_weight(weight_kg),
            "appended weight entry"
        );
        Ok(entry)
    }

    /// All well-formed entries in insertion order.
    ///
    /// Malformed rows are skipped with a warning; a missing file reads as an
    /// empty store (and is created with its header so later appends and
    /// rewrites have something to work against).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` when the file exists but cannot be read.
    pub fn all_entries(&self) -> Result<Vec<WeightEntry>, StoreError> {
        let _guard = self.lock();
        self.ensure_file()?;
        Ok(self
            .read_rows()?
            .into_iter()
            .filter_map(|row| row.entry)
            .collect())
    }

    /// Most recent entry per user, derived from the full log. Timestamp
    /// ties resolve to the row that appears later in the file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` when the file exists but cannot be read.
    pub fn latest_per_user(&self) -> Result<BTreeMap<u32, WeightEntry>, StoreError> {
        let mut latest: BTreeMap<u32, WeightEntry> = BTreeMap::new();
        for entry in self.all_entries()? {
            match latest.get(&entry.user_id) {
                Some(current) if current.logged_at > entry.logged_at => {}
                _ => {
                    latest.insert(entry.user_id, entry);
                }
            }
        }
        Ok(latest)
    }

    /// Each user's most recent weight, for attribution.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` when the file exists but cannot be read.
    pub fn latest_weight_per_user(&self) -> Result<BTreeMap<u32, f64>, StoreError> {
        Ok(self
            .latest_per_user()?
            .into_iter()
            .map(|(user_id, entry)| (user_id, entry.weight_kg))
            .collect())
    }

    /// Entries not yet acknowledged by the external service.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` when the file exists but cannot be read.
    pub fn unsynced(&self) -> Result<Vec<WeightEntry>, StoreError> {
        Ok(self
            .all_entries()?
            .into_iter()
            .filter(|entry| !entry.synced)
            .collect())
    }

    /// Flip `synced` to true for every stored row whose persisted
    /// `(user_id, weight, timestamp)` matches one of `matched`.
    ///
    /// Matching goes through the formatted on-disk representation on both
    /// sides, so float or formatting drift between write and read cannot
    /// cause a false negative. The whole file is rewritten to a tempfile in
    /// the log's directory and atomically renamed over the original; a
    /// crash mid-rewrite leaves the previous file intact. Rows that fail to
    /// parse are carried over verbatim — the rewrite never deletes or
    /// reorders anything. Idempotent: re-marking already-synced rows is a
    /// no-op.
    ///
    /// Returns the number of rows flipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on read/write failure and
    /// `StoreError::Rewrite` when the tempfile cannot be published.
    pub fn mark_synced(&self, matched: &[WeightEntry]) -> Result<usize, StoreError> {
        if matched.is_empty() {
            return Ok(0);
        }
        let keys: HashSet<SyncKey> = matched
            .iter()
            .map(|entry| SyncKey::of(entry, &self.datetime_format))
            .collect();

        let _guard = self.lock();
        self.ensure_file()?;

        let mut flipped = 0;
        let mut lines = vec![HEADER.to_string()];
        for row in self.read_rows()? {
            match row.entry {
                Some(mut entry) => {
                    if !entry.synced && keys.contains(&SyncKey::of(&entry, &self.datetime_format)) {
                        entry.synced = true;
                        flipped += 1;
                    }
                    lines.push(format::format_row(&entry, &self.datetime_format));
                }
                // Unparsable rows survive the rewrite untouched.
                None => lines.push(row.raw),
            }
        }

        self.publish_rewrite(&lines)?;
        if flipped > 0 {
            tracing::info!(flipped, "marked entries as synced");
        }
        Ok(flipped)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // A poisoned lock means a panic while holding it; the file itself
        // is still consistent (append is a single write, rewrite is
        // atomic), so continuing is safe.
        self.file_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Create the file with its header if it does not exist yet.
    fn ensure_file(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = fs::File::create(&self.path)?;
        writeln!(file, "{HEADER}")?;
        file.sync_all()?;
        tracing::info!(path = %self.path.display(), "created fresh weight log");
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        let mut rows = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line_no == 0 {
                // Header line.
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            let entry = format::parse_row(line, &self.datetime_format);
            if entry.is_none() {
                tracing::warn!(line_no = line_no + 1, "skipping malformed weight log row");
            }
            rows.push(RawRow {
                raw: line.to_string(),
                entry,
            });
        }
        Ok(rows)
    }

    /// Write the full file image to a sibling tempfile, then rename it over
    /// the log.
    fn publish_rewrite(&self, lines: &[String]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::Builder::new()
            .prefix(".weight-rewrite")
            .tempfile_in(dir)?;
        for line in lines {
            writeln!(temp, "{line}")?;
        }
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::Rewrite(e.to_string()))?;
        Ok(())
    }
}

/// One data line of the file, with its parse outcome.
struct RawRow {
    raw: String,
    entry: Option<WeightEntry>,
}
