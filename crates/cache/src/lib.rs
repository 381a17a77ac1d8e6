//! Stage cache — flat per-day files, one artifact per (date, stage).
//!
//! Layout under the data directory:
//!
//! ```text
//! <data>/2025-01-08/papers.json          stage "fetch"  — the Dataset
//! <data>/2025-01-08/tiers.json           stage "filter" — the TierAssignment
//! <data>/2025-01-08/report.md            stage "review" — the Report
//! <data>/2025-01-08/rejected-filter.txt  diagnostic, not a cache entry
//! <data>/latest                          date of the newest report
//! ```
//!
//! Every key is written at most once; regenerating a stage requires deleting
//! its file first. Writes go through a temp file and rename, so a failed run
//! never leaves a partial artifact behind. A cached entry that fails its
//! stage's validation predicate is treated as absent — recomputed, never
//! silently accepted.

use chrono::NaiveDate;
use paperscope_core::error::CacheError;
use paperscope_core::paper::Dataset;
use paperscope_core::stage::{PipelineState, Stage};
use paperscope_core::tiers::TierAssignment;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed cache of pipeline stage outputs, keyed by `(date, stage)`.
pub struct StageCache {
    root: PathBuf,
}

impl StageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.format("%Y-%m-%d").to_string())
    }

    /// Path of the artifact for `(date, stage)`.
    pub fn artifact_path(&self, date: NaiveDate, stage: Stage) -> PathBuf {
        let file = match stage {
            Stage::Fetch => "papers.json",
            Stage::Filter => "tiers.json",
            Stage::Review => "report.md",
        };
        self.day_dir(date).join(file)
    }

    /// Whether an artifact exists for `(date, stage)`.
    ///
    /// Existence alone does not make a stage complete — loads revalidate.
    pub fn has(&self, date: NaiveDate, stage: Stage) -> bool {
        self.artifact_path(date, stage).exists()
    }

    /// Where the pipeline stands for a date, judged by artifact existence.
    pub fn state(&self, date: NaiveDate) -> PipelineState {
        if self.has(date, Stage::Review) {
            PipelineState::Done
        } else if self.has(date, Stage::Filter) {
            PipelineState::Filtered
        } else if self.has(date, Stage::Fetch) {
            PipelineState::Fetched
        } else {
            PipelineState::NoData
        }
    }

    // --- fetch stage ---

    /// Load the cached dataset for a date.
    ///
    /// A file that cannot be parsed, or whose date does not match its key,
    /// is sidelined (renamed to `.invalid`, kept for diagnosis) and treated
    /// as absent, so a corrupted entry cannot poison every future rerun of
    /// the same date.
    pub fn load_dataset(&self, date: NaiveDate) -> Option<Dataset> {
        let path = self.artifact_path(date, Stage::Fetch);
        let content = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<Dataset>(&content) {
            Ok(dataset) if dataset.date == date => Some(dataset),
            Ok(dataset) => {
                warn!(path = %path.display(), cached_date = %dataset.date,
                      "Cached dataset is keyed by the wrong date, sidelining");
                sideline(&path);
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupted dataset cache, sidelining");
                sideline(&path);
                None
            }
        }
    }

    pub fn store_dataset(&self, dataset: &Dataset) -> Result<(), CacheError> {
        let path = self.fresh_path(dataset.date, Stage::Fetch)?;
        let json = serde_json::to_string_pretty(dataset)
            .map_err(|e| storage_err(&path, e.to_string()))?;
        self.atomic_write(&path, json.as_bytes())
    }

    // --- filter stage ---

    /// Load the cached tier assignment, gated on validation against the
    /// dataset it classifies. Invalid or unparseable entries are sidelined
    /// and treated as absent, forcing recomputation.
    pub fn load_valid_tiers(&self, date: NaiveDate, dataset: &Dataset) -> Option<TierAssignment> {
        let path = self.artifact_path(date, Stage::Filter);
        let content = fs::read_to_string(&path).ok()?;

        let tiers = match serde_json::from_str::<TierAssignment>(&content) {
            Ok(tiers) => tiers,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupted tier cache, sidelining");
                sideline(&path);
                return None;
            }
        };

        if let Err(e) = tiers.validate(dataset) {
            warn!(path = %path.display(), error = %e,
                  "Cached tier assignment fails validation, sidelining");
            sideline(&path);
            return None;
        }

        Some(tiers)
    }

    pub fn store_tiers(&self, date: NaiveDate, tiers: &TierAssignment) -> Result<(), CacheError> {
        let path = self.fresh_path(date, Stage::Filter)?;
        let json =
            serde_json::to_string_pretty(tiers).map_err(|e| storage_err(&path, e.to_string()))?;
        self.atomic_write(&path, json.as_bytes())
    }

    // --- review stage ---

    pub fn load_report(&self, date: NaiveDate) -> Option<String> {
        fs::read_to_string(self.artifact_path(date, Stage::Review)).ok()
    }

    pub fn store_report(&self, date: NaiveDate, report: &str) -> Result<(), CacheError> {
        let path = self.fresh_path(date, Stage::Review)?;
        self.atomic_write(&path, report.as_bytes())
    }

    // --- diagnostics ---

    /// Preserve a raw gateway reply that failed extraction. Not a cache
    /// entry: overwriting is allowed, and its existence never marks the
    /// stage complete.
    pub fn store_rejected(&self, date: NaiveDate, raw: &str) -> Result<PathBuf, CacheError> {
        let path = self.day_dir(date).join("rejected-filter.txt");
        self.atomic_write(&path, raw.as_bytes())?;
        Ok(path)
    }

    // --- latest pointer ---

    /// The date of the newest report, if any run has completed.
    pub fn latest(&self) -> Option<NaiveDate> {
        let content = fs::read_to_string(self.root.join("latest")).ok()?;
        NaiveDate::parse_from_str(content.trim(), "%Y-%m-%d").ok()
    }

    /// Point `latest` at a date. Called only on full pipeline success;
    /// unlike stage artifacts, the pointer is rewritten freely.
    pub fn set_latest(&self, date: NaiveDate) -> Result<(), CacheError> {
        let path = self.root.join("latest");
        self.atomic_write(&path, date.format("%Y-%m-%d").to_string().as_bytes())
    }

    // --- mutual exclusion ---

    /// Claim the right to compute `(date, stage)`.
    ///
    /// Creates a lock marker with `create_new`, so exactly one run at a time
    /// can execute a stage for a date. The marker is removed when the
    /// returned guard drops.
    pub fn begin(&self, date: NaiveDate, stage: Stage) -> Result<StageLock, CacheError> {
        let dir = self.day_dir(date);
        fs::create_dir_all(&dir).map_err(|e| storage_err(&dir, e.to_string()))?;

        let path = dir.join(format!(".lock.{stage}"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!(path = %path.display(), "Acquired stage lock");
                Ok(StageLock { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(CacheError::Busy {
                date: date.to_string(),
                stage: stage.as_str().into(),
            }),
            Err(e) => Err(storage_err(&path, e.to_string())),
        }
    }

    // --- internals ---

    /// The artifact path for `(date, stage)`, failing if already written.
    fn fresh_path(&self, date: NaiveDate, stage: Stage) -> Result<PathBuf, CacheError> {
        let path = self.artifact_path(date, stage);
        if path.exists() {
            return Err(CacheError::AlreadyWritten {
                date: date.to_string(),
                stage: stage.as_str().into(),
            });
        }
        Ok(path)
    }

    /// Write via temp file + rename so no partial artifact survives failure.
    fn atomic_write(&self, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
        let parent = path
            .parent()
            .ok_or_else(|| storage_err(path, "no parent directory".into()))?;
        fs::create_dir_all(parent).map_err(|e| storage_err(parent, e.to_string()))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes).map_err(|e| storage_err(&tmp, e.to_string()))?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            storage_err(path, e.to_string())
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote cache artifact");
        Ok(())
    }
}

/// Move an entry that failed its validation predicate out of the way,
/// keeping it on disk for diagnosis. After this the key reads as absent,
/// so write-once does not block the recomputation.
fn sideline(path: &Path) {
    let mut invalid = path.as_os_str().to_owned();
    invalid.push(".invalid");
    if let Err(e) = fs::rename(path, PathBuf::from(invalid)) {
        warn!(path = %path.display(), error = %e, "Failed to sideline invalid cache entry");
    }
}

fn storage_err(path: &Path, reason: String) -> CacheError {
    CacheError::Storage {
        path: path.display().to_string(),
        reason,
    }
}

/// Guard for a stage computation; removes the lock marker on drop.
pub struct StageLock {
    path: PathBuf,
}

impl Drop for StageLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove stage lock");
        }
    }
}
