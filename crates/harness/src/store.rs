//! Result artifacts on disk
//!
//! One JSON file per execution mode inside a results directory. Keys are
//! integers written as text, matching what `json.dump` produces for the same
//! mappings, so artifacts from earlier runs keep loading.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mode::ExecutionMode;
use crate::results::RawResultSet;

/// Result store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact has been written for the mode
    #[error("no {mode} results at {} (run the experiment first)", .path.display())]
    Missing { mode: ExecutionMode, path: PathBuf },

    /// Filesystem failure reading or writing an artifact
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Artifact exists but is not a valid result map for its mode
    #[error("malformed {mode} results in {}: {source}", .path.display())]
    Malformed {
        mode: ExecutionMode,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Result set could not be encoded
    #[error("failed to encode {mode} results: {source}")]
    Encode {
        mode: ExecutionMode,
        #[source]
        source: serde_json::Error,
    },

    /// Result set shape does not belong to the mode it is written under
    #[error("result set shape does not match mode {mode}")]
    ModeMismatch { mode: ExecutionMode },
}

/// Directory of per-mode result artifacts
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the artifact for `mode`
    pub fn artifact_path(&self, mode: ExecutionMode) -> PathBuf {
        self.dir.join(mode.artifact_name())
    }

    /// Whether an artifact exists for `mode`
    pub fn contains(&self, mode: ExecutionMode) -> bool {
        self.artifact_path(mode).is_file()
    }

    /// Persist `results` as the artifact for `mode`, replacing any earlier one
    pub fn write(&self, mode: ExecutionMode, results: &RawResultSet) -> Result<PathBuf, StoreError> {
        if !results.matches_mode(mode) {
            return Err(StoreError::ModeMismatch { mode });
        }

        let path = self.artifact_path(mode);
        let json = serde_json::to_vec(results).map_err(|source| StoreError::Encode { mode, source })?;

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        // Write to a sibling temp file first so a crash never leaves half an artifact
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(%mode, path = %path.display(), keys = results.len(), "Wrote result artifact");
        Ok(path)
    }

    /// Load the artifact for `mode`
    pub fn read(&self, mode: ExecutionMode) -> Result<RawResultSet, StoreError> {
        let path = self.artifact_path(mode);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing { mode, path });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let malformed = |source| StoreError::Malformed {
            mode,
            path: path.clone(),
            source,
        };

        let results = if mode.is_threaded() {
            let samples: BTreeMap<u32, Vec<f64>> =
                serde_json::from_slice(&bytes).map_err(malformed)?;
            RawResultSet::Threaded(samples)
        } else {
            let samples: BTreeMap<u32, f64> = serde_json::from_slice(&bytes).map_err(malformed)?;
            RawResultSet::Sequential(samples)
        };

        tracing::debug!(%mode, path = %path.display(), keys = results.len(), "Read result artifact");
        Ok(results)
    }
}
