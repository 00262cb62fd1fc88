//! File discovery in the race data directory.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{IngestError, Result, file_error};

/// A discovered file and the time used to rank it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    /// Creation time, or modification time where the platform has none.
    pub created: SystemTime,
}

impl FileCandidate {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let created = file_created_time(&path)?;
        Ok(Self { path, created })
    }

    fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}

/// Lists files in `dir` whose name starts with `prefix` and ends with the
/// given extension (case-insensitive).
///
/// Returns files sorted by filename.
pub fn list_files_with_prefix(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let matches_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(prefix));

        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

        if matches_prefix && matches_extension {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Creation time of a file, falling back to modification time.
pub fn file_created_time(path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path).map_err(|e| file_error(path, e))?;
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|e| file_error(path, e))
}

/// Modification time of a file as an RFC 3339 string.
pub fn file_modified_timestamp(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let datetime: DateTime<Utc> = modified.into();
    Some(datetime.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Picks the most recently created candidate.
///
/// Equal creation times are broken by the lexicographically greatest file
/// name, so the result never depends on directory listing order.
pub fn select_latest(candidates: &[FileCandidate]) -> Option<&FileCandidate> {
    candidates.iter().max_by(|a, b| compare_recency(a, b))
}

fn compare_recency(a: &FileCandidate, b: &FileCandidate) -> Ordering {
    a.created
        .cmp(&b.created)
        .then_with(|| a.file_name().cmp(&b.file_name()))
        .then_with(|| a.path.cmp(&b.path))
}

/// Finds the most recent file matching `prefix` and `extension` in `dir`.
///
/// Files whose metadata cannot be read are skipped.
pub fn latest_file_with_prefix(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Option<FileCandidate>> {
    let files = list_files_with_prefix(dir, prefix, extension)?;
    let mut candidates = Vec::with_capacity(files.len());
    for path in files {
        match FileCandidate::from_path(&path) {
            Ok(candidate) => candidates.push(candidate),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Skipping unreadable candidate file");
            }
        }
    }
    Ok(select_latest(&candidates).cloned())
}
