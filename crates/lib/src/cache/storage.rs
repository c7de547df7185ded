//! On-disk storage for configuration cache entries.
//!
//! # Storage Layout
//!
//! ```text
//! {base_path}/
//! ├── <key>.json          # CacheEntry
//! └── <key>.json.tmp      # transient, during atomic writes
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::consts::{CACHE_ENTRY_EXT, CACHE_FORMAT_VERSION};

use super::types::{CacheEntry, CacheError};

/// Reads and writes cache entries under a base directory.
///
/// Writes are atomic (write to temp, then rename) so a crash never leaves a
/// half-written entry behind.
#[derive(Debug, Clone)]
pub struct CacheStore {
  base_path: PathBuf,
}

impl CacheStore {
  /// Create a store rooted at `base_path`. The directory is created on first save.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  /// The directory entries are stored in.
  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
    validate_key(key)?;
    Ok(self.base_path.join(format!("{}.{}", key, CACHE_ENTRY_EXT)))
  }

  /// Save `entry` under its key, replacing any previous entry.
  ///
  /// Entries holding values that would not load back (NaN or infinite floats)
  /// are rejected before anything is written.
  pub fn save(&self, entry: &CacheEntry) -> Result<(), CacheError> {
    let path = self.entry_path(&entry.key)?;
    entry.validate()?;

    info!(
      key = %entry.key,
      path = %path.display(),
      property_count = entry.properties.len(),
      "saving cache entry"
    );

    fs::create_dir_all(&self.base_path).map_err(CacheError::CreateDir)?;

    let content = serde_json::to_string_pretty(entry).map_err(CacheError::Serialize)?;
    let temp_path = path.with_extension(format!("{}.tmp", CACHE_ENTRY_EXT));
    fs::write(&temp_path, &content).map_err(CacheError::Write)?;
    fs::rename(&temp_path, &path).map_err(CacheError::Write)?;

    debug!(key = %entry.key, bytes = content.len(), "cache entry written");
    Ok(())
  }

  /// Load the entry stored under `key`.
  ///
  /// Returns `Ok(None)` if no entry exists.
  pub fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
    let path = self.entry_path(key)?;

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(key, path = %path.display(), "no cache entry");
        return Ok(None);
      }
      Err(e) => return Err(CacheError::Read(e)),
    };

    let entry: CacheEntry = serde_json::from_str(&content).map_err(CacheError::Parse)?;
    if entry.version != CACHE_FORMAT_VERSION {
      return Err(CacheError::UnsupportedVersion(entry.version));
    }

    info!(key, property_count = entry.properties.len(), "loaded cache entry");
    Ok(Some(entry))
  }

  /// Remove the entry stored under `key`. Silently succeeds if there is none.
  pub fn remove(&self, key: &str) -> Result<(), CacheError> {
    let path = self.entry_path(key)?;
    match fs::remove_file(&path) {
      Ok(()) => {
        info!(key, "removed cache entry");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(CacheError::Remove(e)),
    }
  }
}

/// Keys become file names: ASCII alphanumerics, `-`, `_` and `.`, not starting with `.`.
fn validate_key(key: &str) -> Result<(), CacheError> {
  let valid = !key.is_empty()
    && !key.starts_with('.')
    && key
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
  if valid {
    Ok(())
  } else {
    Err(CacheError::InvalidKey(key.to_string()))
  }
}
