use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;

/// File-based JSON cache, one file per key
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    /// Create a new cache instance
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        // Create cache directory if it doesn't exist
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    /// Save data to cache, replacing the previous file in one step
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let file_path = self.path(key);
        write_json_atomic(&file_path, data).with_context(|| cache_context("save", key))?;

        info!("Saved data to cache: {}", file_path.display());
        Ok(())
    }

    /// Load data from cache
    pub fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        let file_path = self.path(key);

        if !file_path.exists() {
            return Ok(None);
        }

        let data = read_json(&file_path).with_context(|| cache_context("load", key))?;

        info!("Loaded data from cache: {}", file_path.display());
        Ok(Some(data))
    }

    /// Check if cached data exists
    pub fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }

    /// Clear all cached data
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.cache_dir).context("Failed to clear cache")?;

        fs::create_dir_all(&self.cache_dir).context("Failed to recreate cache directory")?;

        info!("Cleared cache directory");
        Ok(())
    }

    /// File backing `key`
    pub fn path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

/// Write JSON next to `path` and rename it into place, so readers never
/// see a half-written file
pub fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let temp_path = write_temp(path, data)?;
    move_into_place(&temp_path, path)
}

/// A group of JSON files that replace their targets together. Every file is
/// written to a temporary path first; targets are only touched by `commit`.
/// Dropping uncommitted writes removes the temporary files.
#[derive(Debug, Default)]
pub struct StagedWrites {
    staged: Vec<(PathBuf, PathBuf)>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage<T: Serialize>(&mut self, path: &Path, data: &T) -> Result<()> {
        let temp_path = write_temp(path, data)?;
        self.staged.push((temp_path, path.to_path_buf()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Rename every staged file into place; returns the target paths
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let staged = std::mem::take(&mut self.staged);
        let mut written = Vec::with_capacity(staged.len());

        for (index, (temp_path, path)) in staged.iter().enumerate() {
            if let Err(e) = move_into_place(temp_path, path) {
                remove_temps(&staged[index..]);
                return Err(e);
            }
            written.push(path.clone());
        }
        Ok(written)
    }
}

impl Drop for StagedWrites {
    fn drop(&mut self) {
        remove_temps(&self.staged);
    }
}

fn remove_temps(staged: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in staged {
        let _ = fs::remove_file(temp_path);
    }
}

fn write_temp<T: Serialize>(path: &Path, data: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(&temp_path, json).context("Failed to write temporary file")?;
    Ok(temp_path)
}

fn move_into_place(temp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(temp_path, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))
}

pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).with_context(|| {
        format!(
            "Failed to parse JSON from {:?}. First 200 chars: {}",
            path,
            json.chars().take(200).collect::<String>()
        )
    })
}
