//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure, plus
//! the one-file-per-entity helpers the stores are built on.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read JSON from a file, returning an error if file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(LedgerError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| LedgerError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| LedgerError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Path of the file holding the entity with `id`
pub fn entity_path(dir: &Path, id: impl Display) -> PathBuf {
    dir.join(format!("{}.json", id))
}

/// Result of reading a directory of entity files
#[derive(Debug)]
pub struct LoadedEntities<T> {
    pub entities: Vec<T>,
    /// Files that existed but could not be read or parsed
    pub skipped: usize,
}

impl<T> LoadedEntities<T> {
    /// True when the directory held no entity files at all
    pub fn is_fresh(&self) -> bool {
        self.entities.is_empty() && self.skipped == 0
    }
}

/// Read every `*.json` file in `dir`.
///
/// A file that cannot be parsed is skipped with a warning; only a failure to
/// list the directory itself is an error. A missing directory reads as empty.
pub fn load_entities<T>(dir: &Path) -> Result<LoadedEntities<T>, LedgerError>
where
    T: DeserializeOwned,
{
    let mut loaded = LoadedEntities {
        entities: Vec::new(),
        skipped: 0,
    };

    if !dir.exists() {
        return Ok(loaded);
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| LedgerError::Storage(format!("Failed to list {}: {}", dir.display(), e)))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        match read_json_required::<T, _>(&path) {
            Ok(entity) => loaded.entities.push(entity),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entity file");
                loaded.skipped += 1;
            }
        }
    }

    Ok(loaded)
}
