//! Data file discovery and the commit-per-file batch driver.

use crate::load::LoadStats;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use walkdir::WalkDir;

/// Extension of the data files picked up under a root.
pub const DATA_FILE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk {root}: {source}")]
    Io {
        root: PathBuf,
        source: walkdir::Error,
    },
}

/// Observer for batch progress.
pub trait ProgressReporter {
    fn files_found(&mut self, root: &Path, total: usize);

    /// `index` is 1-based.
    fn file_processed(&mut self, path: &Path, index: usize, total: usize);
}

/// Reports progress through `tracing`.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn files_found(&mut self, root: &Path, total: usize) {
        info!("{} files found in {}", total, root.display());
    }

    fn file_processed(&mut self, _path: &Path, index: usize, total: usize) {
        info!("{}/{} files processed.", index, total);
    }
}

fn is_data_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(true);
    !hidden && path.extension().and_then(|e| e.to_str()) == Some(DATA_FILE_EXTENSION)
}

/// Recursively collects the data files under `root`, sorted by path.
pub fn find_data_files(root: &Path) -> Result<Vec<PathBuf>, WalkError> {
    if !root.exists() {
        return Err(WalkError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| WalkError::Io {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_data_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Runs `load_file` on every data file under `root`, one transaction per
/// file, committed as soon as the file is loaded.
///
/// The first failure aborts the batch: earlier files stay committed and the
/// failing file's transaction is rolled back.
pub fn process_data<F>(
    conn: &mut Connection,
    root: &Path,
    reporter: &mut dyn ProgressReporter,
    mut load_file: F,
) -> Result<LoadStats>
where
    F: FnMut(&Connection, &Path) -> Result<LoadStats>,
{
    let files = find_data_files(root)?;
    let total = files.len();
    reporter.files_found(root, total);

    let mut stats = LoadStats::default();
    for (index, path) in files.iter().enumerate() {
        let tx = conn.transaction()?;
        stats += load_file(&*tx, path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        tx.commit()
            .with_context(|| format!("Failed to commit {}", path.display()))?;
        reporter.file_processed(path, index + 1, total);
    }
    Ok(stats)
}
