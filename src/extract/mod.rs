//! Record extraction from the JSON-lines song and log datasets.

mod log_file;
mod records;
mod song_file;

pub use log_file::{extract_log_file, parse_log_lines, LogBatch, NEXT_SONG_PAGE};
pub use records::{Artist, PlayEvent, Song, SongPlay, TimeRecord, User};
pub use song_file::{extract_song_file, parse_song_lines, SongFileRecords};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while turning a data file into records.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid field `{field}` in {path} at line {line}: {reason}")]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        reason: String,
    },

    #[error("No song record in {0}")]
    EmptySongFile(PathBuf),
}

fn read_file(path: &Path) -> Result<String, ExtractError> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Parses one JSON object per non-blank line, keeping 1-based line numbers.
fn parse_json_lines<T: DeserializeOwned>(
    path: &Path,
    text: &str,
) -> Result<Vec<(usize, T)>, ExtractError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map(|row| (index + 1, row))
                .map_err(|source| ExtractError::Json {
                    path: path.to_owned(),
                    line: index + 1,
                    source,
                })
        })
        .collect()
}
