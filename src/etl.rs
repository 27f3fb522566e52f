//! The two load passes: song files first, so that log events can resolve
//! against the songs and artists already in the warehouse.

use crate::load::{load_log_file, load_song_file, LoadStats};
use crate::schema::{Statements, TableCounts};
use crate::walker::{process_data, ProgressReporter};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtlSummary {
    pub songs: LoadStats,
    pub logs: LoadStats,
    pub counts: TableCounts,
}

/// Creates the five tables if missing and checks their shape. With `reset`,
/// drops them first.
pub fn prepare_tables(conn: &Connection, statements: &Statements, reset: bool) -> Result<()> {
    if reset {
        statements.drop_tables(conn)?;
    }
    statements.create_tables(conn)?;
    statements
        .validate_tables(conn)
        .context("Warehouse tables do not match the expected schema")
}

pub fn load_song_data(
    conn: &mut Connection,
    statements: &Statements,
    root: &Path,
    reporter: &mut dyn ProgressReporter,
) -> Result<LoadStats> {
    process_data(conn, root, reporter, |conn, path| {
        load_song_file(conn, statements, path)
    })
}

pub fn load_log_data(
    conn: &mut Connection,
    statements: &Statements,
    root: &Path,
    reporter: &mut dyn ProgressReporter,
) -> Result<LoadStats> {
    process_data(conn, root, reporter, |conn, path| {
        load_log_file(conn, statements, path)
    })
}

pub fn run(
    conn: &mut Connection,
    statements: &Statements,
    song_data: &Path,
    log_data: &Path,
    reporter: &mut dyn ProgressReporter,
) -> Result<EtlSummary> {
    info!("Loading song data from {}...", song_data.display());
    let songs = load_song_data(conn, statements, song_data, reporter)
        .context("Song data load failed")?;

    info!("Loading log data from {}...", log_data.display());
    let logs =
        load_log_data(conn, statements, log_data, reporter).context("Log data load failed")?;

    let counts = statements.count_rows(conn)?;
    Ok(EtlSummary {
        songs,
        logs,
        counts,
    })
}

impl EtlSummary {
    pub fn log(&self) {
        info!("");
        info!("Load Summary");
        info!("============");
        info!("Song files loaded: {}", self.songs.files);
        info!("Log files loaded: {}", self.logs.files);
        info!(
            "Songplays loaded: {} ({} matched a song)",
            self.logs.songplays, self.logs.resolved_songplays
        );
        info!("");
        info!("Warehouse contains:");
        info!("  {} songplays", self.counts.songplays);
        info!("  {} users", self.counts.users);
        info!("  {} songs", self.counts.songs);
        info!("  {} artists", self.counts.artists);
        info!("  {} time rows", self.counts.time);
    }
}
