//! Dataset and warehouse fixtures for end-to-end tests

#![allow(dead_code)]

use super::constants::*;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::{json, Value};
use songplay_etl::{etl, DbConfig, LoadStats, ProgressReporter, Statements};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A song-dataset row.
pub fn song_json(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
    year: i64,
) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": year,
    })
}

pub fn song_1_json() -> Value {
    song_json(
        SONG_1_ID,
        SONG_1_TITLE,
        ARTIST_1_ID,
        ARTIST_1_NAME,
        SONG_1_DURATION,
        2000,
    )
}

pub fn song_2_json() -> Value {
    let mut song = song_json(
        SONG_2_ID,
        SONG_2_TITLE,
        ARTIST_2_ID,
        ARTIST_2_NAME,
        SONG_2_DURATION,
        0,
    );
    song["artist_latitude"] = json!(48.85692);
    song["artist_longitude"] = json!(2.34121);
    song["artist_location"] = json!("Paris, France");
    song
}

/// A NextSong event by `user_id`.
pub fn play_event(
    ts: i64,
    user_id: i64,
    first_name: &str,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": first_name,
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Tester",
        "length": length,
        "level": level,
        "location": "Lansing-East Lansing, MI",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540806385796.0,
        "sessionId": 583,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
        "userId": user_id.to_string(),
    })
}

/// A page view that is not a playback.
pub fn page_event(ts: i64, page: &str, user_id: Option<i64>) -> Value {
    json!({
        "artist": null,
        "auth": if user_id.is_some() { "Logged In" } else { "Logged Out" },
        "firstName": null,
        "gender": null,
        "itemInSession": 1,
        "lastName": null,
        "length": null,
        "level": "free",
        "location": null,
        "method": "GET",
        "page": page,
        "registration": null,
        "sessionId": 52,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": user_id.map(|id| id.to_string()).unwrap_or_default(),
    })
}

#[derive(Default)]
pub struct RecordingProgress {
    pub found: Vec<(PathBuf, usize)>,
    pub processed: Vec<(usize, usize)>,
}

impl ProgressReporter for RecordingProgress {
    fn files_found(&mut self, root: &Path, total: usize) {
        self.found.push((root.to_path_buf(), total));
    }

    fn file_processed(&mut self, _path: &Path, index: usize, total: usize) {
        self.processed.push((index, total));
    }
}

/// Temporary song/log dataset plus a fresh warehouse database file.
pub struct TestWarehouse {
    pub dir: TempDir,
    pub song_root: PathBuf,
    pub log_root: PathBuf,
    pub db_path: PathBuf,
    pub conn: Connection,
    pub statements: Statements,
    pub progress: RecordingProgress,
}

impl TestWarehouse {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let song_root = dir.path().join("data/song_data");
        let log_root = dir.path().join("data/log_data");
        fs::create_dir_all(&song_root).unwrap();
        fs::create_dir_all(&log_root).unwrap();
        let db_path = dir.path().join("warehouse.db");

        let config = DbConfig {
            dbname: Some(db_path.to_string_lossy().to_string()),
            ..Default::default()
        };
        let conn = config.connect().unwrap();
        let statements = Statements::new();
        etl::prepare_tables(&conn, &statements, false).unwrap();

        TestWarehouse {
            dir,
            song_root,
            log_root,
            db_path,
            conn,
            statements,
            progress: RecordingProgress::default(),
        }
    }

    fn write_lines(path: &Path, rows: &[Value]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let text = rows
            .iter()
            .map(|row| row.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(path, text).unwrap();
    }

    /// Writes a song file under the song root, e.g. `"A/B/C/TRABC.json"`.
    pub fn write_song_file(&self, relative: &str, song: &Value) -> PathBuf {
        let path = self.song_root.join(relative);
        Self::write_lines(&path, std::slice::from_ref(song));
        path
    }

    /// Writes a JSON-lines log file under the log root.
    pub fn write_log_file(&self, relative: &str, events: &[Value]) -> PathBuf {
        let path = self.log_root.join(relative);
        Self::write_lines(&path, events);
        path
    }

    pub fn write_raw_log_file(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.log_root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    pub fn load_songs(&mut self) -> Result<LoadStats> {
        etl::load_song_data(
            &mut self.conn,
            &self.statements,
            &self.song_root,
            &mut self.progress,
        )
    }

    pub fn load_logs(&mut self) -> Result<LoadStats> {
        etl::load_log_data(
            &mut self.conn,
            &self.statements,
            &self.log_root,
            &mut self.progress,
        )
    }

    pub fn count(&self, table: &str) -> i64 {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    /// `(song_id, artist_id)` of every songplay, in insertion order.
    pub fn songplay_ids(&self) -> Vec<(Option<String>, Option<String>)> {
        let mut stmt = self
            .conn
            .prepare("SELECT song_id, artist_id FROM songplays ORDER BY songplay_id")
            .unwrap();
        stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    /// `(first_name, level)` of a stored user.
    pub fn user(&self, user_id: i64) -> Option<(String, String)> {
        self.conn
            .query_row(
                "SELECT first_name, level FROM users WHERE user_id = ?1",
                [user_id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .ok()
    }
}
