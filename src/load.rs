//! Per-file load steps: extract records from one file and write them with
//! the catalog's insert statements.

use crate::extract::{
    extract_log_file, extract_song_file, Artist, Song, SongPlay, TimeRecord, User,
};
use crate::resolver::SongResolver;
use crate::schema::Statements;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Statement};
use std::ops::AddAssign;
use std::path::Path;
use tracing::debug;

/// A record that can bind itself to its table's insert statement.
pub trait Insertable {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl<T: Insertable + ?Sized> Insertable for &T {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        (**self).insert(stmt)
    }
}

impl Insertable for Song {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.song_id,
            self.title,
            self.artist_id,
            self.year,
            self.duration
        ])
    }
}

impl Insertable for Artist {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.artist_id,
            self.name,
            self.location,
            self.latitude,
            self.longitude
        ])
    }
}

impl Insertable for User {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.user_id,
            self.first_name,
            self.last_name,
            self.gender,
            self.level
        ])
    }
}

impl Insertable for TimeRecord {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.start_time,
            self.hour,
            self.day,
            self.week,
            self.month,
            self.year,
            self.weekday
        ])
    }
}

impl Insertable for SongPlay {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.start_time,
            self.user_id,
            self.level,
            self.song_id,
            self.artist_id,
            self.session_id,
            self.location,
            self.user_agent
        ])
    }
}

/// Executes `sql` once per record, in iteration order. Returns the number of
/// records executed (conflicting rows count even when the upsert skips them).
pub fn insert_all<I>(conn: &Connection, sql: &str, records: I) -> Result<usize>
where
    I: IntoIterator,
    I::Item: Insertable,
{
    let mut stmt = conn
        .prepare_cached(sql)
        .with_context(|| format!("Failed to prepare {sql}"))?;
    let mut count = 0;
    for record in records {
        record
            .insert(&mut stmt)
            .with_context(|| format!("Failed to execute {sql}"))?;
        count += 1;
    }
    Ok(count)
}

/// Records written by one or more files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub files: usize,
    pub songs: usize,
    pub artists: usize,
    pub time_rows: usize,
    pub users: usize,
    pub songplays: usize,
    pub resolved_songplays: usize,
}

impl AddAssign for LoadStats {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.songs += other.songs;
        self.artists += other.artists;
        self.time_rows += other.time_rows;
        self.users += other.users;
        self.songplays += other.songplays;
        self.resolved_songplays += other.resolved_songplays;
    }
}

/// Loads the song and artist of one song file.
pub fn load_song_file(conn: &Connection, statements: &Statements, path: &Path) -> Result<LoadStats> {
    let records = extract_song_file(path)?;

    let songs = insert_all(conn, &statements.songs.insert, [&records.song])?;
    let artists = insert_all(conn, &statements.artists.insert, [&records.artist])?;
    debug!(
        "Loaded song {} by artist {} from {}",
        records.song.song_id,
        records.artist.artist_id,
        path.display()
    );

    Ok(LoadStats {
        files: 1,
        songs,
        artists,
        ..Default::default()
    })
}

/// Loads the NextSong events of one log file: time rows, then users, then
/// songplays with song/artist ids resolved against the loaded catalog.
pub fn load_log_file(conn: &Connection, statements: &Statements, path: &Path) -> Result<LoadStats> {
    let batch = extract_log_file(path)?;
    if batch.is_empty() {
        debug!("No playback events in {}", path.display());
        return Ok(LoadStats {
            files: 1,
            ..Default::default()
        });
    }

    let time_rows = insert_all(conn, &statements.time.insert, batch.time_records())?;
    let users = insert_all(conn, &statements.users.insert, batch.user_records())?;

    let resolver = SongResolver::new(conn, statements);
    let mut resolved_songplays = 0;
    let songplays = batch
        .events
        .iter()
        .map(|event| -> Result<SongPlay> {
            let song_match = resolver.resolve_event(event)?;
            if song_match.is_found() {
                resolved_songplays += 1;
            }
            let (song_id, artist_id) = song_match.into_ids();
            Ok(SongPlay::new(event, song_id, artist_id))
        })
        .collect::<Result<Vec<_>>>()?;
    let songplays = insert_all(conn, &statements.songplays.insert, &songplays)?;

    debug!(
        "Loaded {} songplays ({} resolved) from {}",
        songplays,
        resolved_songplays,
        path.display()
    );

    Ok(LoadStats {
        files: 1,
        time_rows,
        users,
        songplays,
        resolved_songplays,
        ..Default::default()
    })
}
