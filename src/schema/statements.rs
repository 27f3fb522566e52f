//! Statement catalog for the five warehouse tables.
//!
//! Built once at startup and handed to every component that talks to the
//! database. Insert placeholders follow the field order of the records the
//! extractors produce.

use super::tables::{ARTISTS_TABLE, SONGPLAYS_TABLE, SONGS_TABLE, TIME_TABLE, USERS_TABLE};
use crate::sqlite_persistence::Table;
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, info};

const SONG_INSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration) \
     VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT DO NOTHING;";

const ARTIST_INSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude) \
     VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT DO NOTHING;";

const USER_INSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level) \
     VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT (user_id) DO UPDATE SET level = excluded.level;";

const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
     ON CONFLICT DO NOTHING;";

const SONGPLAY_INSERT: &str = "INSERT INTO songplays \
     (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
     ON CONFLICT DO NOTHING;";

// Exact match on (title, artist name, duration). With several matches the
// engine's first row wins.
const SONG_SELECT: &str = "SELECT s.song_id, s.artist_id \
     FROM songs AS s \
     LEFT JOIN artists AS a ON s.artist_id = a.artist_id \
     WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3;";

/// DDL and DML for a single table.
#[derive(Debug, Clone)]
pub struct EntityStatements {
    pub table: &'static Table,
    pub create: String,
    pub drop: String,
    pub insert: String,
}

impl EntityStatements {
    fn new(table: &'static Table, insert: &str) -> Self {
        EntityStatements {
            table,
            create: table.create_sql(),
            drop: table.drop_sql(),
            insert: insert.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Statements {
    pub songs: EntityStatements,
    pub artists: EntityStatements,
    pub users: EntityStatements,
    pub time: EntityStatements,
    pub songplays: EntityStatements,
    pub song_select: String,
}

/// Row counts of the five tables, in catalog order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songplays: usize,
    pub users: usize,
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
}

impl Default for Statements {
    fn default() -> Self {
        Self::new()
    }
}

impl Statements {
    pub fn new() -> Self {
        Statements {
            songs: EntityStatements::new(&SONGS_TABLE, SONG_INSERT),
            artists: EntityStatements::new(&ARTISTS_TABLE, ARTIST_INSERT),
            users: EntityStatements::new(&USERS_TABLE, USER_INSERT),
            time: EntityStatements::new(&TIME_TABLE, TIME_INSERT),
            songplays: EntityStatements::new(&SONGPLAYS_TABLE, SONGPLAY_INSERT),
            song_select: SONG_SELECT.to_owned(),
        }
    }

    /// All entities, fact table first.
    pub fn entities(&self) -> [&EntityStatements; 5] {
        [
            &self.songplays,
            &self.users,
            &self.songs,
            &self.artists,
            &self.time,
        ]
    }

    pub fn create_tables(&self, conn: &Connection) -> Result<()> {
        for entity in self.entities() {
            debug!("Creating table {} if missing", entity.table.name);
            conn.execute(&entity.create, [])
                .with_context(|| format!("Failed to create table {}", entity.table.name))?;
        }
        Ok(())
    }

    pub fn drop_tables(&self, conn: &Connection) -> Result<()> {
        for entity in self.entities() {
            info!("Dropping table {}", entity.table.name);
            conn.execute(&entity.drop, [])
                .with_context(|| format!("Failed to drop table {}", entity.table.name))?;
        }
        Ok(())
    }

    /// Checks that every table exists with the declared shape.
    pub fn validate_tables(&self, conn: &Connection) -> Result<()> {
        for entity in self.entities() {
            entity.table.validate(conn)?;
        }
        Ok(())
    }

    pub fn count_rows(&self, conn: &Connection) -> Result<TableCounts> {
        Ok(TableCounts {
            songplays: self.songplays.table.count_rows(conn)?,
            users: self.users.table.count_rows(conn)?,
            songs: self.songs.table.count_rows(conn)?,
            artists: self.artists.table.count_rows(conn)?,
            time: self.time.table.count_rows(conn)?,
        })
    }
}
