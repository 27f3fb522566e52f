//! Song/artist id lookup for playback events.

use crate::extract::PlayEvent;
use crate::schema::Statements;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// Outcome of matching a played track against the loaded song catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongMatch {
    Found { song_id: String, artist_id: String },
    NotFound,
}

impl SongMatch {
    pub fn is_found(&self) -> bool {
        matches!(self, SongMatch::Found { .. })
    }

    /// `(song_id, artist_id)` as stored in `songplays`; both NULL on a miss.
    pub fn into_ids(self) -> (Option<String>, Option<String>) {
        match self {
            SongMatch::Found { song_id, artist_id } => (Some(song_id), Some(artist_id)),
            SongMatch::NotFound => (None, None),
        }
    }
}

/// Resolves (title, artist name, duration) triples with the catalog's
/// lookup query. A miss is an expected outcome, not an error.
pub struct SongResolver<'a> {
    conn: &'a Connection,
    statements: &'a Statements,
}

impl<'a> SongResolver<'a> {
    pub fn new(conn: &'a Connection, statements: &'a Statements) -> Self {
        SongResolver { conn, statements }
    }

    pub fn resolve(&self, title: &str, artist_name: &str, duration: f64) -> Result<SongMatch> {
        let mut stmt = self
            .conn
            .prepare_cached(&self.statements.song_select)
            .context("Failed to prepare song lookup")?;
        match stmt.query_row(params![title, artist_name, duration], |r| {
            Ok(SongMatch::Found {
                song_id: r.get(0)?,
                artist_id: r.get(1)?,
            })
        }) {
            Ok(found) => Ok(found),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(SongMatch::NotFound),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to look up song {title:?} by {artist_name:?} ({duration})")
            }),
        }
    }

    /// Events missing any part of the triple cannot match and skip the query.
    pub fn resolve_event(&self, event: &PlayEvent) -> Result<SongMatch> {
        match (&event.song, &event.artist, event.length) {
            (Some(title), Some(artist_name), Some(duration)) => {
                self.resolve(title, artist_name, duration)
            }
            _ => Ok(SongMatch::NotFound),
        }
    }
}
