//! Typed records produced by the extractors, one struct per target table.

use chrono::{Datelike, NaiveDateTime, Timelike};

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A user as seen by one log event, with the subscription level at that time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRecord {
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

impl From<NaiveDateTime> for TimeRecord {
    fn from(start_time: NaiveDateTime) -> Self {
        TimeRecord {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        }
    }
}

/// One NextSong log entry. Song and artist ids are not known yet, they come
/// from the resolver at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub start_time: NaiveDateTime,
    pub user: User,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongPlay {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongPlay {
    pub fn new(event: &PlayEvent, song_id: Option<String>, artist_id: Option<String>) -> Self {
        SongPlay {
            start_time: event.start_time,
            user_id: event.user.user_id,
            level: event.user.level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        }
    }
}
