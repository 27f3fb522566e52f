use super::{parse_json_lines, read_file, ExtractError, PlayEvent, TimeRecord, User};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// The `page` value of log entries that record an actual playback.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// `userId` is a string in the event log ("" for logged-out visitors), but
/// numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(i64),
    Text(String),
}

/// Row of the event log. Every field is optional because non-playback
/// entries (Home, Login, ...) leave most of them null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogEvent {
    page: Option<String>,
    ts: Option<i64>,
    user_id: Option<RawUserId>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<f64>,
    session_id: Option<i64>,
    location: Option<String>,
    user_agent: Option<String>,
}

impl RawLogEvent {
    fn is_next_song(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }

    fn into_play_event(self, path: &Path, line: usize) -> Result<PlayEvent, ExtractError> {
        let invalid = |field: &'static str, reason: String| ExtractError::InvalidField {
            path: path.to_owned(),
            line,
            field,
            reason,
        };

        let ts = self.ts.ok_or_else(|| invalid("ts", "missing".to_string()))?;
        let start_time = DateTime::<Utc>::from_timestamp_millis(ts)
            .ok_or_else(|| invalid("ts", format!("{ts} is out of range")))?
            .naive_utc();

        let user_id = match self.user_id {
            Some(RawUserId::Number(id)) => id,
            Some(RawUserId::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid("userId", format!("{text:?} is not an integer")))?,
            None => return Err(invalid("userId", "missing".to_string())),
        };
        let level = self
            .level
            .ok_or_else(|| invalid("level", "missing".to_string()))?;
        let session_id = self
            .session_id
            .ok_or_else(|| invalid("sessionId", "missing".to_string()))?;

        Ok(PlayEvent {
            start_time,
            user: User {
                user_id,
                first_name: self.first_name,
                last_name: self.last_name,
                gender: self.gender,
                level,
            },
            session_id,
            location: self.location,
            user_agent: self.user_agent,
            song: self.song,
            artist: self.artist,
            length: self.length,
        })
    }
}

/// The NextSong events of one log file, in file order.
///
/// Time, user and songplay record sets are derived lazily from the events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBatch {
    pub events: Vec<PlayEvent>,
}

impl LogBatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// One record per event; repeated timestamps are left to the upsert.
    pub fn time_records(&self) -> impl Iterator<Item = TimeRecord> + '_ {
        self.events.iter().map(|e| TimeRecord::from(e.start_time))
    }

    /// One record per event, carrying the level as of that event.
    pub fn user_records(&self) -> impl Iterator<Item = &User> + '_ {
        self.events.iter().map(|e| &e.user)
    }
}

pub fn extract_log_file(path: &Path) -> Result<LogBatch, ExtractError> {
    let text = read_file(path)?;
    parse_log_lines(path, &text)
}

pub fn parse_log_lines(path: &Path, text: &str) -> Result<LogBatch, ExtractError> {
    let rows: Vec<(usize, RawLogEvent)> = parse_json_lines(path, text)?;
    let events = rows
        .into_iter()
        .filter(|(_, raw)| raw.is_next_song())
        .map(|(line, raw)| raw.into_play_event(path, line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LogBatch { events })
}
