use super::{parse_json_lines, read_file, Artist, ExtractError, Song};
use serde::Deserialize;
use std::path::Path;

/// Row of the song dataset. `num_songs` and any other extra fields are ignored.
#[derive(Debug, Deserialize)]
struct RawSong {
    song_id: String,
    title: String,
    artist_id: String,
    // Integral in the dataset, stored as a float.
    year: f64,
    duration: f64,
    artist_name: String,
    artist_location: Option<String>,
    artist_latitude: Option<f64>,
    artist_longitude: Option<f64>,
}

/// The two records a song file contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SongFileRecords {
    pub song: Song,
    pub artist: Artist,
}

pub fn extract_song_file(path: &Path) -> Result<SongFileRecords, ExtractError> {
    let text = read_file(path)?;
    parse_song_lines(path, &text)
}

/// Builds the song and artist records from the first row. Song files hold a
/// single record; later rows are not read.
pub fn parse_song_lines(path: &Path, text: &str) -> Result<SongFileRecords, ExtractError> {
    let rows: Vec<(usize, RawSong)> = parse_json_lines(path, text)?;
    let (_, raw) = rows
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::EmptySongFile(path.to_owned()))?;

    Ok(SongFileRecords {
        song: Song {
            song_id: raw.song_id,
            title: raw.title,
            artist_id: raw.artist_id.clone(),
            year: raw.year,
            duration: raw.duration,
        },
        artist: Artist {
            artist_id: raw.artist_id,
            name: raw.artist_name,
            location: raw.artist_location,
            latitude: raw.artist_latitude,
            longitude: raw.artist_longitude,
        },
    })
}
