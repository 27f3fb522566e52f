#![allow(dead_code)]

pub const SONG_1_ID: &str = "S1";
pub const SONG_1_TITLE: &str = "T";
pub const SONG_1_DURATION: f64 = 180.0;
pub const ARTIST_1_ID: &str = "A1";
pub const ARTIST_1_NAME: &str = "X";

pub const SONG_2_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_2_TITLE: &str = "Der Kleine Dompfaff";
pub const SONG_2_DURATION: f64 = 152.92036;
pub const ARTIST_2_ID: &str = "ARJIE2Y1187B994AB7";
pub const ARTIST_2_NAME: &str = "Line Renaud";

pub const USER_1_ID: i64 = 26;
pub const USER_2_ID: i64 = 80;

/// 2018-11-02 01:25:34.796 UTC
pub const TS_1: i64 = 1541121934796;
/// 2018-11-15 16:27:55.796 UTC
pub const TS_2: i64 = 1542299275796;
