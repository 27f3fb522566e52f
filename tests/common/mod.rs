//! Common test infrastructure
//!
//! Fixtures write small song and log datasets into a temporary directory and
//! open a fresh warehouse next to them.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestWarehouse, SONG_1_ID};
//!
//! #[test]
//! fn test_load_song() {
//!     let mut warehouse = TestWarehouse::new();
//!     warehouse.write_song_file("A/song.json", &common::song_1_json());
//!     warehouse.load_songs().unwrap();
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::*;
