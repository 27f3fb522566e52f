//! Songplay ETL Library
//!
//! Loads the song and event-log JSON datasets into a five-table SQLite
//! warehouse. The binary wires these modules together; they are exposed for
//! the end-to-end tests.

pub mod config;
pub mod etl;
pub mod extract;
pub mod load;
pub mod resolver;
pub mod schema;
pub mod sqlite_persistence;
pub mod walker;

// Re-export commonly used types for convenience
pub use config::DbConfig;
pub use etl::EtlSummary;
pub use load::LoadStats;
pub use resolver::{SongMatch, SongResolver};
pub use schema::Statements;
pub use walker::{LogProgress, ProgressReporter};
