mod statements;
mod tables;

pub use statements::{EntityStatements, Statements, TableCounts};
pub use tables::{ARTISTS_TABLE, SONGPLAYS_TABLE, SONGS_TABLE, TIME_TABLE, USERS_TABLE};
