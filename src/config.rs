//! Database connection parameters.

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DBNAME must be set to the path of the warehouse database")]
    MissingDbName,
}

/// Connection parameters as read from HOST, PORT, DBNAME, USER and PASSWORD.
///
/// The warehouse is an embedded SQLite file named by `dbname`; the network
/// parameters are carried along for logging only.
#[derive(Clone, Default)]
pub struct DbConfig {
    pub host: Option<String>,
    pub port: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl DbConfig {
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match self.dbname.as_deref() {
            Some(dbname) if !dbname.trim().is_empty() => Ok(PathBuf::from(dbname)),
            _ => Err(ConfigError::MissingDbName),
        }
    }

    /// Opens the warehouse, creating the file if needed.
    pub fn connect(&self) -> Result<Connection> {
        let db_path = self.database_path()?;
        debug!("Connection parameters: {:?}", self);
        info!("Opening warehouse database at {:?}...", db_path);

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open warehouse database {:?}", db_path))?;

        // Opening is lazy; touch the file so a bad path fails here.
        conn.query_row("PRAGMA schema_version;", [], |r| r.get::<_, i64>(0))
            .with_context(|| format!("Failed to read warehouse database {:?}", db_path))?;

        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dbname: Option<&str>) -> DbConfig {
        DbConfig {
            host: Some("localhost".to_string()),
            port: Some("5432".to_string()),
            dbname: dbname.map(str::to_string),
            user: Some("student".to_string()),
            password: Some("hunter2".to_string()),
        }
    }

    #[test]
    fn missing_or_blank_dbname_is_a_config_error() {
        assert!(matches!(
            config(None).database_path(),
            Err(ConfigError::MissingDbName)
        ));
        assert!(matches!(
            config(Some("  ")).database_path(),
            Err(ConfigError::MissingDbName)
        ));
        assert!(config(None).connect().is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", config(Some("warehouse.db")));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn connects_to_new_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("warehouse.db");

        let conn = config(Some(db_path.to_str().unwrap())).connect().unwrap();
        conn.execute("CREATE TABLE t (x INTEGER)", []).unwrap();

        assert!(db_path.exists());
    }

    #[test]
    fn unreachable_path_fails_fast() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("no/such/dir/warehouse.db");

        assert!(config(Some(db_path.to_str().unwrap())).connect().is_err());
    }
}
