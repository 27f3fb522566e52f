use anyhow::{Context, Result};
use clap::Parser;
use songplay_etl::{etl, DbConfig, LogProgress, Statements};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let resolved_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if resolved_path.is_absolute() {
        return Ok(resolved_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(resolved_path))
}

#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(about = "Load song and event-log JSON files into the songplay warehouse")]
struct CliArgs {
    /// Root directory of the song dataset.
    #[clap(long, default_value = "data/song_data", value_parser = parse_path)]
    pub song_data: PathBuf,

    /// Root directory of the event-log dataset.
    #[clap(long, default_value = "data/log_data", value_parser = parse_path)]
    pub log_data: PathBuf,

    /// Drop and recreate all warehouse tables before loading.
    #[clap(long)]
    pub reset: bool,

    /// Drop and recreate all warehouse tables, then exit without loading.
    #[clap(long, conflicts_with = "reset")]
    pub reset_only: bool,

    #[clap(long, env = "HOST")]
    pub host: Option<String>,

    #[clap(long, env = "PORT")]
    pub port: Option<String>,

    /// Path of the warehouse database file.
    #[clap(long, env = "DBNAME")]
    pub dbname: Option<String>,

    #[clap(long, env = "USER")]
    pub user: Option<String>,

    #[clap(long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl CliArgs {
    fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.host.clone(),
            port: self.port.clone(),
            dbname: self.dbname.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let statements = Statements::new();
    let mut conn = cli_args.db_config().connect()?;

    etl::prepare_tables(&conn, &statements, cli_args.reset || cli_args.reset_only)?;
    if cli_args.reset_only {
        info!("Warehouse tables reset.");
        return Ok(());
    }

    let summary = etl::run(
        &mut conn,
        &statements,
        &cli_args.song_data,
        &cli_args.log_data,
        &mut LogProgress,
    )?;
    summary.log();

    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close warehouse database")?;
    info!("Load completed successfully!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_bundled_data_dirs() {
        let args = CliArgs::try_parse_from(["songplay-etl", "--dbname", "w.db"]).unwrap();

        assert!(args.song_data.ends_with("data/song_data"));
        assert!(args.log_data.ends_with("data/log_data"));
        assert!(!args.reset);
        assert_eq!(args.db_config().dbname.as_deref(), Some("w.db"));
    }

    #[test]
    fn reset_flags_are_exclusive() {
        assert!(CliArgs::try_parse_from(["songplay-etl", "--reset", "--reset-only"]).is_err());
    }
}
