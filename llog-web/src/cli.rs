use anyhow::Result;
use clap::Parser;
use llog_core::Config;
use std::path::PathBuf;

/// llog — a learning log served over HTTP
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Prints the database path and exits
    #[arg(long, short)]
    pub path: bool,
    /// SQLite database file. Overrides `database` in config.toml
    #[arg(long, env = "LLOG_DATABASE")]
    pub database: Option<PathBuf>,
    /// Address to listen on (e.g. `127.0.0.1:8000`). Overrides `bind` in config.toml
    #[arg(long, env = "LLOG_BIND")]
    pub bind: Option<String>,
}

impl Cli {
    pub fn new() -> Self {
        Cli::parse()
    }

    /// Command line values win over the config file.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(bind) = &self.bind {
            config.bind = Config::parse_bind(bind)?;
        }
        Ok(())
    }
}
