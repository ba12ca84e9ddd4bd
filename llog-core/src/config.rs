use anyhow::{Context, Result, bail};
use chrono::format::{Item, StrftimeItems};
use directories::BaseDirs;
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::PathBuf};

use crate::forms::FormLimits;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DATE_FORMAT: &str = "%b %d, %Y %H:%M";

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file holding topics and entries.
    pub database: PathBuf,
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// chrono format used when showing `date_added` on pages.
    pub date_format: String,
    /// Length limits applied by the topic and entry forms.
    pub limits: FormLimits,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<PathBuf>,
    bind: Option<String>,
    date_format: Option<String>,
    topic_text_max: Option<usize>,
    entry_text_max: Option<usize>,
}

impl Config {
    /// Public entrypoint: load config from disk (first XDG path, then native) and apply defaults.
    ///
    /// A config file that cannot be read or parsed is logged and ignored.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config().unwrap_or_else(|err| {
            tracing::warn!(error = %format!("{err:#}"), "ignoring config file, using defaults");
            FileConfig::default()
        });
        Self::from_file_config(file_config)
    }

    fn from_file_config(file_config: FileConfig) -> Result<Self> {
        let bind = file_config.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let bind = Self::parse_bind(bind)?;

        let defaults = FormLimits::default();
        let limits = FormLimits {
            topic_text_max: file_config
                .topic_text_max
                .unwrap_or(defaults.topic_text_max),
            entry_text_max: file_config
                .entry_text_max
                .unwrap_or(defaults.entry_text_max),
        };

        let date_format = file_config
            .date_format
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        Self::check_date_format(&date_format)?;

        Ok(Self {
            database: file_config
                .database
                .unwrap_or_else(Self::default_database_path),
            bind,
            date_format,
            limits,
        })
    }

    /// Rejects chrono format strings that would fail when a page is rendered.
    fn check_date_format(format: &str) -> Result<()> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid date_format `{format}`");
        }
        Ok(())
    }

    /// Parse a `host:port` string such as `127.0.0.1:8000`.
    pub fn parse_bind(bind: &str) -> Result<SocketAddr> {
        bind.trim()
            .parse()
            .with_context(|| format!("invalid bind address `{bind}`"))
    }

    /// Default database: `{data_dir}/llog/llog.sqlite3`
    /// - macOS:   `~/Library/Application Support/llog/llog.sqlite3`
    /// - Linux:   `$XDG_DATA_HOME/llog/llog.sqlite3` or `~/.local/share/llog/llog.sqlite3`
    /// - Windows: `%APPDATA%\llog\llog.sqlite3`
    fn default_database_path() -> PathBuf {
        let dir = match BaseDirs::new() {
            Some(base) => base.data_dir().join("llog"),
            None => PathBuf::from("./llog"),
        };
        dir.join("llog.sqlite3")
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b.home_dir().join(".config").join("llog").join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("llog").join("config.toml");
            v.push(native);
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    /// Parse a TOML string into `FileConfig`.
    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn candidates_prioritize_xdg_then_native() {
        if let Some(b) = BaseDirs::new() {
            let expected_xdg = b.home_dir().join(".config").join("llog").join("config.toml");
            let expected_native = b.config_dir().join("llog").join("config.toml");
            let c = Config::config_file_paths();
            assert_eq!(c.get(0), Some(&expected_xdg));
            assert_eq!(c.get(1), Some(&expected_native));
        }
    }

    #[test]
    fn parse_file_accepts_database_and_bind() {
        let toml = r#"
            database = "/tmp/llog/test.sqlite3"
            bind = "0.0.0.0:9000"
        "#;
        let fc = Config::parse_file(toml).unwrap();
        assert_eq!(
            fc.database.as_deref(),
            Some(Path::new("/tmp/llog/test.sqlite3"))
        );

        let config = Config::from_file_config(fc).unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let fc = Config::parse_file("").unwrap();
        let config = Config::from_file_config(fc).unwrap();

        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.limits.topic_text_max, 200);
        assert_eq!(config.limits.entry_text_max, 10_000);
        assert!(config.database.ends_with("llog.sqlite3"));
    }

    #[test]
    fn parse_file_overrides_limits() {
        let toml = r#"
            topic_text_max = 50
            entry_text_max = 500
            date_format = "%Y-%m-%d"
        "#;
        let config = Config::from_file_config(Config::parse_file(toml).unwrap()).unwrap();
        assert_eq!(config.limits.topic_text_max, 50);
        assert_eq!(config.limits.entry_text_max, 500);
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn malformed_bind_is_an_error() {
        let fc = Config::parse_file(r#"bind = "not an address""#).unwrap();
        assert!(Config::from_file_config(fc).is_err());
    }

    #[test]
    fn malformed_date_format_is_an_error() {
        let fc = Config::parse_file(r#"date_format = "%Y-%Q""#).unwrap();
        assert!(Config::from_file_config(fc).is_err());
    }

    #[test]
    fn parse_file_rejects_wrong_types() {
        assert!(Config::parse_file("topic_text_max = \"many\"").is_err());
    }
}
