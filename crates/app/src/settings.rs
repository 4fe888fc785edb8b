//! Settings for the `evenup` binary.
//!
//! Sources, lowest priority first: the TOML file given with `--config`
//! (default `config/evenup.toml`, optional), `EVENUP_*` environment
//! variables (`EVENUP_APP__LEVEL`, `EVENUP_DATABASE`), then command line
//! flags.

use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/evenup.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    /// Path of a sqlite file, created when missing.
    Sqlite(String),
    /// Full connection URL.
    Url(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("evenup.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Database::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: Database,
    pub app: App,
}

impl Settings {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("EVENUP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if let Some(url) = &args.database_url {
            settings.database = Database::Url(url.clone());
        }
        if let Some(level) = &args.level {
            settings.app.level = level.clone();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_urls() {
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::Sqlite("data/evenup.db".to_string()).url(),
            "sqlite:data/evenup.db?mode=rwc"
        );
        assert_eq!(
            Database::Url("sqlite:other.db".to_string()).url(),
            "sqlite:other.db"
        );
    }

    #[test]
    fn flags_override_file() {
        let args = GlobalArgs {
            config: Some("does/not/exist".to_string()),
            database_url: Some("sqlite::memory:".to_string()),
            level: Some("debug".to_string()),
        };
        let settings = Settings::load(&args).unwrap();
        assert_eq!(
            settings.database,
            Database::Url("sqlite::memory:".to_string())
        );
        assert_eq!(settings.app.level, "debug");
    }
}
