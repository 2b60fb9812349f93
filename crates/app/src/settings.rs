//! Application settings.
//!
//! Values come from an optional TOML file (`config/settings.toml` unless
//! `--config` points elsewhere) overlaid by `FINANCE_BOT__*` environment
//! variables, e.g. `FINANCE_BOT__TELEGRAM__TOKEN`.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::DatePolicy;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Parser)]
#[command(name = "finance_bot", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
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

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BotOptions {
    /// `shape` checks `YYYY-MM-DD` only, `calendar` also rejects dates that
    /// do not exist.
    pub date_policy: DatePolicy,
    pub user_cache_capacity: usize,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            date_policy: DatePolicy::default(),
            user_cache_capacity: 1024,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub database: Database,
    pub telegram: Telegram,
    #[serde(default)]
    pub bot: BotOptions,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut settings = Self::from_config(
            Config::builder()
                .add_source(File::with_name(path).required(args.config.is_some()))
                .add_source(Environment::with_prefix("FINANCE_BOT").separator("__")),
        )?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }
        Ok(settings)
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_config(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let settings = parse(
            r#"
            database = "memory"

            [telegram]
            token = "123:abc"
            "#,
        )
        .unwrap();

        assert!(matches!(settings.database, Database::Memory));
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.bot.user_cache_capacity, 1024);
        assert_eq!(settings.bot.date_policy, DatePolicy::Shape);
    }

    #[test]
    fn sqlite_path_and_calendar_dates() {
        let settings = parse(
            r#"
            database = { sqlite = "finance.db" }

            [app]
            level = "debug"

            [telegram]
            token = "123:abc"

            [bot]
            date_policy = "calendar"
            user_cache_capacity = 0
            "#,
        )
        .unwrap();

        assert!(matches!(settings.database, Database::Sqlite(ref path) if path == "finance.db"));
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.bot.user_cache_capacity, 0);
        assert_eq!(settings.bot.date_policy, DatePolicy::Calendar);
    }

    #[test]
    fn token_is_required() {
        assert!(parse(r#"database = "memory""#).is_err());
    }

    #[test]
    fn unknown_date_policy_is_rejected() {
        let err = parse(
            r#"
            database = "memory"

            [telegram]
            token = "123:abc"

            [bot]
            date_policy = "lenient"
            "#,
        );
        assert!(err.is_err());
    }
}
