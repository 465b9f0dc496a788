use anyhow::Result;
use config::Config;
use serde::Deserialize;

/// Default number of days before "today" for which a dashboard read still
/// closes out expired habit windows (1 = today or yesterday).
pub const DEFAULT_SWEEP_LOOKBACK_DAYS: u32 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// How far behind "today" a viewed date may be while still triggering the
    /// auto-fail sweep. Dates older than this are read-only history views.
    pub sweep_lookback_days: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sweep_lookback_days: DEFAULT_SWEEP_LOOKBACK_DAYS,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `config.toml` values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "info")?
            .set_default(
                "tracker.sweep_lookback_days",
                i64::from(DEFAULT_SWEEP_LOOKBACK_DAYS),
            )?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
