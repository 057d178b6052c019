//! Monitor configuration module

use std::path::PathBuf;

use clap::Parser;

/// Bodega database health monitor configuration
#[derive(Debug, Parser)]
#[command(name = "bodega-monitor", about = "Bodega database health monitor", long_about = None)]
pub(crate) struct MonitorConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Seconds between monitoring ticks
    #[arg(long, env = "MONITOR_INTERVAL_SECS", default_value = "60")]
    pub interval_secs: u64,

    /// Minimum acceptable active product count
    #[arg(long, env = "MONITOR_MIN_PRODUCTS", default_value = "10")]
    pub min_products: i64,

    /// Minimum acceptable active category count
    #[arg(long, env = "MONITOR_MIN_CATEGORIES", default_value = "3")]
    pub min_categories: i64,

    /// Single-tick product drop that fires an alert even above the floor
    #[arg(long, env = "MONITOR_ALERT_THRESHOLD", default_value = "10")]
    pub alert_threshold: i64,

    /// Seconds an alert suppresses further alerts
    #[arg(long, env = "MONITOR_COOLDOWN_SECS", default_value = "300")]
    pub cooldown_secs: i64,

    /// File the latest alert is written to
    #[arg(
        long,
        env = "MONITOR_ALERTS_FILE",
        default_value = "monitoring/current-alert.json"
    )]
    pub alerts_file: PathBuf,

    /// Directory emergency backups are written to
    #[arg(long, env = "MONITOR_BACKUP_DIR", default_value = "monitoring/backups")]
    pub backup_dir: PathBuf,

    /// Directory rolling log files are written to
    #[arg(long, env = "MONITOR_LOG_DIR", default_value = "monitoring/logs")]
    pub log_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl MonitorConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
