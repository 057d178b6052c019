//! Bodega database health monitor
//!
//! Polls the catalog tables on an interval, alerts when counts fall below
//! their floors or drop suddenly, and snapshots both tables when the
//! product count goes critical.

use std::{process, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

use crate::{
    alerts::AlertWriter, backup::BackupWriter, config::MonitorConfig, health::HealthFloors,
    runner::Monitor, store::PgMonitorStore,
};

mod alerts;
mod backup;
mod config;
mod health;
mod logging;
mod runner;
mod shutdown;
mod store;

#[tokio::main]
async fn main() {
    // Load configuration from .env and CLI arguments
    let config = MonitorConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let _guard = logging::init(&config.log_dir, &config.log_level);

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(source) => {
            error!("failed to connect to database: {source}");

            process::exit(1);
        }
    };

    info!(
        interval_secs = config.interval_secs,
        min_products = config.min_products,
        min_categories = config.min_categories,
        "starting database health monitor"
    );

    let mut monitor = Monitor::new(
        PgMonitorStore::new(pool.clone()),
        HealthFloors {
            min_products: config.min_products,
            min_categories: config.min_categories,
            drop_threshold: config.alert_threshold,
        },
        config.cooldown_secs,
        AlertWriter::new(config.alerts_file),
        BackupWriter::new(config.backup_dir),
    );

    tokio::select! {
        () = monitor.run(Duration::from_secs(config.interval_secs)) => {}
        result = shutdown::wait() => {
            if let Err(source) = result {
                error!("failed to listen for shutdown signal: {source}");
            }
        }
    }

    pool.close().await;

    info!("monitor stopped");
}
