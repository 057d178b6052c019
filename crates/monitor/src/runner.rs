//! The monitor loop.

use std::time::Duration;

use jiff::Timestamp;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{
    alerts::{Alert, AlertWriter},
    backup::BackupWriter,
    health::{self, AlertKind, CollectionCounts, HealthFloors, HealthSample, MonitorState},
    store::MonitorStore,
};

/// Outcome of a single tick, returned for observability and tests.
#[derive(Debug)]
pub(crate) struct TickOutcome {
    pub sample: HealthSample,

    /// Id of the alert written this tick, if any.
    pub sent: Option<u64>,
}

pub(crate) struct Monitor<S> {
    store: S,
    floors: HealthFloors,
    cooldown_secs: i64,
    alerts: AlertWriter,
    backups: BackupWriter,
    state: MonitorState,
}

impl<S: MonitorStore> Monitor<S> {
    pub(crate) fn new(
        store: S,
        floors: HealthFloors,
        cooldown_secs: i64,
        alerts: AlertWriter,
        backups: BackupWriter,
    ) -> Self {
        Self {
            store,
            floors,
            cooldown_secs,
            alerts,
            backups,
            state: MonitorState::default(),
        }
    }

    pub(crate) async fn run(&mut self, every: Duration) {
        let mut ticker = tokio::time::interval(every);

        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            self.tick(Timestamp::now()).await;
        }
    }

    /// One monitoring pass. Never fails: a count-query error is logged and
    /// evaluated as a zero-count sample so the loop keeps running.
    pub(crate) async fn tick(&mut self, now: Timestamp) -> TickOutcome {
        let counts = match self.store.counts().await {
            Ok(counts) => counts,
            Err(source) => {
                error!("failed to read collection counts: {source}");

                CollectionCounts::default()
            }
        };

        let sample = health::evaluate(counts, self.state.previous, &self.floors, now);

        let mut sent = None;

        if sample.healthy() {
            if counts != self.state.previous {
                info!(
                    products = counts.products,
                    categories = counts.categories,
                    "collection counts changed"
                );
            }
        } else {
            warn!(conditions = ?sample.conditions, products = counts.products, categories = counts.categories, "unhealthy sample");

            if health::within_cooldown(self.state.last_alert_at, now, self.cooldown_secs) {
                debug!("alert suppressed by cooldown");
            } else if let Some(&kind) = sample.conditions.first() {
                sent = self.send_alert(kind, &sample).await;
            }
        }

        self.state.previous = counts;

        TickOutcome { sample, sent }
    }

    async fn send_alert(&mut self, kind: AlertKind, sample: &HealthSample) -> Option<u64> {
        let id = self.state.alerts_sent + 1;

        let alert = Alert {
            id,
            at: sample.at,
            kind,
            conditions: sample.conditions.clone(),
            counts: sample.counts,
            deltas: sample.deltas,
            floors: self.floors,
            acknowledged: false,
        };

        if let Err(source) = self.alerts.write(&alert) {
            // The counter and cooldown stay untouched so the next unhealthy
            // tick retries.
            error!("failed to write alert: {source}");

            return None;
        }

        self.state.alerts_sent = id;
        self.state.last_alert_at = Some(sample.at);

        warn!(id, ?kind, path = %self.alerts.path().display(), "alert written");

        if alert.conditions.contains(&AlertKind::CriticalLowProducts) {
            self.emergency_backup(id).await;
        }

        Some(id)
    }

    async fn emergency_backup(&self, id: u64) {
        let dump = match self.store.dump().await {
            Ok(dump) => dump,
            Err(source) => {
                error!("failed to dump tables for emergency backup: {source}");

                return;
            }
        };

        match self.backups.write(id, &dump) {
            Ok(path) => warn!(path = %path.display(), "emergency backup written"),
            Err(source) => error!("failed to write emergency backup: {source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::store::{DatabaseDump, MockMonitorStore, StoreError};

    use super::*;

    const FLOORS: HealthFloors = HealthFloors {
        min_products: 10,
        min_categories: 3,
        drop_threshold: 10,
    };

    const COOLDOWN: i64 = 300;

    fn counts(products: i64, categories: i64) -> CollectionCounts {
        CollectionCounts {
            products,
            categories,
        }
    }

    fn counts_sequence(store: &mut MockMonitorStore, sequence: Vec<CollectionCounts>) {
        let cursor = Arc::new(AtomicUsize::new(0));

        store
            .expect_counts()
            .times(sequence.len())
            .returning(move || {
                let index = cursor.fetch_add(1, Ordering::SeqCst);

                sequence
                    .get(index)
                    .copied()
                    .ok_or(StoreError::Sql(sqlx::Error::PoolClosed))
            });
    }

    fn empty_dump() -> DatabaseDump {
        DatabaseDump {
            generated_at: Timestamp::UNIX_EPOCH,
            products: Vec::new(),
            categories: Vec::new(),
        }
    }

    fn make_monitor(store: MockMonitorStore, dir: &TempDir) -> Monitor<MockMonitorStore> {
        Monitor::new(
            store,
            FLOORS,
            COOLDOWN,
            AlertWriter::new(dir.path().join("alert.json")),
            BackupWriter::new(dir.path().join("backups")),
        )
    }

    fn tick_times(base: Timestamp, offsets_secs: &[i64]) -> Vec<Timestamp> {
        offsets_secs
            .iter()
            .filter_map(|offset| Timestamp::from_second(base.as_second() + offset).ok())
            .collect()
    }

    #[tokio::test]
    async fn test_floor_breach_alerts_once_within_cooldown() -> TestResult {
        let dir = TempDir::new()?;

        let mut store = MockMonitorStore::new();

        counts_sequence(
            &mut store,
            vec![counts(12, 5), counts(12, 5), counts(8, 5), counts(8, 5)],
        );

        store.expect_dump().once().returning(|| Ok(empty_dump()));

        let mut monitor = make_monitor(store, &dir);

        let mut sent = Vec::new();

        for at in tick_times(Timestamp::UNIX_EPOCH, &[0, 60, 120, 180]) {
            let outcome = monitor.tick(at).await;

            if let Some(id) = outcome.sent {
                sent.push((id, outcome.sample.at));
            }
        }

        assert_eq!(sent.len(), 1, "exactly one alert inside the cooldown");
        assert_eq!(sent[0].0, 1);

        let alert: Alert = serde_json::from_str(&fs::read_to_string(
            dir.path().join("alert.json"),
        )?)?;

        assert_eq!(alert.id, 1);
        assert_eq!(alert.kind, AlertKind::CriticalLowProducts);
        assert_eq!(alert.counts.products, 8);
        assert!(!alert.acknowledged);

        Ok(())
    }

    #[tokio::test]
    async fn test_low_products_alert_writes_emergency_backup() -> TestResult {
        let dir = TempDir::new()?;

        let mut store = MockMonitorStore::new();

        counts_sequence(&mut store, vec![counts(2, 5)]);

        store.expect_dump().once().returning(|| Ok(empty_dump()));

        let mut monitor = make_monitor(store, &dir);

        let outcome = monitor.tick(Timestamp::UNIX_EPOCH).await;

        assert_eq!(outcome.sent, Some(1));

        let backups: Vec<_> = fs::read_dir(dir.path().join("backups"))?
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();

        assert_eq!(backups.len(), 1);
        assert!(backups[0].starts_with("emergency-backup-1-"));
        assert!(backups[0].ends_with(".json"));

        Ok(())
    }

    #[tokio::test]
    async fn test_sudden_drop_above_floor_skips_backup() -> TestResult {
        let dir = TempDir::new()?;

        let mut store = MockMonitorStore::new();

        counts_sequence(&mut store, vec![counts(50, 5), counts(35, 5)]);

        store.expect_dump().never();

        let mut monitor = make_monitor(store, &dir);

        let first = monitor.tick(Timestamp::UNIX_EPOCH).await;

        assert!(first.sample.healthy());

        let times = tick_times(Timestamp::UNIX_EPOCH, &[60]);
        let second = monitor.tick(times[0]).await;

        assert_eq!(second.sent, Some(1));

        let alert: Alert = serde_json::from_str(&fs::read_to_string(
            dir.path().join("alert.json"),
        )?)?;

        assert_eq!(alert.kind, AlertKind::SuddenProductDrop);
        assert_eq!(alert.deltas.products, -15);

        Ok(())
    }

    #[tokio::test]
    async fn test_count_failure_becomes_zero_sample_and_loop_continues() -> TestResult {
        let dir = TempDir::new()?;

        let mut store = MockMonitorStore::new();
        let cursor = Arc::new(AtomicUsize::new(0));

        store.expect_counts().times(2).returning(move || {
            if cursor.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(StoreError::Sql(sqlx::Error::PoolClosed))
            } else {
                Ok(counts(50, 5))
            }
        });

        store.expect_dump().once().returning(|| Ok(empty_dump()));

        let mut monitor = make_monitor(store, &dir);

        let first = monitor.tick(Timestamp::UNIX_EPOCH).await;

        assert_eq!(first.sample.counts, CollectionCounts::default());
        assert_eq!(first.sent, Some(1));

        let times = tick_times(Timestamp::UNIX_EPOCH, &[400]);
        let second = monitor.tick(times[0]).await;

        assert!(second.sample.healthy());
        assert_eq!(second.sent, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_cooldown_expiry_allows_second_alert() -> TestResult {
        let dir = TempDir::new()?;

        let mut store = MockMonitorStore::new();

        counts_sequence(&mut store, vec![counts(8, 5), counts(8, 5)]);

        store.expect_dump().times(2).returning(|| Ok(empty_dump()));

        let mut monitor = make_monitor(store, &dir);

        let times = tick_times(Timestamp::UNIX_EPOCH, &[0, 301]);

        let first = monitor.tick(times[0]).await;
        let second = monitor.tick(times[1]).await;

        assert_eq!(first.sent, Some(1));
        assert_eq!(second.sent, Some(2));

        let alert: Alert = serde_json::from_str(&fs::read_to_string(
            dir.path().join("alert.json"),
        )?)?;

        assert_eq!(alert.id, 2, "alert file holds only the latest alert");

        Ok(())
    }

    #[tokio::test]
    async fn test_healthy_ticks_never_touch_the_alert_file() -> TestResult {
        let dir = TempDir::new()?;

        let mut store = MockMonitorStore::new();

        counts_sequence(&mut store, vec![counts(50, 5), counts(51, 5)]);

        store.expect_dump().never();

        let mut monitor = make_monitor(store, &dir);

        let times = tick_times(Timestamp::UNIX_EPOCH, &[0, 60]);

        for at in times {
            let outcome = monitor.tick(at).await;

            assert!(outcome.sample.healthy());
            assert_eq!(outcome.sent, None);
        }

        assert!(!dir.path().join("alert.json").exists());

        Ok(())
    }
}
