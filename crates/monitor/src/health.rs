//! Pure health evaluation over collection counts.
//!
//! Everything here is synchronous and side-effect free; the runner feeds it
//! counts and timestamps and acts on the result.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Active (non-soft-deleted) row counts per monitored table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CollectionCounts {
    pub products: i64,
    pub categories: i64,
}

/// Per-tick change against the previous counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CollectionDeltas {
    pub products: i64,
    pub categories: i64,
}

/// Thresholds a sample is judged against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct HealthFloors {
    /// Minimum acceptable active product count.
    pub min_products: i64,

    /// Minimum acceptable active category count.
    pub min_categories: i64,

    /// A single-tick product count drop larger than this fires even when the
    /// count is still above the floor.
    pub drop_threshold: i64,
}

/// Conditions a sample can fire, in descending priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum AlertKind {
    CriticalLowProducts,
    SuddenProductDrop,
    CriticalLowCategories,
}

/// One evaluated tick. Samples are not persisted; only the counts survive
/// into the next tick via [`MonitorState`].
#[derive(Debug, Clone)]
pub(crate) struct HealthSample {
    pub counts: CollectionCounts,
    pub deltas: CollectionDeltas,
    pub conditions: Vec<AlertKind>,
    pub at: Timestamp,
}

impl HealthSample {
    pub(crate) fn healthy(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// State threaded through the monitor loop.
#[derive(Debug, Default)]
pub(crate) struct MonitorState {
    pub previous: CollectionCounts,
    pub last_alert_at: Option<Timestamp>,
    pub alerts_sent: u64,
}

/// Evaluate counts against the floors and the previous tick. Conditions are
/// ordered by priority, so the first entry is the alert's primary kind.
pub(crate) fn evaluate(
    counts: CollectionCounts,
    previous: CollectionCounts,
    floors: &HealthFloors,
    at: Timestamp,
) -> HealthSample {
    let deltas = CollectionDeltas {
        products: counts.products - previous.products,
        categories: counts.categories - previous.categories,
    };

    let mut conditions = Vec::new();

    if counts.products < floors.min_products {
        conditions.push(AlertKind::CriticalLowProducts);
    }

    if deltas.products < -floors.drop_threshold {
        conditions.push(AlertKind::SuddenProductDrop);
    }

    if counts.categories < floors.min_categories {
        conditions.push(AlertKind::CriticalLowCategories);
    }

    HealthSample {
        counts,
        deltas,
        conditions,
        at,
    }
}

/// Whether a previous alert still suppresses sending a new one.
pub(crate) fn within_cooldown(
    last_alert_at: Option<Timestamp>,
    now: Timestamp,
    cooldown_secs: i64,
) -> bool {
    last_alert_at.is_some_and(|last| now.as_second() - last.as_second() < cooldown_secs)
}
