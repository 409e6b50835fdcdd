//! Paced delivery of notifications.
//!
//! A delivery drops pushes the user has already seen (at or below the
//! watermark) and displays the rest one per interval, oldest first.

use crate::push::PushRecord;

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Default pace: one notification every two seconds.
pub const DEFAULT_RATE_PER_SECOND: f64 = 0.5;

/// Receiver of a paced delivery.
pub trait DeliveryTarget: Send + Sync + 'static {
    /// Display one push.
    fn display(&self, push: &PushRecord);

    /// Record that a push with this `modified` time has been displayed.
    fn advance_watermark(&self, modified: f64);
}

/// A push with its offset from the start of the delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledPush {
    /// Offset from the start of the delivery.
    pub delay: Duration,
    /// The push to display.
    pub push: PushRecord,
}

/// Fixed-rate notification scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttler {
    interval: Duration,
}

impl Default for Throttler {
    fn default() -> Self {
        Self::from_rate(DEFAULT_RATE_PER_SECOND)
    }
}

impl Throttler {
    /// Pace at `rate_per_second` notifications per second.
    ///
    /// The interval is truncated to whole milliseconds. Non-positive or
    /// non-finite rates fall back to [`DEFAULT_RATE_PER_SECOND`].
    pub fn from_rate(rate_per_second: f64) -> Self {
        let rate = if rate_per_second.is_finite() && rate_per_second > 0.0 {
            rate_per_second
        } else {
            DEFAULT_RATE_PER_SECOND
        };

        Self {
            interval: Duration::from_millis((1000.0 / rate) as u64),
        }
    }

    /// Gap between two consecutive notifications.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Keep pushes newer than `watermark` and assign each its slot.
    pub fn plan(&self, candidates: Vec<PushRecord>, watermark: f64) -> Vec<ScheduledPush> {
        candidates
            .into_iter()
            .filter(|push| push.latest_timestamp() > watermark)
            .enumerate()
            .map(|(index, push)| ScheduledPush {
                delay: self.interval * index as u32,
                push,
            })
            .collect()
    }

    /// Start a paced delivery of `candidates`.
    ///
    /// Returns `None` when nothing is scheduled: either `candidates` is
    /// empty or every candidate is at or below `watermark`. Otherwise the
    /// returned task resolves to the number of pushes delivered once the
    /// last one has been displayed.
    #[instrument(skip(self, candidates, target), fields(candidates = candidates.len()))]
    pub fn deliver<T: DeliveryTarget>(
        &self,
        candidates: Vec<PushRecord>,
        watermark: f64,
        target: Arc<T>,
    ) -> Option<JoinHandle<usize>> {
        if candidates.is_empty() {
            return None;
        }

        let schedule = self.plan(candidates, watermark);
        if schedule.is_empty() {
            debug!(watermark, "All candidates already delivered");
            return None;
        }

        let delivery_id = Uuid::new_v4();
        info!(
            delivery_id = %delivery_id,
            count = schedule.len(),
            interval_ms = self.interval.as_millis(),
            "Delivery scheduled"
        );

        Some(tokio::spawn(async move {
            let start = Instant::now();
            let count = schedule.len();

            for slot in schedule {
                tokio::time::sleep_until(start + slot.delay).await;

                target.display(&slot.push);

                if slot.push.modified > watermark {
                    target.advance_watermark(slot.push.modified);
                }
            }

            info!(delivery_id = %delivery_id, count, "Delivery complete");
            count
        }))
    }
}
