//! Uptime reconstruction from a sparse status event log.
//!
//! A camera's state is only known at the instants it was observed. Between
//! two observations the earlier state is assumed to hold, so the offline
//! time inside a window is the sum of the spans that start at an offline
//! observation (or at the window start, if the camera was already offline)
//! and end at the next observation (or at the window end).

use crate::db::models::StatusEvent;
use crate::error::Error;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// `[from, to]` interval for one camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UptimeWindow {
    pub camera_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl UptimeWindow {
    /// Fails with [`Error::InvalidWindow`] when `from > to`.
    pub fn new(camera_id: i64, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, Error> {
        if from > to {
            return Err(Error::InvalidWindow { from, to });
        }
        Ok(Self { camera_id, from, to })
    }

    pub fn duration(&self) -> Duration {
        self.to - self.from
    }

    fn clamp(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.clamp(self.from, self.to)
    }
}

/// Offline time and derived uptime of one camera over one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UptimeResult {
    pub camera_id: i64,
    /// Always within `[0, window duration]`
    pub offline_duration: Duration,
    /// Always within `[0, 100]`
    pub uptime_pct: f64,
}

impl UptimeResult {
    pub fn offline_ms(&self) -> i64 {
        self.offline_duration.num_milliseconds()
    }
}

/// Duration in seconds without dropping sub-millisecond precision
fn seconds_f64(duration: Duration) -> f64 {
    duration.num_seconds() as f64 + f64::from(duration.subsec_nanos()) / 1e9
}

/// Compute how long the camera was offline within `window`.
///
/// `prior_online` is the state in effect at `window.from`, taken from the
/// latest event at or before it. `events` must be sorted ascending by `at`;
/// events sharing a timestamp are applied in the given order, so the last
/// one wins. An event earlier than its predecessor fails with
/// [`Error::UnsortedEvents`]. Timestamps outside the window are clamped to
/// its bounds.
///
/// A zero-length window is fully up regardless of the other inputs.
pub fn reconstruct_uptime(
    window: &UptimeWindow,
    prior_online: bool,
    events: &[StatusEvent],
) -> Result<UptimeResult, Error> {
    if window.from > window.to {
        return Err(Error::InvalidWindow {
            from: window.from,
            to: window.to,
        });
    }

    let total = window.duration();
    if total.is_zero() {
        return Ok(UptimeResult {
            camera_id: window.camera_id,
            offline_duration: Duration::zero(),
            uptime_pct: 100.0,
        });
    }

    let mut cursor = window.from;
    let mut online = prior_online;
    let mut offline = Duration::zero();
    let mut previous: Option<DateTime<Utc>> = None;

    for (index, event) in events.iter().enumerate() {
        if previous.map_or(false, |prev| event.at < prev) {
            return Err(Error::UnsortedEvents { index });
        }
        previous = Some(event.at);

        let at = window.clamp(event.at);
        if !online {
            offline = offline + (at - cursor);
        }
        cursor = at;
        online = event.is_online;
    }

    // close the span still open at the right edge
    if !online {
        offline = offline + (window.to - cursor);
    }

    let offline = offline.clamp(Duration::zero(), total);
    let ratio = seconds_f64(offline) / seconds_f64(total);
    let uptime_pct = (100.0 * (1.0 - ratio)).clamp(0.0, 100.0);

    Ok(UptimeResult {
        camera_id: window.camera_id,
        offline_duration: offline,
        uptime_pct,
    })
}
