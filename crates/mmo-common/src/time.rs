//! ---
//! mmo_section: "01-core-functionality"
//! mmo_subsection: "module"
//! mmo_type: "source"
//! mmo_scope: "code"
//! mmo_description: "Shared primitives and utilities for the core runtime."
//! mmo_version: "v0.0.0-prealpha"
//! mmo_owner: "tbd"
//! ---
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock seconds since the Unix epoch, with sub-second precision.
pub fn unix_time_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

/// Length of one frame at `fps` frames per second.
///
/// `None` unless `fps` is finite, positive, and slow enough that one frame
/// still fits in a [`Duration`].
pub fn frame_budget(fps: f32) -> Option<Duration> {
    if !fps.is_finite() || fps <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / f64::from(fps)).ok()
}

/// Convert a duration into microseconds, saturating at `u64::MAX`.
pub fn duration_to_micros(duration: Duration) -> u64 {
    duration
        .as_secs()
        .saturating_mul(1_000_000)
        .saturating_add(u64::from(duration.subsec_micros()))
}
