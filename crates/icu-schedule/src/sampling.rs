//! Arrival counts and intra-day arrival times.
//!
//! Both functions absorb [`IcuError::DataUnavailable`](icu_core::IcuError)
//! by logging a warning and returning an empty day.

use icu_core::{SECONDS_PER_DAY, SimRng};
use log::warn;
use rand_distr::{Distribution, Normal};

use crate::Calibration;

/// Number of arrivals expected on `day`: `floor(yearly_volume × fraction)`.
pub fn daily_arrival_count<C: Calibration + ?Sized>(
    calibration:   &C,
    day:           u16,
    planned:       bool,
    yearly_volume: u32,
) -> usize {
    match calibration.daily_admission_fraction(day, planned) {
        Ok(fraction) if fraction.is_finite() && fraction > 0.0 => {
            (yearly_volume as f64 * fraction).floor() as usize
        }
        Ok(_) => 0,
        Err(e) => {
            warn!("day {day}: no {} arrivals ({e})", kind(planned));
            0
        }
    }
}

/// Draw `n` arrival times of day, sorted ascending.
///
/// Samples come from `Normal(mean, std)`, are truncated to whole seconds and
/// clamped into `0..SECONDS_PER_DAY`.
pub fn sample_arrival_times<C: Calibration + ?Sized>(
    calibration: &C,
    n:           usize,
    planned:     bool,
    rng:         &mut SimRng,
) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    let stats = match calibration.arrival_hour_stats(planned) {
        Ok(stats) => stats,
        Err(e) => {
            warn!("no {} arrival-time distribution ({e}); dropping {n} arrivals", kind(planned));
            return Vec::new();
        }
    };
    let normal = match Normal::new(stats.mean_secs, stats.std_secs) {
        Ok(normal) => normal,
        Err(e) => {
            warn!(
                "invalid {} arrival-time distribution ({}, {}): {e}",
                kind(planned),
                stats.mean_secs,
                stats.std_secs
            );
            return Vec::new();
        }
    };

    let last = (SECONDS_PER_DAY - 1) as f64;
    let mut times: Vec<u32> = (0..n)
        .map(|_| normal.sample(rng.inner()).trunc().clamp(0.0, last) as u32)
        .collect();
    times.sort_unstable();
    times
}

fn kind(planned: bool) -> &'static str {
    if planned { "planned" } else { "unplanned" }
}
