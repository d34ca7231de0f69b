//! The calibration contract consumed by the arrival process.
//!
//! A `Calibration` turns recorded admission data into the four quantities
//! the simulation needs: how much of the yearly volume falls on a day, when
//! during the day patients arrive, how large the historical surge was on a
//! given day, and which patient profiles to instantiate.
//!
//! Two implementations ship with the crate:
//!
//! - [`FixedCalibration`]: constant answers, for tests and what-if runs.
//! - [`HistoricalCalibration`](crate::HistoricalCalibration): derived from
//!   an admission-history CSV.

use icu_core::{IcuError, IcuResult, PatientProfile, SimRng};

/// Intra-day arrival time distribution, in seconds since midnight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrivalStats {
    pub mean_secs: f64,
    pub std_secs:  f64,
}

impl ArrivalStats {
    pub fn new(mean_secs: f64, std_secs: f64) -> Self {
        Self { mean_secs, std_secs }
    }
}

/// Source of calibrated arrival and patient data.
///
/// Every method may return [`IcuError::DataUnavailable`]; callers treat that
/// as "no arrivals" for the affected day.
pub trait Calibration: Send + Sync {
    /// Fraction of the yearly volume arriving on `day` (1..=365), restricted
    /// to planned or unplanned admissions.
    fn daily_admission_fraction(&self, day: u16, planned: bool) -> IcuResult<f64>;

    /// Mean and standard deviation of the arrival time of day.
    fn arrival_hour_stats(&self, planned: bool) -> IcuResult<ArrivalStats>;

    /// Extra unplanned arrivals on `epoch_day` (days since the simulated
    /// start, 1-based), already scaled to this ICU.
    fn historical_surge(&self, epoch_day: i64) -> IcuResult<u32>;

    /// Draw `n` patient profiles.
    fn sample_profiles(&self, n: usize, rng: &mut SimRng) -> IcuResult<Vec<PatientProfile>>;
}

// ── FixedCalibration ──────────────────────────────────────────────────────────

/// A calibration answering every query with configured constants.
///
/// Profiles are drawn uniformly from `profiles`; the surge series is indexed
/// by `epoch_day - 1` modulo its length, so day 1 reads the first entry.
#[derive(Clone, Debug)]
pub struct FixedCalibration {
    pub planned_fraction:   f64,
    pub unplanned_fraction: f64,
    pub planned_stats:      ArrivalStats,
    pub unplanned_stats:    ArrivalStats,
    pub surge:              Vec<u32>,
    pub profiles:           Vec<PatientProfile>,
}

impl FixedCalibration {
    /// No stochastic arrivals at all; every new patient uses `profile`.
    pub fn new(profile: PatientProfile) -> Self {
        let noon = ArrivalStats::new(12.0 * 3_600.0, 0.0);
        Self {
            planned_fraction:   0.0,
            unplanned_fraction: 0.0,
            planned_stats:      noon,
            unplanned_stats:    noon,
            surge:              Vec::new(),
            profiles:           vec![profile],
        }
    }

    pub fn with_fractions(mut self, planned: f64, unplanned: f64) -> Self {
        self.planned_fraction = planned;
        self.unplanned_fraction = unplanned;
        self
    }

    pub fn with_stats(mut self, planned: ArrivalStats, unplanned: ArrivalStats) -> Self {
        self.planned_stats = planned;
        self.unplanned_stats = unplanned;
        self
    }

    pub fn with_surge(mut self, surge: Vec<u32>) -> Self {
        self.surge = surge;
        self
    }

    pub fn with_profiles(mut self, profiles: Vec<PatientProfile>) -> Self {
        self.profiles = profiles;
        self
    }
}

impl Calibration for FixedCalibration {
    fn daily_admission_fraction(&self, _day: u16, planned: bool) -> IcuResult<f64> {
        Ok(if planned { self.planned_fraction } else { self.unplanned_fraction })
    }

    fn arrival_hour_stats(&self, planned: bool) -> IcuResult<ArrivalStats> {
        Ok(if planned { self.planned_stats } else { self.unplanned_stats })
    }

    fn historical_surge(&self, epoch_day: i64) -> IcuResult<u32> {
        if self.surge.is_empty() {
            return Err(IcuError::DataUnavailable("no surge series configured".into()));
        }
        let idx = (epoch_day - 1).rem_euclid(self.surge.len() as i64) as usize;
        Ok(self.surge[idx])
    }

    fn sample_profiles(&self, n: usize, rng: &mut SimRng) -> IcuResult<Vec<PatientProfile>> {
        (0..n)
            .map(|_| {
                rng.choose(&self.profiles)
                    .cloned()
                    .ok_or_else(|| IcuError::DataUnavailable("empty profile pool".into()))
            })
            .collect()
    }
}
