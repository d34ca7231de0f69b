//! Flat records appended to the [`EventLog`](crate::EventLog) streams.
//!
//! Discharge records come from `icu-agent` ([`DischargeRecord`]); the rest are
//! produced by the front desk, the arrival generator and the orchestrator.

use icu_core::{PatientId, Specialty, Timestamp};
use icu_schedule::ReschedulePolicy;

pub use icu_agent::DischargeRecord;

/// An unplanned patient turned away.
#[derive(Clone, Debug, PartialEq)]
pub struct RefusalRecord {
    pub patient:   PatientId,
    pub specialty: Specialty,
    pub at:        Timestamp,
}

/// A planned patient moved to another day.
#[derive(Clone, Debug, PartialEq)]
pub struct RescheduleRecord {
    pub patient:    PatientId,
    pub specialty:  Specialty,
    pub at:         Timestamp,
    pub policy:     ReschedulePolicy,
    /// Day-of-year the arrival was re-inserted on.
    pub target_day: u16,
}

/// Arrivals expected on one day, recorded when the day starts.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyVolumeRecord {
    pub at:        Timestamp,
    pub day:       u16,
    pub unplanned: usize,
    /// Planned arrivals in the schedule for the day when it started.
    pub planned:   usize,
}

impl DailyVolumeRecord {
    #[inline]
    pub fn total(&self) -> usize {
        self.unplanned + self.planned
    }
}

/// Cumulative bed cost, written on every hour boundary.
///
/// The `*_free_*` fields cost the empty beds; the `*_occupied_*` fields cost
/// the occupied ones.
#[derive(Clone, Debug, PartialEq)]
pub struct CostRecord {
    pub at:                   Timestamp,
    pub empty_beds:           u32,
    pub occupied_beds:        u32,
    pub hourly_free_cost:     f64,
    pub daily_free_cost:      f64,
    pub hourly_occupied_cost: f64,
    pub daily_occupied_cost:  f64,
}

/// Free beds per department, in department order, on an hour boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct CapacitySnapshot {
    pub at:   Timestamp,
    pub free: Vec<u32>,
}
