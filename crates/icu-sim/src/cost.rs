//! `CostLedger`: cumulative bed cost on two bases.
//!
//! Every step costs `bed_day_cost / 86400 × quantum_secs` per bed.  The
//! ledger accrues that rate against the empty beds (the historical report's
//! metric) and against the occupied beds, in an hourly and a daily
//! accumulator each.  The orchestrator resets the hourly pair after writing
//! an hour row and the daily pair at midnight.

use icu_core::{SECONDS_PER_DAY, Timestamp};

use crate::records::CostRecord;

#[derive(Clone, Debug, PartialEq)]
pub struct CostLedger {
    per_bed_step:    f64,
    hourly_free:     f64,
    daily_free:      f64,
    hourly_occupied: f64,
    daily_occupied:  f64,
}

impl CostLedger {
    pub fn new(bed_day_cost: f64, quantum_secs: u32) -> Self {
        Self {
            per_bed_step:    bed_day_cost / SECONDS_PER_DAY as f64 * quantum_secs as f64,
            hourly_free:     0.0,
            daily_free:      0.0,
            hourly_occupied: 0.0,
            daily_occupied:  0.0,
        }
    }

    /// Cost of one bed for one step.
    #[inline]
    pub fn per_bed_step(&self) -> f64 {
        self.per_bed_step
    }

    /// Accrue one step with `free` empty and `occupied` occupied beds.
    pub fn accrue(&mut self, free: u32, occupied: u32) {
        let free_cost = self.per_bed_step * free as f64;
        let occupied_cost = self.per_bed_step * occupied as f64;
        self.hourly_free += free_cost;
        self.daily_free += free_cost;
        self.hourly_occupied += occupied_cost;
        self.daily_occupied += occupied_cost;
    }

    pub fn record(&self, at: Timestamp, empty_beds: u32, occupied_beds: u32) -> CostRecord {
        CostRecord {
            at,
            empty_beds,
            occupied_beds,
            hourly_free_cost:     self.hourly_free,
            daily_free_cost:      self.daily_free,
            hourly_occupied_cost: self.hourly_occupied,
            daily_occupied_cost:  self.daily_occupied,
        }
    }

    pub fn reset_hourly(&mut self) {
        self.hourly_free = 0.0;
        self.hourly_occupied = 0.0;
    }

    pub fn reset_daily(&mut self) {
        self.daily_free = 0.0;
        self.daily_occupied = 0.0;
    }
}
