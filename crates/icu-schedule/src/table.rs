//! `ArrivalSchedule`: the annual planned-arrival table.
//!
//! Maps every day-of-year (`1..=365`) to an ascending queue of intra-day
//! timestamps (seconds since midnight) at which a planned patient is due.
//!
//! The table is owned by the model and lent by `&mut` to the two
//! components allowed to change it during a step: the arrival generator
//! (pops due entries) and the front desk (inserts rescheduled entries).
//! Every mutation keeps the affected day sorted.

use std::collections::VecDeque;

use icu_core::{DAYS_PER_YEAR, SimRng, wrap_day};
use log::info;

use crate::sampling::{daily_arrival_count, sample_arrival_times};
use crate::Calibration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalSchedule {
    days: Vec<VecDeque<u32>>,
}

impl Default for ArrivalSchedule {
    fn default() -> Self {
        Self::empty()
    }
}

impl ArrivalSchedule {
    /// A table with 365 empty days.
    pub fn empty() -> Self {
        Self { days: vec![VecDeque::new(); DAYS_PER_YEAR as usize] }
    }

    /// Draw a fresh year of planned arrivals.
    ///
    /// For every day the planned fraction of `yearly_volume` is sampled into
    /// sorted arrival timestamps.  Days the calibration cannot describe get
    /// no arrivals.
    pub fn generate<C: Calibration + ?Sized>(
        calibration:   &C,
        yearly_volume: u32,
        rng:           &mut SimRng,
    ) -> Self {
        let mut table = Self::empty();
        for day in 1..=DAYS_PER_YEAR {
            let count = daily_arrival_count(calibration, day, true, yearly_volume);
            let times = sample_arrival_times(calibration, count, true, rng);
            table.days[slot(day)] = times.into();
        }
        info!(
            "generated annual schedule: {} planned arrivals over {} days",
            table.total(),
            DAYS_PER_YEAR
        );
        table
    }

    /// Pending timestamps for `day`, earliest first.
    pub fn day(&self, day: u16) -> &VecDeque<u32> {
        &self.days[slot(day)]
    }

    /// Number of pending arrivals on `day`.
    #[inline]
    pub fn len_of(&self, day: u16) -> usize {
        self.days[slot(day)].len()
    }

    /// Earliest pending timestamp on `day`.
    #[inline]
    pub fn peek(&self, day: u16) -> Option<u32> {
        self.days[slot(day)].front().copied()
    }

    /// Insert `timestamp` on `day`, after any equal entries.
    pub fn insert(&mut self, day: u16, timestamp: u32) {
        let queue = &mut self.days[slot(day)];
        let at = queue.partition_point(|&t| t <= timestamp);
        queue.insert(at, timestamp);
    }

    /// Replace the whole of `day` with `timestamps` (sorted on the way in).
    pub fn set_day(&mut self, day: u16, mut timestamps: Vec<u32>) {
        timestamps.sort_unstable();
        self.days[slot(day)] = timestamps.into();
    }

    /// Pop the earliest entry of `day` if it is due at `now` (seconds since
    /// midnight).
    pub fn pop_due(&mut self, day: u16, now: u32) -> Option<u32> {
        let queue = &mut self.days[slot(day)];
        match queue.front() {
            Some(&t) if t <= now => queue.pop_front(),
            _ => None,
        }
    }

    /// Total pending arrivals across all days.
    pub fn total(&self) -> usize {
        self.days.iter().map(VecDeque::len).sum()
    }

    /// Number of days in the table (always 365).
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Iterate `(day, queue)` in day order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &VecDeque<u32>)> + '_ {
        self.days.iter().enumerate().map(|(i, q)| (i as u16 + 1, q))
    }
}

#[inline]
fn slot(day: u16) -> usize {
    wrap_day(day as i64) as usize - 1
}
