//! `Home`: the arrival generator.
//!
//! On the first step of every simulated day the generator draws the day's
//! unplanned arrival times.  On every step it releases at most one unplanned
//! and at most one planned patient whose arrival time has passed.
//!
//! ```text
//! unplanned(day) = floor(yearly_volume × fraction(day, unplanned))
//!                + surge(epoch_day)            (when surge injection is on)
//! ```

use std::collections::VecDeque;

use icu_agent::PatientStore;
use icu_core::{Clock, IcuResult, PatientId, SimRng};
use icu_schedule::{ArrivalSchedule, Calibration, daily_arrival_count, sample_arrival_times};
use log::{debug, warn};

use crate::EventLog;
use crate::records::DailyVolumeRecord;

pub struct Home {
    yearly_volume: u32,
    use_surge:     bool,
    rng:           SimRng,
    unplanned:     VecDeque<u32>,
    last_day:      Option<u16>,
}

impl Home {
    pub fn new(yearly_volume: u32, use_surge: bool, rng: SimRng) -> Self {
        Self { yearly_volume, use_surge, rng, unplanned: VecDeque::new(), last_day: None }
    }

    /// Unplanned arrival times still pending today.
    pub fn pending_unplanned(&self) -> &VecDeque<u32> {
        &self.unplanned
    }

    /// Advance one step; returns the ids of the patients created.
    pub fn step<C: Calibration + ?Sized>(
        &mut self,
        clock:       &Clock,
        calibration: &C,
        schedule:    &mut ArrivalSchedule,
        patients:    &mut PatientStore,
        events:      &mut EventLog,
    ) -> IcuResult<Vec<PatientId>> {
        let day = clock.day_index();
        if self.last_day != Some(day) {
            self.last_day = Some(day);
            self.start_day(clock, calibration, schedule, events);
        }

        let now = clock.day_timestamp();
        let mut created = Vec::with_capacity(2);

        if self.unplanned.front().is_some_and(|&t| t <= now) {
            if let Some(ts) = self.unplanned.pop_front() {
                created.extend(self.spawn(calibration, patients, false, ts));
            }
        }
        if let Some(ts) = schedule.pop_due(day, now) {
            created.extend(self.spawn(calibration, patients, true, ts));
        }
        Ok(created)
    }

    fn start_day<C: Calibration + ?Sized>(
        &mut self,
        clock:       &Clock,
        calibration: &C,
        schedule:    &ArrivalSchedule,
        events:      &mut EventLog,
    ) {
        let day = clock.day_index();
        let mut count = daily_arrival_count(calibration, day, false, self.yearly_volume);
        if self.use_surge {
            match calibration.historical_surge(clock.epoch_day()) {
                Ok(extra) => count += extra as usize,
                Err(e) => warn!("day {day}: no surge arrivals ({e})"),
            }
        }
        self.unplanned = sample_arrival_times(calibration, count, false, &mut self.rng).into();

        let record = DailyVolumeRecord {
            at:        clock.now(),
            day,
            unplanned: self.unplanned.len(),
            planned:   schedule.len_of(day),
        };
        debug!("day {day}: {} unplanned and {} planned arrivals", record.unplanned, record.planned);
        events.push_amount(record);
    }

    fn spawn<C: Calibration + ?Sized>(
        &mut self,
        calibration: &C,
        patients:    &mut PatientStore,
        planned:     bool,
        arrival_ts:  u32,
    ) -> Option<PatientId> {
        match calibration.sample_profiles(1, &mut self.rng) {
            Ok(mut profiles) => {
                let mut profile = profiles.pop()?;
                profile.los_secs = profile.los_secs.max(1);
                Some(patients.spawn(profile, planned, arrival_ts))
            }
            Err(e) => {
                warn!("arrival at {arrival_ts}s dropped: no patient profile ({e})");
                None
            }
        }
    }
}
