//! Rescheduling policies for planned patients the front desk cannot admit.
//!
//! A planned patient that cannot be served is removed from the simulation
//! and its arrival timestamp re-enters the [`ArrivalSchedule`] on another
//! day.  The policy only decides *which* day.

use std::fmt;

use icu_core::{IcuError, SimRng, wrap_day};
use serde::{Deserialize, Serialize};

use crate::ArrivalSchedule;

/// Days scanned by [`ReschedulePolicy::LowestLoadThisWeek`].
const WEEK: u16 = 7;

/// Latest offset [`ReschedulePolicy::RandomWithinTwoWeeks`] may pick.
const RANDOM_WINDOW: u16 = 14;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReschedulePolicy {
    /// Tomorrow (day 365 rolls over to day 1).
    NextDay,
    /// A uniformly random day 1 to 14 days ahead.
    RandomWithinTwoWeeks,
    /// The least-booked of the seven days starting today; ties go to the
    /// earliest day scanned.
    LowestLoadThisWeek,
}

impl ReschedulePolicy {
    /// The configuration number (`1`, `2`, `3`).
    pub fn number(self) -> u8 {
        match self {
            ReschedulePolicy::NextDay              => 1,
            ReschedulePolicy::RandomWithinTwoWeeks => 2,
            ReschedulePolicy::LowestLoadThisWeek   => 3,
        }
    }

    /// Choose the day a patient unserved on `today` is moved to.
    pub fn target_day(self, today: u16, schedule: &ArrivalSchedule, rng: &mut SimRng) -> u16 {
        match self {
            ReschedulePolicy::NextDay => wrap_day(today as i64 + 1),
            ReschedulePolicy::RandomWithinTwoWeeks => {
                let offset = rng.gen_range(1..=RANDOM_WINDOW);
                wrap_day(today as i64 + offset as i64)
            }
            ReschedulePolicy::LowestLoadThisWeek => {
                let mut best = wrap_day(today as i64);
                let mut best_load = schedule.len_of(best);
                for offset in 1..WEEK {
                    let day = wrap_day(today as i64 + offset as i64);
                    let load = schedule.len_of(day);
                    if load < best_load {
                        best = day;
                        best_load = load;
                    }
                }
                best
            }
        }
    }

    /// Move `timestamp` to the day picked by this policy and return that day.
    ///
    /// Exactly one entry is inserted, into exactly one day, in sorted position.
    pub fn reschedule(
        self,
        today:     u16,
        timestamp: u32,
        schedule:  &mut ArrivalSchedule,
        rng:       &mut SimRng,
    ) -> u16 {
        let day = self.target_day(today, schedule, rng);
        schedule.insert(day, timestamp);
        day
    }
}

impl TryFrom<u8> for ReschedulePolicy {
    type Error = IcuError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(ReschedulePolicy::NextDay),
            2 => Ok(ReschedulePolicy::RandomWithinTwoWeeks),
            3 => Ok(ReschedulePolicy::LowestLoadThisWeek),
            other => Err(IcuError::Config(format!("unknown reschedule policy {other}"))),
        }
    }
}

impl From<ReschedulePolicy> for u8 {
    fn from(policy: ReschedulePolicy) -> u8 {
        policy.number()
    }
}

impl fmt::Display for ReschedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReschedulePolicy::NextDay              => "next-day",
            ReschedulePolicy::RandomWithinTwoWeeks => "random-1-14-days",
            ReschedulePolicy::LowestLoadThisWeek   => "lowest-load-week",
        })
    }
}
