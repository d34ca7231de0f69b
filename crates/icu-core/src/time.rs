//! Simulation time model.
//!
//! # Design
//!
//! Time is a calendar (`second → minute → hour → day → month → year`) rather
//! than a bare tick counter, because arrival schedules are keyed by
//! day-of-year and intra-day timestamps.  Each call to [`Clock::advance`]
//! adds one fixed quantum of seconds to `second` and carries upward:
//!
//! ```text
//! second ──60──▶ minute ──60──▶ hour ──24──▶ day ──month len──▶ month ──12──▶ year ──100──▶ 0
//! ```
//!
//! Month lengths are the non-leap table; there is no leap-year handling.
//!
//! `day_index` is a running day-of-year in `[1, 365]` that moves by exactly
//! one per day boundary crossed, independent of the calendar fields.  The
//! 2-digit `year` wraps at 100 and fires the registered century callbacks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{IcuError, IcuResult};

/// Seconds in one simulated day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Length of the arrival schedule year.
pub const DAYS_PER_YEAR: u16 = 365;

/// Two-digit year at which every run starts (2025).
pub const START_YEAR: u8 = 25;

const MONTH_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Map any (possibly out-of-range) day number onto `[1, 365]`.
///
/// `wrap_day(366) == 1`, `wrap_day(0) == 365`.
#[inline]
pub fn wrap_day(day: i64) -> u16 {
    ((day - 1).rem_euclid(DAYS_PER_YEAR as i64) + 1) as u16
}

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// A copyable snapshot of the calendar fields of a [`Clock`].
///
/// `Display` renders the full form `20YY/MM/DD hh:mm:ss`; [`Timestamp::short`]
/// renders `DD/MM/YY hh:mm:ss`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Timestamp {
    pub year:   u8,
    pub month:  u8,
    pub day:    u8,
    pub hour:   u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    /// Midnight on January 1st of `year`.
    pub fn new_year(year: u8) -> Self {
        Self { year, month: 1, day: 1, hour: 0, minute: 0, second: 0 }
    }

    /// Check every field against the non-leap calendar.
    pub fn validate(&self) -> IcuResult<()> {
        let invalid = |field: &str| Err(IcuError::Config(format!("{field} out of range in {self:?}")));
        if self.year >= 100 {
            return invalid("year");
        }
        if !(1..=12).contains(&self.month) {
            return invalid("month");
        }
        if self.day == 0 || self.day > MONTH_LENGTHS[self.month as usize - 1] {
            return invalid("day");
        }
        if self.hour >= 24 {
            return invalid("hour");
        }
        if self.minute >= 60 {
            return invalid("minute");
        }
        if self.second >= 60 {
            return invalid("second");
        }
        Ok(())
    }

    /// Seconds since midnight.
    #[inline]
    pub fn day_seconds(&self) -> u32 {
        self.second as u32 + self.minute as u32 * 60 + self.hour as u32 * 3_600
    }

    /// Day-of-year of the calendar date (`1..=365`).  Only meaningful for a
    /// timestamp that passes [`Timestamp::validate`].
    pub fn day_of_year(&self) -> u16 {
        let before: u16 = MONTH_LENGTHS[..(self.month as usize - 1)]
            .iter()
            .map(|&d| d as u16)
            .sum();
        before + self.day as u16
    }

    /// `DD/MM/YY hh:mm:ss`.
    pub fn short(&self) -> String {
        format!(
            "{:02}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "20{:02}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

// ── Boundaries ────────────────────────────────────────────────────────────────

/// Which calendar boundaries a single [`Clock::advance`] crossed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Boundaries {
    pub hour:    bool,
    pub day:     bool,
    pub month:   bool,
    pub year:    bool,
    /// The 2-digit year wrapped from 99 to 0.
    pub century: bool,
    /// Number of day boundaries crossed (0 unless the quantum reaches midnight).
    pub days_crossed: u32,
}

// ── Clock ─────────────────────────────────────────────────────────────────────

type CenturyCallback = Box<dyn FnMut() + Send>;

/// The simulation's virtual calendar clock.
///
/// Advanced exactly once per model step by the orchestrator.
pub struct Clock {
    quantum_secs: u32,
    second:       u32,
    minute:       u32,
    hour:         u32,
    day:          u32,
    month:        u32,
    year:         u32,
    day_index:    u16,
    on_century:   Vec<CenturyCallback>,
}

impl Clock {
    /// A clock at 2025-01-01 00:00:00 that advances `clock_speed_minutes`
    /// per step.
    pub fn new(clock_speed_minutes: u32) -> Self {
        Self::at(clock_speed_minutes * 60, Timestamp::new_year(START_YEAR))
    }

    /// A clock positioned at `start` advancing `quantum_secs` per step.
    ///
    /// `day_index` is derived from the calendar date of `start`.  Fails with
    /// [`IcuError::Config`] for a zero quantum or a start outside the
    /// calendar.
    pub fn starting_at(quantum_secs: u32, start: Timestamp) -> IcuResult<Self> {
        if quantum_secs == 0 {
            return Err(IcuError::Config("clock quantum must be positive".into()));
        }
        start.validate()?;
        Ok(Self::at(quantum_secs, start))
    }

    fn at(quantum_secs: u32, start: Timestamp) -> Self {
        Self {
            quantum_secs,
            second:     start.second as u32,
            minute:     start.minute as u32,
            hour:       start.hour as u32,
            day:        start.day as u32,
            month:      start.month as u32,
            year:       start.year as u32,
            day_index:  start.day_of_year(),
            on_century: Vec::new(),
        }
    }

    /// Register a callback fired every time the 2-digit year wraps to 0.
    pub fn on_century_wrap<F: FnMut() + Send + 'static>(&mut self, callback: F) {
        self.on_century.push(Box::new(callback));
    }

    /// Advance by one quantum and carry into the higher units.
    pub fn advance(&mut self) -> Boundaries {
        let mut crossed = Boundaries::default();

        self.second += self.quantum_secs;
        let minutes = self.second / 60;
        self.second %= 60;
        if minutes == 0 {
            return crossed;
        }

        self.minute += minutes;
        let hours = self.minute / 60;
        self.minute %= 60;
        if hours == 0 {
            return crossed;
        }

        crossed.hour = true;
        self.hour += hours;
        let days = self.hour / 24;
        self.hour %= 24;

        for _ in 0..days {
            self.next_day(&mut crossed);
        }
        crossed
    }

    fn next_day(&mut self, crossed: &mut Boundaries) {
        crossed.day = true;
        crossed.days_crossed += 1;
        self.day_index = if self.day_index >= DAYS_PER_YEAR { 1 } else { self.day_index + 1 };

        self.day += 1;
        if self.day <= MONTH_LENGTHS[self.month as usize - 1] as u32 {
            return;
        }
        self.day = 1;
        crossed.month = true;

        self.month += 1;
        if self.month <= 12 {
            return;
        }
        self.month = 1;
        crossed.year = true;

        self.year += 1;
        if self.year >= 100 {
            self.year = 0;
            crossed.century = true;
            for callback in &mut self.on_century {
                callback();
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Seconds advanced per step.
    #[inline]
    pub fn quantum_secs(&self) -> u32 {
        self.quantum_secs
    }

    /// Running day-of-year in `[1, 365]`.
    #[inline]
    pub fn day_index(&self) -> u16 {
        self.day_index
    }

    /// Seconds since midnight; the comparison key for arrivals.
    #[inline]
    pub fn day_timestamp(&self) -> u32 {
        self.second + self.minute * 60 + self.hour * 3_600
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.hour
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Two-digit year.
    #[inline]
    pub fn year(&self) -> u32 {
        self.year
    }

    /// Days since the start of 2025, used to index historical surge series.
    /// Negative after the century wrap.
    pub fn epoch_day(&self) -> i64 {
        (self.year as i64 - START_YEAR as i64) * DAYS_PER_YEAR as i64 + self.day_index as i64
    }

    /// Snapshot of the calendar fields.
    pub fn now(&self) -> Timestamp {
        Timestamp {
            year:   self.year as u8,
            month:  self.month as u8,
            day:    self.day as u8,
            hour:   self.hour as u8,
            minute: self.minute as u8,
            second: self.second as u8,
        }
    }

    /// Display string; `full` selects `20YY/MM/DD hh:mm:ss` over `DD/MM/YY hh:mm:ss`.
    pub fn formatted_time(&self, full: bool) -> String {
        let now = self.now();
        if full { now.to_string() } else { now.short() }
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("now", &self.now())
            .field("day_index", &self.day_index)
            .field("quantum_secs", &self.quantum_secs)
            .field("century_callbacks", &self.on_century.len())
            .finish()
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {})", self.now(), self.day_index)
    }
}
