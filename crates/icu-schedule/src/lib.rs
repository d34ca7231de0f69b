//! `icu-schedule`: planned-arrival tables, rescheduling, and calibration.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`table`]       | `ArrivalSchedule` (day-of-year → sorted arrival times)     |
//! | [`policy`]      | `ReschedulePolicy` (next day, random 1–14 days, lowest load) |
//! | [`calibration`] | `Calibration` trait, `ArrivalStats`, `FixedCalibration`    |
//! | [`historical`]  | `HistoricalCalibration`, `AdmissionRecord`                 |
//! | [`sampling`]    | daily arrival counts and Normal arrival-time draws         |
//! | [`loader`]      | history and surge CSV loaders                              |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Arrival model (summary)
//!
//! ```text
//! count(day)  = floor(yearly_volume × daily_admission_fraction(day, planned))
//! times(day)  = sort(clamp(trunc(Normal(mean, std)), 0, 86399) × count)
//! ```
//!
//! Planned arrivals are drawn for the whole year at once into an
//! `ArrivalSchedule`; unplanned arrivals are drawn one day at a time by the
//! simulation's arrival generator.

pub mod calibration;
pub mod error;
pub mod historical;
pub mod loader;
pub mod policy;
pub mod sampling;
pub mod table;

#[cfg(test)]
mod tests;

pub use calibration::{ArrivalStats, Calibration, FixedCalibration};
pub use error::{ScheduleError, ScheduleResult};
pub use historical::{AdmissionRecord, HistoricalCalibration, NATIONAL_ICU_BEDS, SURGE_LOCAL_BEDS};
pub use loader::{load_history_csv, load_history_reader, load_surge_csv, load_surge_reader};
pub use policy::ReschedulePolicy;
pub use sampling::{daily_arrival_count, sample_arrival_times};
pub use table::ArrivalSchedule;
