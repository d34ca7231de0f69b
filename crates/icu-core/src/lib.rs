//! `icu-core`: foundational types for the ICU capacity simulator.
//!
//! This crate is a dependency of every other `icu-*` crate.  It has no
//! `icu-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `PatientId`, `DepartmentId`                               |
//! | [`time`]        | `Clock`, `Timestamp`, `Boundaries`, calendar constants    |
//! | [`rng`]         | `SimRng` (seeded, per-component)                          |
//! | [`specialty`]   | `Specialty` codes and the numeric code table              |
//! | [`profile`]     | `PatientProfile`, `Gender`                                |
//! | [`config`]      | `ModelConfig` and its validation                          |
//! | [`error`]       | `IcuError`, `IcuResult`                                   |

pub mod config;
pub mod error;
pub mod ids;
pub mod profile;
pub mod rng;
pub mod specialty;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::ModelConfig;
pub use error::{IcuError, IcuResult};
pub use ids::{DepartmentId, PatientId};
pub use profile::{Gender, PatientProfile};
pub use rng::SimRng;
pub use specialty::Specialty;
pub use time::{Boundaries, Clock, DAYS_PER_YEAR, SECONDS_PER_DAY, Timestamp, wrap_day};
