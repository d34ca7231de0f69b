//! `icu-output`: writers for the event streams of an ICU simulation run.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                   |
//! |-----------|---------|-----------------------------------------------------------------|
//! | *(none)*  | CSV     | `opnames.csv`, `geweigerd.csv`, `replanning.csv`, `amount.csv`, `costs.csv`, `capacity.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                     |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `icu_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use icu_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./runs/run0/params0"), model.events().department_labels())?;
//! let mut obs = SimOutputObserver::new(writer);
//! model.run_days(365, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{SimOutputObserver, StreamCursors};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
