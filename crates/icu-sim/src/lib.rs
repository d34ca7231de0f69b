//! `icu-sim`: step loop orchestrator for the ICU capacity simulator.
//!
//! # Step (summary)
//!
//! ```text
//! for each step:
//!   ① Clock      : advance one quantum; note hour/day/year boundaries.
//!   ② Front desk : lowest-id waiting patient: assign a bed, reschedule
//!                  (planned) or refuse (unplanned).
//!   ③ Departments: recompute free capacity (parallel with `parallel`).
//!   ④ Home       : on a new day draw unplanned arrivals; release at most
//!                  one unplanned and one planned patient that are due.
//!   ⑤ Patients   : ascending id: EnRoute → InIcu, countdown, discharge.
//!   ⑥ Bookkeeping: free-capacity series, cost accrual, hourly cost and
//!                  capacity rows, daily cost reset.
//!   ⑦ Year       : redraw the annual planned-arrival schedule.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the department step on Rayon's thread pool.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use icu_core::ModelConfig;
//! use icu_schedule::HistoricalCalibration;
//! use icu_sim::{ModelBuilder, NoopObserver};
//!
//! let calibration = Arc::new(HistoricalCalibration::from_records(&history));
//! let mut model = ModelBuilder::new(ModelConfig::default(), calibration).build()?;
//! model.run_days(365, &mut NoopObserver)?;
//! println!("{} refused", model.events().refused().len());
//! ```

pub mod builder;
pub mod cost;
pub mod error;
pub mod events;
pub mod frontdesk;
pub mod home;
pub mod model;
pub mod observer;
pub mod records;
pub mod routing;


pub use builder::ModelBuilder;
pub use cost::CostLedger;
pub use error::{SimError, SimResult};
pub use events::EventLog;
pub use frontdesk::{Desk, Frontdesk, FrontdeskOutcome};
pub use home::Home;
pub use model::Model;
pub use observer::{NoopObserver, SimObserver};
pub use records::{
    CapacitySnapshot, CostRecord, DailyVolumeRecord, DischargeRecord, RefusalRecord,
    RescheduleRecord,
};
pub use routing::SpecialtyIndex;
