//! The `OutputWriter` trait implemented by every backend.

use icu_sim::{
    CapacitySnapshot, CostRecord, DailyVolumeRecord, DischargeRecord, RefusalRecord,
    RescheduleRecord,
};

use crate::OutputResult;

/// A sink for the event streams of one simulation run.
///
/// Each method receives only rows not yet written; backends append them in
/// order.  Empty slices are allowed and must be a no-op.
pub trait OutputWriter {
    fn write_admissions(&mut self, rows: &[DischargeRecord]) -> OutputResult<()>;

    fn write_refused(&mut self, rows: &[RefusalRecord]) -> OutputResult<()>;

    fn write_replanning(&mut self, rows: &[RescheduleRecord]) -> OutputResult<()>;

    fn write_amount(&mut self, rows: &[DailyVolumeRecord]) -> OutputResult<()>;

    fn write_costs(&mut self, rows: &[CostRecord]) -> OutputResult<()>;

    fn write_capacity(&mut self, rows: &[CapacitySnapshot]) -> OutputResult<()>;

    /// Flush and close all underlying resources.
    ///
    /// Called once from [`SimOutputObserver::on_sim_end`][crate::SimOutputObserver].
    /// Implementations should be idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
