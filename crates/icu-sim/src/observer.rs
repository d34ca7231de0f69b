//! Simulation observer trait for progress reporting and data collection.

use crate::EventLog;

/// Callbacks invoked by [`Model::run_steps`][crate::Model::run_steps] around
/// every step.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: daily progress
///
/// ```rust,ignore
/// struct Progress { steps_per_day: u64 }
///
/// impl SimObserver for Progress {
///     fn on_step_end(&mut self, step: u64, events: &EventLog) {
///         if (step + 1) % self.steps_per_day == 0 {
///             println!("day {}: {} refused so far", (step + 1) / self.steps_per_day, events.refused().len());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the step runs.  `step` counts from 0.
    fn on_step_start(&mut self, _step: u64) {}

    /// Called after the step, including its bookkeeping, has completed.
    ///
    /// `events` is the full append-only log; rows appended by this step are
    /// at the end of each stream.
    fn on_step_end(&mut self, _step: u64, _events: &EventLog) {}

    /// Called once after the final step of a run.  `steps` is the total
    /// number of steps the model has executed.
    fn on_sim_end(&mut self, _steps: u64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
