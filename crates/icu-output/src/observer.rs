//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use icu_sim::{EventLog, SimObserver};
use log::warn;

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Rows of each stream already handed to the writer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamCursors {
    pub admissions: usize,
    pub refused:    usize,
    pub replanning: usize,
    pub amount:     usize,
    pub costs:      usize,
    pub capacity:   usize,
}

/// A [`SimObserver`] that streams the [`EventLog`] to any [`OutputWriter`]
/// backend (CSV, SQLite, …).
///
/// After every step only the rows appended since the previous step are
/// written.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `run_days` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    cursors:    StreamCursors,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, cursors: StreamCursors::default(), last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn cursors(&self) -> StreamCursors {
        self.cursors
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write every row appended to `events` since the last call.
    pub fn flush_new(&mut self, events: &EventLog) -> OutputResult<()> {
        let c = &mut self.cursors;
        self.writer.write_admissions(tail(events.admissions(), &mut c.admissions))?;
        self.writer.write_refused(tail(events.refused(), &mut c.refused))?;
        self.writer.write_replanning(tail(events.replanning(), &mut c.replanning))?;
        self.writer.write_amount(tail(events.amount(), &mut c.amount))?;
        self.writer.write_costs(tail(events.costs(), &mut c.costs))?;
        self.writer.write_capacity(tail(events.capacity(), &mut c.capacity))?;
        Ok(())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output writer failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

/// The unseen suffix of `rows`; moves `cursor` to the end.
fn tail<'a, T>(rows: &'a [T], cursor: &mut usize) -> &'a [T] {
    let start = (*cursor).min(rows.len());
    *cursor = rows.len();
    &rows[start..]
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, _step: u64, events: &EventLog) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.flush_new(events);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _steps: u64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
