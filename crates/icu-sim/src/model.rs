//! The `Model` struct and its step loop.

use std::sync::Arc;

use icu_agent::{Department, PatientEvent, PatientStore};
use icu_core::{Clock, DepartmentId, IcuError, ModelConfig, SimRng};
use icu_schedule::{ArrivalSchedule, Calibration};
use log::info;

use crate::frontdesk::{Desk, Frontdesk};
use crate::records::CapacitySnapshot;
use crate::{CostLedger, EventLog, Home, SimObserver, SimResult, SpecialtyIndex};

// ── Model ─────────────────────────────────────────────────────────────────────

/// The simulation orchestrator.
///
/// `Model` owns every piece of run state and drives the step:
///
/// 1. **Clock**: advance one quantum and note the boundaries crossed.
/// 2. **Front desk**: admit, reschedule or refuse one waiting patient.
/// 3. **Departments**: recompute free capacity (parallel with `parallel`).
/// 4. **Home**: start the day if needed; release due arrivals.
/// 5. **Patients**: in ascending id order, advance the state machine; free
///    the bed of every discharged patient.
/// 6. **Bookkeeping**: aggregate free capacity, cost accrual, hourly cost
///    and capacity rows, daily cost reset.
/// 7. **Year rollover**: redraw the planned-arrival schedule.
///
/// Create via [`ModelBuilder`][crate::ModelBuilder].
pub struct Model {
    pub(crate) config:       ModelConfig,
    pub(crate) clock:        Clock,
    pub(crate) departments:  Vec<Department>,
    /// Seconds of stay consumed per step, per department.
    pub(crate) decrements:   Vec<u64>,
    pub(crate) routes:       SpecialtyIndex,
    pub(crate) frontdesk:    Frontdesk,
    pub(crate) home:         Home,
    pub(crate) patients:     PatientStore,
    pub(crate) schedule:     ArrivalSchedule,
    pub(crate) calibration:  Arc<dyn Calibration>,
    pub(crate) schedule_rng: SimRng,
    pub(crate) events:       EventLog,
    pub(crate) costs:        CostLedger,
    pub(crate) last_year:    u32,
    pub(crate) steps:        u64,
}

impl Model {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run exactly `n` steps, calling observer hooks around each one.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let step = self.steps;
            observer.on_step_start(step);
            self.step()?;
            observer.on_step_end(step, &self.events);
        }
        observer.on_sim_end(self.steps);
        Ok(())
    }

    /// Run `days × 1440 / clock_speed` steps.
    pub fn run_days<O: SimObserver>(&mut self, days: u64, observer: &mut O) -> SimResult<()> {
        let n = self.config.steps_for_days(days);
        self.run_steps(n, observer)
    }

    /// Advance the whole model by one quantum.
    ///
    /// Configuration and invariant errors abort the step; the model should
    /// not be stepped again afterwards.
    pub fn step(&mut self) -> SimResult<()> {
        // ── 1: clock ──────────────────────────────────────────────────────
        let crossed = self.clock.advance();
        let now = self.clock.now();
        let day = self.clock.day_index();

        // ── 2: front desk ─────────────────────────────────────────────────
        self.frontdesk.step(
            now,
            day,
            &self.routes,
            Desk {
                patients:    &mut self.patients,
                departments: &mut self.departments,
                schedule:    &mut self.schedule,
                events:      &mut self.events,
            },
        )?;

        // ── 3: departments ────────────────────────────────────────────────
        self.step_departments();

        // ── 4: arrivals ───────────────────────────────────────────────────
        self.home.step(
            &self.clock,
            self.calibration.as_ref(),
            &mut self.schedule,
            &mut self.patients,
            &mut self.events,
        )?;

        // ── 5: patients ───────────────────────────────────────────────────
        for id in self.patients.ids() {
            let patient = self.patients.get_mut(id)?;
            let used = match patient.department() {
                Some(d) => self.decrements.get(d.index()).copied().ok_or(IcuError::DepartmentNotFound(d))?,
                None => 0,
            };
            let event = patient.step(now, |_| used)?;
            if let PatientEvent::Discharged(record) = event {
                let department = department_mut(&mut self.departments, record.department)?;
                if department.free(id) != 1 {
                    return Err(IcuError::InvariantViolation(format!(
                        "{id} discharged from {} without holding exactly one bed",
                        record.department
                    ))
                    .into());
                }
                self.patients.remove(id)?;
                self.events.push_admission(record);
            }
        }

        // ── 6: bookkeeping ────────────────────────────────────────────────
        let free = self.free_capacity();
        let occupied = self.total_capacity().saturating_sub(free);
        self.events.push_free_capacity(free);
        self.costs.accrue(free, occupied);
        if crossed.hour {
            self.events.push_cost(self.costs.record(now, free, occupied));
            self.events.push_capacity(CapacitySnapshot {
                at:   now,
                free: self.departments.iter().map(Department::free_capacity).collect(),
            });
            self.costs.reset_hourly();
        }
        if crossed.day {
            self.costs.reset_daily();
        }

        // ── 7: year rollover ──────────────────────────────────────────────
        let year = self.clock.year();
        if year != self.last_year {
            self.last_year = year;
            self.schedule = ArrivalSchedule::generate(
                self.calibration.as_ref(),
                self.config.yearly_volume,
                &mut self.schedule_rng,
            );
            info!("year rollover at {now}: annual schedule regenerated");
        }

        self.steps += 1;
        Ok(())
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable clock access, e.g. to register century-wrap callbacks.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments.get(id.index())
    }

    pub fn routes(&self) -> &SpecialtyIndex {
        &self.routes
    }

    pub fn frontdesk(&self) -> &Frontdesk {
        &self.frontdesk
    }

    pub fn home(&self) -> &Home {
        &self.home
    }

    pub fn patients(&self) -> &PatientStore {
        &self.patients
    }

    pub fn schedule(&self) -> &ArrivalSchedule {
        &self.schedule
    }

    /// The planned-arrival table.  Changes made here are seen by the next step.
    pub fn schedule_mut(&mut self) -> &mut ArrivalSchedule {
        &mut self.schedule
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn costs(&self) -> &CostLedger {
        &self.costs
    }

    /// Steps executed so far.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Free beds across all departments, as of the last department step.
    pub fn free_capacity(&self) -> u32 {
        self.departments.iter().map(Department::free_capacity).sum()
    }

    /// `(label, free beds)` per department.
    pub fn free_capacity_by_department(&self) -> Vec<(String, u32)> {
        self.departments.iter().map(|d| (d.label(), d.free_capacity())).collect()
    }

    pub fn total_capacity(&self) -> u32 {
        self.departments.iter().map(Department::capacity).sum()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn step_departments(&mut self) {
        #[cfg(not(feature = "parallel"))]
        {
            self.departments.iter_mut().for_each(Department::step);
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.departments.par_iter_mut().for_each(Department::step);
        }
    }
}

fn department_mut(departments: &mut [Department], id: DepartmentId) -> Result<&mut Department, IcuError> {
    departments.get_mut(id.index()).ok_or(IcuError::DepartmentNotFound(id))
}
