//! Fluent builder for constructing a [`Model`].

use std::sync::Arc;

use icu_agent::{BedSelector, Department, PatientStore, pick_random_free_slot};
use icu_core::{Clock, DepartmentId, ModelConfig, SimRng};
use icu_schedule::{ArrivalSchedule, Calibration, ReschedulePolicy};
use log::{info, warn};

use crate::{CostLedger, EventLog, Frontdesk, Home, Model, SimError, SimResult, SpecialtyIndex};

// Child-stream offsets.  Fixed so that a seed always produces the same run.
const SCHEDULE_STREAM:   u64 = 1;
const FRONTDESK_STREAM:  u64 = 2;
const HOME_STREAM:       u64 = 3;
const DEPARTMENT_STREAM: u64 = 100;

/// Fluent builder for [`Model`].
///
/// # Required inputs
///
/// - [`ModelConfig`]: volume, clock speed, departments, policy, …
/// - `Arc<dyn Calibration>`: arrival fractions, arrival times, profiles
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                        |
/// |------------------------|------------------------------------------------|
/// | `.schedule(t)`         | drawn from the calibration at build time       |
/// | `.bed_selector(f)`     | [`pick_random_free_slot`]                      |
///
/// # Example
///
/// ```rust,ignore
/// let calibration = Arc::new(HistoricalCalibration::from_records(&rows));
/// let mut model = ModelBuilder::new(config, calibration).build()?;
/// model.run_days(30, &mut NoopObserver)?;
/// ```
pub struct ModelBuilder {
    config:       ModelConfig,
    calibration:  Arc<dyn Calibration>,
    schedule:     Option<ArrivalSchedule>,
    bed_selector: BedSelector,
}

impl ModelBuilder {
    pub fn new(config: ModelConfig, calibration: Arc<dyn Calibration>) -> Self {
        Self { config, calibration, schedule: None, bed_selector: pick_random_free_slot }
    }

    /// Start from a given planned-arrival table instead of drawing one.
    ///
    /// The table is still redrawn from the calibration at every year
    /// rollover.
    pub fn schedule(mut self, schedule: ArrivalSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Bed-choice policy installed in every department.
    pub fn bed_selector(mut self, selector: BedSelector) -> Self {
        self.bed_selector = selector;
        self
    }

    /// Validate the configuration and assemble a ready-to-step [`Model`].
    pub fn build(self) -> SimResult<Model> {
        let config = self.config;
        config.validate()?;
        let policy = ReschedulePolicy::try_from(config.reschedule_policy)?;
        let routes = SpecialtyIndex::build(&config.departments)?;
        for spec in routes.unrouted() {
            warn!("no department serves {spec}; its patients are refused or rescheduled");
        }

        // ── RNG streams ───────────────────────────────────────────────────
        let mut root = match config.seed {
            Some(seed) => SimRng::new(seed),
            None => SimRng::from_entropy(),
        };
        let mut schedule_rng = root.child(SCHEDULE_STREAM);
        let frontdesk_rng = root.child(FRONTDESK_STREAM);
        let home_rng = root.child(HOME_STREAM);

        // ── Departments ───────────────────────────────────────────────────
        let quantum = config.quantum_secs();
        let bonus = (quantum as f64 * config.efficiency()) as u64;
        let mut departments = Vec::with_capacity(config.departments.len());
        let mut decrements = Vec::with_capacity(config.departments.len());
        for (i, ((specialties, share), &specialized)) in config
            .departments
            .iter()
            .zip(&config.distribution)
            .zip(&config.specialized)
            .enumerate()
        {
            let id = DepartmentId(
                u16::try_from(i).map_err(|_| SimError::Config("too many departments".into()))?,
            );
            let capacity = (config.capacity as f64 * share).floor() as u32;
            let rng = root.child(DEPARTMENT_STREAM + i as u64);
            departments.push(
                Department::new(id, specialties.clone(), capacity, specialized, config.pandemic_fraction(), rng)
                    .with_selector(self.bed_selector),
            );
            decrements.push(quantum as u64 + if specialized { bonus } else { 0 });
        }

        // ── Schedule ──────────────────────────────────────────────────────
        let schedule = match self.schedule {
            Some(table) => table,
            None => ArrivalSchedule::generate(self.calibration.as_ref(), config.yearly_volume, &mut schedule_rng),
        };

        let clock = Clock::new(config.clock_speed_minutes);
        let labels = departments.iter().map(Department::label).collect();
        info!(
            "model built: {} departments, {} beds, {} min/step, policy {policy}, {} planned arrivals",
            departments.len(),
            departments.iter().map(Department::capacity).sum::<u32>(),
            config.clock_speed_minutes,
            schedule.total()
        );

        Ok(Model {
            last_year:    clock.year(),
            clock,
            departments,
            decrements,
            routes,
            frontdesk:    Frontdesk::new(policy, frontdesk_rng),
            home:         Home::new(config.yearly_volume, config.use_surge, home_rng),
            patients:     PatientStore::new(),
            schedule,
            calibration:  self.calibration,
            schedule_rng,
            events:       EventLog::new(labels),
            costs:        CostLedger::new(config.bed_day_cost, quantum),
            steps:        0,
            config,
        })
    }
}
