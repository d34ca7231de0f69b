//! Run configuration.
//!
//! `ModelConfig` is the full parameter surface of one simulation run.  Batch
//! runs deserialize a JSON array of these; the field aliases accept the
//! parameter names used by existing `batch_run_config.json` files
//! (`amount`, `clock_speed`, `planning_method`, …).
//!
//! Percentages are whole numbers (`efficiency_percent: 10` means 10 %).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{IcuError, IcuResult, Specialty};

/// Largest accepted clock speed: one simulated day per step.
pub const MAX_CLOCK_SPEED_MINUTES: u32 = 1_440;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Master RNG seed.  `None` seeds from OS entropy (non-reproducible).
    pub seed: Option<u64>,

    /// Yearly patient volume target the daily fractions are applied to.
    #[serde(alias = "amount")]
    pub yearly_volume: u32,

    /// Simulated minutes per step.
    #[serde(alias = "clock_speed")]
    pub clock_speed_minutes: u32,

    /// Specialty groups served by each department, in creation order.
    pub departments: Vec<Vec<Specialty>>,

    /// Share of `capacity` given to each department.
    pub distribution: Vec<f64>,

    /// Per-department "specialized" flag (length-of-stay efficiency bonus).
    #[serde(alias = "is_specialized")]
    pub specialized: Vec<bool>,

    /// 1 = next day, 2 = random day within two weeks, 3 = lowest-load day this week.
    #[serde(alias = "planning_method")]
    pub reschedule_policy: u8,

    /// Total ICU beds partitioned across departments.
    pub capacity: u32,

    /// Extra length-of-stay reduction per step in specialized departments.
    #[serde(alias = "efficiency")]
    pub efficiency_percent: u32,

    /// Share of every department's beds reserved as pandemic beds.
    #[serde(alias = "pandemic_allocation_percentage")]
    pub pandemic_allocation_percent: u32,

    /// Add the historical surge series to unplanned arrivals.
    #[serde(alias = "use_ic_spike")]
    pub use_surge: bool,

    /// Cost of one bed for one day.
    pub bed_day_cost: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed:                        None,
            yearly_volume:               4_500,
            clock_speed_minutes:         10,
            departments:                 vec![Specialty::ALL.to_vec()],
            distribution:                vec![1.0],
            specialized:                 vec![false],
            reschedule_policy:           1,
            capacity:                    32,
            efficiency_percent:          0,
            pandemic_allocation_percent: 0,
            use_surge:                   false,
            bed_day_cost:                2_500.0,
        }
    }
}

impl ModelConfig {
    /// Efficiency bonus as a fraction in `[0, 1]`.
    #[inline]
    pub fn efficiency(&self) -> f64 {
        self.efficiency_percent as f64 / 100.0
    }

    /// Pandemic allocation as a fraction in `[0, 1]`.
    #[inline]
    pub fn pandemic_fraction(&self) -> f64 {
        self.pandemic_allocation_percent as f64 / 100.0
    }

    /// Seconds advanced per step.
    #[inline]
    pub fn quantum_secs(&self) -> u32 {
        self.clock_speed_minutes * 60
    }

    /// Steps needed to simulate `days` days.
    pub fn steps_for_days(&self, days: u64) -> u64 {
        (days * 1_440) / self.clock_speed_minutes.max(1) as u64
    }

    /// Reject inconsistent parameter sets.
    ///
    /// Mismatched department/distribution/specialized lengths are an error
    /// here rather than being replaced by defaults.
    pub fn validate(&self) -> IcuResult<()> {
        if self.departments.is_empty() {
            return Err(IcuError::Config("at least one department is required".into()));
        }
        let n = self.departments.len();
        if self.distribution.len() != n {
            return Err(IcuError::Config(format!(
                "distribution has {} entries for {n} departments",
                self.distribution.len()
            )));
        }
        if self.specialized.len() != n {
            return Err(IcuError::Config(format!(
                "specialized has {} entries for {n} departments",
                self.specialized.len()
            )));
        }

        if let Some(bad) = self.distribution.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(IcuError::Config(format!("invalid distribution share {bad}")));
        }
        let total: f64 = self.distribution.iter().sum();
        if total > 1.0 + 1e-9 {
            return Err(IcuError::Config(format!(
                "distribution shares sum to {total}, more than the total capacity"
            )));
        }

        if !(1..=MAX_CLOCK_SPEED_MINUTES).contains(&self.clock_speed_minutes) {
            return Err(IcuError::Config(format!(
                "clock speed {} outside 1..={MAX_CLOCK_SPEED_MINUTES} minutes",
                self.clock_speed_minutes
            )));
        }
        if !(1..=3).contains(&self.reschedule_policy) {
            return Err(IcuError::Config(format!(
                "reschedule policy {} is not one of 1, 2, 3",
                self.reschedule_policy
            )));
        }
        if self.efficiency_percent > 100 {
            return Err(IcuError::Config(format!(
                "efficiency {}% exceeds 100%",
                self.efficiency_percent
            )));
        }
        if self.pandemic_allocation_percent > 100 {
            return Err(IcuError::Config(format!(
                "pandemic allocation {}% exceeds 100%",
                self.pandemic_allocation_percent
            )));
        }
        if !self.bed_day_cost.is_finite() || self.bed_day_cost < 0.0 {
            return Err(IcuError::Config(format!("invalid bed-day cost {}", self.bed_day_cost)));
        }

        let mut claimed: HashMap<Specialty, usize> = HashMap::new();
        for (dept, specialties) in self.departments.iter().enumerate() {
            for &spec in specialties {
                if let Some(previous) = claimed.insert(spec, dept) {
                    if previous != dept {
                        return Err(IcuError::Config(format!(
                            "specialty {spec} is served by departments {previous} and {dept}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
