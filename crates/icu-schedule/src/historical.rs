//! `HistoricalCalibration`: calibration derived from recorded admissions.
//!
//! All aggregates are computed once at construction; queries are lookups.
//!
//! # Daily fraction
//!
//! For every year in the history and every day-of-year, the number of
//! matching admissions (planned or unplanned) is divided by that year's
//! total admissions.  The fraction for a day is the mean of those ratios
//! over the years the filtered records span.  A day that never appears
//! yields `0.0`.
//!
//! # Surge
//!
//! National ICU admissions are scaled to this ICU by the share of national
//! beds it represents: 32 beds out of 1150 in the reference hospital,
//! applied to the 1350 national beds, is 37 beds, so each day's count is
//! multiplied by `37 / 1350` and truncated.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDateTime, Timelike};
use icu_core::{Gender, IcuError, IcuResult, PatientProfile, SECONDS_PER_DAY, SimRng, Specialty};
use rand::distributions::{Distribution, WeightedIndex};

use crate::{ArrivalStats, Calibration};

/// National ICU beds the surge series is reported against.
pub const NATIONAL_ICU_BEDS: u32 = 1_350;

/// Local bed equivalent of the national series (`floor(1350 × 32 / 1150)`).
pub const SURGE_LOCAL_BEDS: u32 = NATIONAL_ICU_BEDS * 32 / 1_150;

/// One admission in the history file.
#[derive(Clone, Debug, PartialEq)]
pub struct AdmissionRecord {
    pub admitted:  NaiveDateTime,
    pub planned:   bool,
    pub los_days:  f64,
    pub specialty: Specialty,
    pub age:       u16,
    pub gender:    Gender,
}

/// Per-specialty pools profiles are drawn from.
#[derive(Clone, Debug, Default)]
struct SpecialtyPool {
    ages:     Vec<u16>,
    males:    usize,
    females:  usize,
    los_secs: Vec<u64>,
}

#[derive(Clone, Debug)]
pub struct HistoricalCalibration {
    planned_fraction:   BTreeMap<u16, f64>,
    unplanned_fraction: BTreeMap<u16, f64>,
    planned_stats:      Option<ArrivalStats>,
    unplanned_stats:    Option<ArrivalStats>,
    specialties:        Vec<Specialty>,
    pools:              Vec<SpecialtyPool>,
    surge:              Vec<u32>,
}

impl HistoricalCalibration {
    /// Aggregate `records`.  Records without a positive length of stay are
    /// ignored.
    pub fn from_records(records: &[AdmissionRecord]) -> Self {
        let records: Vec<&AdmissionRecord> = records
            .iter()
            .filter(|r| r.los_days.is_finite() && r.los_days > 0.0)
            .collect();

        let mut pools: BTreeMap<Specialty, SpecialtyPool> = BTreeMap::new();
        for r in &records {
            let pool = pools.entry(r.specialty).or_default();
            pool.ages.push(r.age);
            match r.gender {
                Gender::Male   => pool.males += 1,
                Gender::Female => pool.females += 1,
            }
            let secs = (r.los_days * SECONDS_PER_DAY as f64) as u64;
            pool.los_secs.push(secs.max(1));
        }
        let (specialties, pools) = pools.into_iter().unzip();

        Self {
            planned_fraction:   daily_fractions(&records, true),
            unplanned_fraction: daily_fractions(&records, false),
            planned_stats:      hour_stats(&records, true),
            unplanned_stats:    hour_stats(&records, false),
            specialties,
            pools,
            surge:              Vec::new(),
        }
    }

    /// Attach a national surge series (raw daily ICU admissions); counts are
    /// scaled to local beds on the way in.
    pub fn with_surge_admissions(mut self, national: &[u32]) -> Self {
        self.surge = national
            .iter()
            .map(|&n| (n as u64 * SURGE_LOCAL_BEDS as u64 / NATIONAL_ICU_BEDS as u64) as u32)
            .collect();
        self
    }

    pub fn surge_len(&self) -> usize {
        self.surge.len()
    }

    /// Specialties present in the history.
    pub fn specialties(&self) -> &[Specialty] {
        &self.specialties
    }

    fn draw_one(&self, picker: &WeightedIndex<usize>, rng: &mut SimRng) -> IcuResult<PatientProfile> {
        let i = picker.sample(rng.inner());
        let pool = &self.pools[i];
        let age = *rng
            .choose(&pool.ages)
            .ok_or_else(|| IcuError::DataUnavailable(format!("no ages for {}", self.specialties[i])))?;
        let los_secs = *rng
            .choose(&pool.los_secs)
            .ok_or_else(|| IcuError::DataUnavailable(format!("no stays for {}", self.specialties[i])))?;
        let p_male = pool.males as f64 / (pool.males + pool.females).max(1) as f64;
        let gender = if rng.gen_bool(p_male) { Gender::Male } else { Gender::Female };
        Ok(PatientProfile { specialty: self.specialties[i], age, gender, los_secs })
    }
}

impl Calibration for HistoricalCalibration {
    fn daily_admission_fraction(&self, day: u16, planned: bool) -> IcuResult<f64> {
        let table = if planned { &self.planned_fraction } else { &self.unplanned_fraction };
        if table.is_empty() {
            return Err(IcuError::DataUnavailable(format!(
                "no {} admissions in history",
                if planned { "planned" } else { "unplanned" }
            )));
        }
        Ok(table.get(&day).copied().unwrap_or(0.0))
    }

    fn arrival_hour_stats(&self, planned: bool) -> IcuResult<ArrivalStats> {
        let stats = if planned { self.planned_stats } else { self.unplanned_stats };
        stats.ok_or_else(|| IcuError::DataUnavailable("no admissions to fit arrival times".into()))
    }

    fn historical_surge(&self, epoch_day: i64) -> IcuResult<u32> {
        if self.surge.is_empty() {
            return Err(IcuError::DataUnavailable("no surge series loaded".into()));
        }
        let idx = (epoch_day - 1).rem_euclid(self.surge.len() as i64) as usize;
        Ok(self.surge[idx])
    }

    fn sample_profiles(&self, n: usize, rng: &mut SimRng) -> IcuResult<Vec<PatientProfile>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let weights: Vec<usize> = self.pools.iter().map(|p| p.ages.len()).collect();
        let picker = WeightedIndex::new(&weights)
            .map_err(|e| IcuError::DataUnavailable(format!("cannot sample profiles: {e}")))?;
        (0..n).map(|_| self.draw_one(&picker, rng)).collect()
    }
}

// ── Aggregation helpers ───────────────────────────────────────────────────────

fn daily_fractions(records: &[&AdmissionRecord], planned: bool) -> BTreeMap<u16, f64> {
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for r in records {
        *per_year.entry(r.admitted.year()).or_default() += 1;
    }

    let mut years: BTreeSet<i32> = BTreeSet::new();
    let mut counts: BTreeMap<(i32, u16), usize> = BTreeMap::new();
    for r in records.iter().filter(|r| r.planned == planned) {
        let year = r.admitted.year();
        years.insert(year);
        *counts.entry((year, r.admitted.ordinal() as u16)).or_default() += 1;
    }
    if years.is_empty() {
        return BTreeMap::new();
    }

    let mut sums: BTreeMap<u16, f64> = BTreeMap::new();
    for ((year, day), count) in counts {
        let total = per_year.get(&year).copied().unwrap_or(0).max(1);
        *sums.entry(day).or_default() += count as f64 / total as f64;
    }
    let n_years = years.len() as f64;
    sums.into_iter().map(|(day, sum)| (day, sum / n_years)).collect()
}

fn hour_stats(records: &[&AdmissionRecord], planned: bool) -> Option<ArrivalStats> {
    let secs: Vec<f64> = records
        .iter()
        .filter(|r| r.planned == planned)
        .map(|r| r.admitted.hour() as f64 * 3_600.0)
        .collect();
    if secs.is_empty() {
        return None;
    }
    let n = secs.len() as f64;
    let mean = secs.iter().sum::<f64>() / n;
    let var = secs.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    Some(ArrivalStats::new(mean, var.sqrt()))
}
