//! CSV loaders for the historical calibration inputs.
//!
//! # Admission history
//!
//! One row per ICU admission, comma-separated, with a header.  Columns not
//! listed below are ignored.
//!
//! ```csv
//! adm_icu,plan_adm,los_icu,ref_spec,age,gender
//! 2019-01-03 08:12:00,1,2.5,3,67,M
//! 2019-01-03 22:40:00,0,0.8,CARD,54,F
//! ```
//!
//! | Column     | Meaning                                                  |
//! |------------|----------------------------------------------------------|
//! | `adm_icu`  | admission date-time (`YYYY-MM-DD[ HH:MM[:SS]]`)          |
//! | `plan_adm` | `1`/`true` for planned, `0`/`false` for unplanned        |
//! | `los_icu`  | length of stay in days; empty or ≤ 0 drops the row       |
//! | `ref_spec` | group code or numeric referring-specialty code           |
//! | `age`      | age in years                                             |
//! | `gender`   | `M` or `F`                                               |
//!
//! Rows whose specialty code belongs to no group, or with a missing age or
//! gender, are skipped.
//!
//! # Surge series
//!
//! Semicolon-separated national daily ICU admissions with at least the
//! columns `Date_of_statistics` and `IC_admission`.  Rows for the same date
//! are summed.  The first date is a baseline and is dropped; the following
//! two years (730 days) are kept, in date order.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{Days, NaiveDate, NaiveDateTime};
use log::debug;
use serde::Deserialize;

use icu_core::{Gender, Specialty};

use crate::historical::AdmissionRecord;
use crate::ScheduleError;

/// Days of the surge series kept after the baseline date.
pub const SURGE_DAYS: u64 = 730;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryRow {
    adm_icu:  String,
    plan_adm: String,
    los_icu:  Option<f64>,
    ref_spec: String,
    age:      Option<f64>,
    gender:   Option<String>,
}

#[derive(Deserialize)]
struct SurgeRow {
    #[serde(rename = "Date_of_statistics")]
    date:         String,
    #[serde(rename = "IC_admission")]
    ic_admission: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load admission records from a history CSV file.
pub fn load_history_csv(path: &Path) -> Result<Vec<AdmissionRecord>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_history_reader(file)
}

/// Like [`load_history_csv`] but accepts any `Read` source.
pub fn load_history_reader<R: Read>(reader: R) -> Result<Vec<AdmissionRecord>, ScheduleError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in csv_reader.deserialize::<HistoryRow>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        match parse_history_row(row)? {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    debug!("loaded {} admission records ({skipped} rows skipped)", records.len());
    Ok(records)
}

/// Load the national surge series (raw daily admissions) from a file.
pub fn load_surge_csv(path: &Path) -> Result<Vec<u32>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_surge_reader(file)
}

/// Like [`load_surge_csv`] but accepts any `Read` source.
pub fn load_surge_reader<R: Read>(reader: R) -> Result<Vec<u32>, ScheduleError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for result in csv_reader.deserialize::<SurgeRow>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let date = parse_date(&row.date)?;
        let count = row.ic_admission.filter(|n| n.is_finite() && *n > 0.0).unwrap_or(0.0) as u32;
        *by_date.entry(date).or_default() += count;
    }

    let Some(&first) = by_date.keys().next() else {
        return Ok(Vec::new());
    };
    let last = first
        .checked_add_days(Days::new(SURGE_DAYS))
        .ok_or_else(|| ScheduleError::Parse(format!("surge window from {first} overflows")))?;

    Ok(by_date
        .range(..=last)
        .filter(|(date, _)| **date > first)
        .map(|(_, &n)| n)
        .collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_history_row(row: HistoryRow) -> Result<Option<AdmissionRecord>, ScheduleError> {
    let Some(los_days) = row.los_icu.filter(|d| d.is_finite() && *d > 0.0) else {
        return Ok(None);
    };
    let specialty = match row.ref_spec.parse::<Specialty>() {
        Ok(s) => s,
        Err(e) => {
            debug!("skipping admission: {e}");
            return Ok(None);
        }
    };
    let Some(age) = row.age.filter(|a| a.is_finite() && *a >= 0.0) else {
        return Ok(None);
    };
    let gender = match row.gender.as_deref().map(str::parse::<Gender>) {
        Some(Ok(g)) => g,
        _ => return Ok(None),
    };

    Ok(Some(AdmissionRecord {
        admitted: parse_datetime(&row.adm_icu)?,
        planned: parse_flag(&row.plan_adm)?,
        los_days,
        specialty,
        age: age.min(u16::MAX as f64) as u16,
        gender,
    }))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, ScheduleError> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    parse_date(s)?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ScheduleError::Parse(format!("invalid date-time {s:?}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ScheduleError::Parse(format!("invalid date {s:?}: expected YYYY-MM-DD")))
}

fn parse_flag(s: &str) -> Result<bool, ScheduleError> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        other => Err(ScheduleError::Parse(format!("invalid plan_adm flag {other:?}"))),
    }
}
