//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the output directory with one table
//! per stream: `admissions`, `refused`, `replanning`, `amount`, `costs` and
//! `capacity`.  Capacity is stored long-form, one row per department per
//! snapshot, keyed by the department label.

use std::path::Path;

use icu_sim::{
    CapacitySnapshot, CostRecord, DailyVolumeRecord, DischargeRecord, RefusalRecord,
    RescheduleRecord,
};
use rusqlite::{Connection, params};

use crate::writer::OutputWriter;
use crate::OutputResult;

pub const DATABASE_FILE: &str = "output.db";

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:              Connection,
    department_labels: Vec<String>,
    finished:          bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path, department_labels: &[String]) -> OutputResult<Self> {
        let conn = Connection::open(dir.join(DATABASE_FILE))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS admissions (
                 patient    INTEGER NOT NULL,
                 department INTEGER NOT NULL,
                 ref_spec   TEXT    NOT NULL,
                 adm_icu    TEXT    NOT NULL,
                 dis_icu    TEXT    NOT NULL,
                 los_icu    REAL    NOT NULL,
                 age        INTEGER NOT NULL,
                 gender     TEXT    NOT NULL,
                 plan_adm   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS refused (
                 patient  INTEGER NOT NULL,
                 ref_spec TEXT    NOT NULL,
                 date     TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS replanning (
                 patient         INTEGER NOT NULL,
                 date            TEXT    NOT NULL,
                 planning_method INTEGER NOT NULL,
                 target_day      INTEGER NOT NULL,
                 ref_spec        TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS amount (
                 date      TEXT    NOT NULL,
                 day       INTEGER NOT NULL,
                 unplanned INTEGER NOT NULL,
                 planned   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS costs (
                 date                            TEXT    NOT NULL,
                 amount_empty_beds               INTEGER NOT NULL,
                 amount_occupied_beds            INTEGER NOT NULL,
                 cumulative_hourly_costs         REAL    NOT NULL,
                 cumulative_daily_costs          REAL    NOT NULL,
                 cumulative_hourly_occupied_costs REAL   NOT NULL,
                 cumulative_daily_occupied_costs REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS capacity (
                 date       TEXT    NOT NULL,
                 department TEXT    NOT NULL,
                 free_beds  INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, department_labels: department_labels.to_vec(), finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_admissions(&mut self, rows: &[DischargeRecord]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO admissions \
                 (patient, department, ref_spec, adm_icu, dis_icu, los_icu, age, gender, plan_adm) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.patient.0,
                    row.department.0,
                    row.specialty.code(),
                    row.admitted_at.to_string(),
                    row.discharged_at.to_string(),
                    row.los_days,
                    row.age,
                    row.gender.to_string(),
                    row.planned,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_refused(&mut self, rows: &[RefusalRecord]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO refused (patient, ref_spec, date) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(params![row.patient.0, row.specialty.code(), row.at.to_string()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_replanning(&mut self, rows: &[RescheduleRecord]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO replanning (patient, date, planning_method, target_day, ref_spec) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.patient.0,
                    row.at.to_string(),
                    row.policy.number(),
                    row.target_day,
                    row.specialty.code(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_amount(&mut self, rows: &[DailyVolumeRecord]) -> OutputResult<()> {
        for row in rows {
            self.conn.execute(
                "INSERT INTO amount (date, day, unplanned, planned) VALUES (?1, ?2, ?3, ?4)",
                params![row.at.to_string(), row.day, row.unplanned as i64, row.planned as i64],
            )?;
        }
        Ok(())
    }

    fn write_costs(&mut self, rows: &[CostRecord]) -> OutputResult<()> {
        for row in rows {
            self.conn.execute(
                "INSERT INTO costs \
                 (date, amount_empty_beds, amount_occupied_beds, cumulative_hourly_costs, \
                  cumulative_daily_costs, cumulative_hourly_occupied_costs, cumulative_daily_occupied_costs) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.at.to_string(),
                    row.empty_beds,
                    row.occupied_beds,
                    row.hourly_free_cost,
                    row.daily_free_cost,
                    row.hourly_occupied_cost,
                    row.daily_occupied_cost,
                ],
            )?;
        }
        Ok(())
    }

    fn write_capacity(&mut self, rows: &[CapacitySnapshot]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO capacity (date, department, free_beds) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                let date = row.at.to_string();
                for (label, free) in self.department_labels.iter().zip(&row.free) {
                    stmt.execute(params![date, label, free])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
