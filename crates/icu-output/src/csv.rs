//! CSV output backend.
//!
//! Creates six `;`-delimited files in the output directory:
//!
//! | File              | Stream       | Columns                                                     |
//! |-------------------|--------------|-------------------------------------------------------------|
//! | `opnames.csv`     | admissions   | ref_spec, adm_icu, dis_icu, los_icu, age, gender, plan_adm   |
//! | `geweigerd.csv`   | refused      | ref_spec, date                                              |
//! | `replanning.csv`  | replanning   | date, planning_method, target_day, ref_spec                 |
//! | `amount.csv`      | amount       | date, admissions, unplanned, planned                        |
//! | `costs.csv`       | costs        | date, amount_empty_beds, amount_occupied_beds, cumulative_* |
//! | `capacity.csv`    | capacity     | date, one column per department label                       |

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use icu_sim::{
    CapacitySnapshot, CostRecord, DailyVolumeRecord, DischargeRecord, RefusalRecord,
    RescheduleRecord,
};

use crate::writer::OutputWriter;
use crate::OutputResult;

pub const ADMISSIONS_FILE: &str = "opnames.csv";
pub const REFUSED_FILE:    &str = "geweigerd.csv";
pub const REPLANNING_FILE: &str = "replanning.csv";
pub const AMOUNT_FILE:     &str = "amount.csv";
pub const COSTS_FILE:      &str = "costs.csv";
pub const CAPACITY_FILE:   &str = "capacity.csv";

const DELIMITER: u8 = b';';

/// Writes simulation output to six CSV files.
pub struct CsvWriter {
    admissions: Writer<File>,
    refused:    Writer<File>,
    replanning: Writer<File>,
    amount:     Writer<File>,
    costs:      Writer<File>,
    capacity:   Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create (or truncate) the CSV files in `dir` and write their headers.
    ///
    /// `department_labels` become the per-department columns of
    /// `capacity.csv`; pass [`EventLog::department_labels`][icu_sim::EventLog::department_labels].
    pub fn new(dir: &Path, department_labels: &[String]) -> OutputResult<Self> {
        let mut admissions = open(dir, ADMISSIONS_FILE)?;
        admissions.write_record(["ref_spec", "adm_icu", "dis_icu", "los_icu", "age", "gender", "plan_adm"])?;

        let mut refused = open(dir, REFUSED_FILE)?;
        refused.write_record(["ref_spec", "date"])?;

        let mut replanning = open(dir, REPLANNING_FILE)?;
        replanning.write_record(["date", "planning_method", "target_day", "ref_spec"])?;

        let mut amount = open(dir, AMOUNT_FILE)?;
        amount.write_record(["date", "admissions", "unplanned", "planned"])?;

        let mut costs = open(dir, COSTS_FILE)?;
        costs.write_record([
            "date",
            "amount_empty_beds",
            "amount_occupied_beds",
            "cumulative_hourly_costs",
            "cumulative_daily_costs",
            "cumulative_hourly_occupied_costs",
            "cumulative_daily_occupied_costs",
        ])?;

        let mut capacity = open(dir, CAPACITY_FILE)?;
        capacity.write_record(
            std::iter::once("date").chain(department_labels.iter().map(String::as_str)),
        )?;

        Ok(Self { admissions, refused, replanning, amount, costs, capacity, finished: false })
    }
}

fn open(dir: &Path, name: &str) -> OutputResult<Writer<File>> {
    Ok(WriterBuilder::new().delimiter(DELIMITER).from_path(dir.join(name))?)
}

impl OutputWriter for CsvWriter {
    fn write_admissions(&mut self, rows: &[DischargeRecord]) -> OutputResult<()> {
        for row in rows {
            self.admissions.write_record(&[
                row.specialty.to_string(),
                row.admitted_at.to_string(),
                row.discharged_at.to_string(),
                row.los_days.to_string(),
                row.age.to_string(),
                row.gender.to_string(),
                u8::from(row.planned).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_refused(&mut self, rows: &[RefusalRecord]) -> OutputResult<()> {
        for row in rows {
            self.refused.write_record(&[row.specialty.to_string(), row.at.to_string()])?;
        }
        Ok(())
    }

    fn write_replanning(&mut self, rows: &[RescheduleRecord]) -> OutputResult<()> {
        for row in rows {
            self.replanning.write_record(&[
                row.at.to_string(),
                row.policy.number().to_string(),
                row.target_day.to_string(),
                row.specialty.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_amount(&mut self, rows: &[DailyVolumeRecord]) -> OutputResult<()> {
        for row in rows {
            self.amount.write_record(&[
                row.at.to_string(),
                row.total().to_string(),
                row.unplanned.to_string(),
                row.planned.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_costs(&mut self, rows: &[CostRecord]) -> OutputResult<()> {
        for row in rows {
            self.costs.write_record(&[
                row.at.to_string(),
                row.empty_beds.to_string(),
                row.occupied_beds.to_string(),
                row.hourly_free_cost.to_string(),
                row.daily_free_cost.to_string(),
                row.hourly_occupied_cost.to_string(),
                row.daily_occupied_cost.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_capacity(&mut self, rows: &[CapacitySnapshot]) -> OutputResult<()> {
        for row in rows {
            let record: Vec<String> = std::iter::once(row.at.to_string())
                .chain(row.free.iter().map(u32::to_string))
                .collect();
            self.capacity.write_record(&record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.admissions.flush()?;
        self.refused.flush()?;
        self.replanning.flush()?;
        self.amount.flush()?;
        self.costs.flush()?;
        self.capacity.flush()?;
        Ok(())
    }
}
