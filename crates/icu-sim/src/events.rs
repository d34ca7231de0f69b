//! `EventLog`: the append-only output streams of a run.
//!
//! | Stream            | Appended by        | When                           |
//! |-------------------|--------------------|--------------------------------|
//! | `admissions`      | orchestrator       | a patient is discharged        |
//! | `refused`         | front desk         | an unplanned patient is refused |
//! | `replanning`      | front desk         | a planned patient is moved     |
//! | `amount`          | arrival generator  | a new day starts               |
//! | `costs`           | orchestrator       | an hour boundary is crossed    |
//! | `capacity`        | orchestrator       | an hour boundary is crossed    |
//! | `free_capacity`   | orchestrator       | every step                     |
//!
//! Streams only grow; readers that want incremental output remember the
//! previous lengths.

use crate::records::{
    CapacitySnapshot, CostRecord, DailyVolumeRecord, DischargeRecord, RefusalRecord,
    RescheduleRecord,
};

#[derive(Clone, Debug, Default)]
pub struct EventLog {
    department_labels: Vec<String>,
    admissions:        Vec<DischargeRecord>,
    refused:           Vec<RefusalRecord>,
    replanning:        Vec<RescheduleRecord>,
    amount:            Vec<DailyVolumeRecord>,
    costs:             Vec<CostRecord>,
    capacity:          Vec<CapacitySnapshot>,
    free_capacity:     Vec<u32>,
}

impl EventLog {
    pub fn new(department_labels: Vec<String>) -> Self {
        Self { department_labels, ..Self::default() }
    }

    /// Column names for the per-department entries of [`CapacitySnapshot`].
    pub fn department_labels(&self) -> &[String] {
        &self.department_labels
    }

    pub fn admissions(&self) -> &[DischargeRecord] {
        &self.admissions
    }

    pub fn refused(&self) -> &[RefusalRecord] {
        &self.refused
    }

    pub fn replanning(&self) -> &[RescheduleRecord] {
        &self.replanning
    }

    pub fn amount(&self) -> &[DailyVolumeRecord] {
        &self.amount
    }

    pub fn costs(&self) -> &[CostRecord] {
        &self.costs
    }

    pub fn capacity(&self) -> &[CapacitySnapshot] {
        &self.capacity
    }

    /// Aggregate free beds after every step.
    pub fn free_capacity(&self) -> &[u32] {
        &self.free_capacity
    }

    // ── Appenders ─────────────────────────────────────────────────────────

    pub(crate) fn push_admission(&mut self, record: DischargeRecord) {
        self.admissions.push(record);
    }

    pub(crate) fn push_refusal(&mut self, record: RefusalRecord) {
        self.refused.push(record);
    }

    pub(crate) fn push_reschedule(&mut self, record: RescheduleRecord) {
        self.replanning.push(record);
    }

    pub(crate) fn push_amount(&mut self, record: DailyVolumeRecord) {
        self.amount.push(record);
    }

    pub(crate) fn push_cost(&mut self, record: CostRecord) {
        self.costs.push(record);
    }

    pub(crate) fn push_capacity(&mut self, snapshot: CapacitySnapshot) {
        self.capacity.push(snapshot);
    }

    pub(crate) fn push_free_capacity(&mut self, free: u32) {
        self.free_capacity.push(free);
    }
}
