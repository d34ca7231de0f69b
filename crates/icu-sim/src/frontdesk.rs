//! `Frontdesk`: admission control.
//!
//! Each step the front desk takes the waiting patient with the lowest id and
//! decides exactly one of three outcomes:
//!
//! ```text
//! department resolved and free_capacity > 0  →  allocate a bed, assign
//! otherwise, planned patient                 →  remove, reschedule arrival
//! otherwise, unplanned patient               →  remove, record refusal
//! ```
//!
//! Other waiting patients stay put until a later step.

use icu_agent::{BedSlot, Department, PatientStore};
use icu_core::{DepartmentId, IcuError, IcuResult, PatientId, SimRng, Timestamp};
use icu_schedule::{ArrivalSchedule, ReschedulePolicy};
use log::debug;

use crate::records::{RefusalRecord, RescheduleRecord};
use crate::{EventLog, SpecialtyIndex};

/// What the front desk did in one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrontdeskOutcome {
    Assigned { patient: PatientId, department: DepartmentId, bed: BedSlot },
    Rescheduled { patient: PatientId, target_day: u16 },
    Refused { patient: PatientId },
}

/// Mutable world state the front desk is allowed to touch during its step.
pub struct Desk<'a> {
    pub patients:    &'a mut PatientStore,
    pub departments: &'a mut [Department],
    pub schedule:    &'a mut ArrivalSchedule,
    pub events:      &'a mut EventLog,
}

pub struct Frontdesk {
    policy: ReschedulePolicy,
    rng:    SimRng,
}

impl Frontdesk {
    pub fn new(policy: ReschedulePolicy, rng: SimRng) -> Self {
        Self { policy, rng }
    }

    #[inline]
    pub fn policy(&self) -> ReschedulePolicy {
        self.policy
    }

    /// Process at most one waiting patient.
    ///
    /// `day` is the current day-of-year, the starting point for rescheduling.
    pub fn step(
        &mut self,
        now:    Timestamp,
        day:    u16,
        routes: &SpecialtyIndex,
        desk:   Desk<'_>,
    ) -> IcuResult<Option<FrontdeskOutcome>> {
        let Some(id) = desk.patients.first_waiting() else {
            return Ok(None);
        };
        let patient = desk.patients.get(id)?;
        let specialty = patient.specialty();
        let planned = patient.planned();
        let arrival_ts = patient.arrival_ts();

        if let Some(department) = routes.resolve(specialty) {
            let dept = desk
                .departments
                .get_mut(department.index())
                .ok_or(IcuError::DepartmentNotFound(department))?;
            if dept.free_capacity() > 0 {
                let bed = dept.allocate(id)?;
                desk.patients.get_mut(id)?.assign(department)?;
                debug!("{now}: {id} ({specialty}) assigned bed {bed} in {department}");
                return Ok(Some(FrontdeskOutcome::Assigned { patient: id, department, bed }));
            }
        }

        desk.patients.remove(id)?;
        if planned {
            let target_day = self.policy.reschedule(day, arrival_ts, desk.schedule, &mut self.rng);
            debug!("{now}: {id} ({specialty}) rescheduled to day {target_day} ({})", self.policy);
            desk.events.push_reschedule(RescheduleRecord {
                patient: id,
                specialty,
                at: now,
                policy: self.policy,
                target_day,
            });
            Ok(Some(FrontdeskOutcome::Rescheduled { patient: id, target_day }))
        } else {
            debug!("{now}: {id} ({specialty}) refused");
            desk.events.push_refusal(RefusalRecord { patient: id, specialty, at: now });
            Ok(Some(FrontdeskOutcome::Refused { patient: id }))
        }
    }
}
