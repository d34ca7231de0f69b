//! The patient state machine.
//!
//! A `Patient` never touches a department directly: the front desk calls
//! [`Patient::assign`] after it has reserved a bed, and the orchestrator frees
//! the bed when [`Patient::step`] reports a discharge.

use icu_core::{DepartmentId, Gender, IcuError, IcuResult, PatientId, PatientProfile, SECONDS_PER_DAY, Specialty, Timestamp};
use log::debug;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatientState {
    /// Waiting at the front desk.
    Unassigned,
    /// A bed is reserved; the patient arrives on the next step.
    EnRoute { department: DepartmentId },
    /// Occupying a bed; the length-of-stay countdown runs.
    InIcu { department: DepartmentId, admitted_at: Timestamp },
    /// Terminal.
    Discharged,
}

/// Emitted once per patient, on the step its remaining stay reaches zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DischargeRecord {
    pub patient:       PatientId,
    pub department:    DepartmentId,
    pub specialty:     Specialty,
    pub admitted_at:   Timestamp,
    pub discharged_at: Timestamp,
    /// The original (undecremented) length of stay, in days.
    pub los_days:      f64,
    pub age:           u16,
    pub gender:        Gender,
    pub planned:       bool,
}

/// What happened to a patient during one step.
#[derive(Clone, Debug, PartialEq)]
pub enum PatientEvent {
    Idle,
    Admitted(DepartmentId),
    Discharged(DischargeRecord),
}

#[derive(Clone, Debug)]
pub struct Patient {
    id:            PatientId,
    profile:       PatientProfile,
    planned:       bool,
    arrival_ts:    u32,
    remaining_los: i64,
    state:         PatientState,
    /// Set by `assign`; the step that performed the assignment does not admit.
    boarding:      bool,
}

impl Patient {
    /// A new patient waiting at the front desk.
    ///
    /// `arrival_ts` is the seconds-since-midnight the patient arrived at; a
    /// planned patient that is rescheduled re-enters the schedule at this
    /// time on another day.
    pub fn new(id: PatientId, profile: PatientProfile, planned: bool, arrival_ts: u32) -> Self {
        let remaining_los = profile.los_secs.min(i64::MAX as u64) as i64;
        Self { id, profile, planned, arrival_ts, remaining_los, state: PatientState::Unassigned, boarding: false }
    }

    #[inline] pub fn id(&self) -> PatientId { self.id }
    #[inline] pub fn profile(&self) -> &PatientProfile { &self.profile }
    #[inline] pub fn specialty(&self) -> Specialty { self.profile.specialty }
    #[inline] pub fn planned(&self) -> bool { self.planned }
    #[inline] pub fn arrival_ts(&self) -> u32 { self.arrival_ts }
    #[inline] pub fn state(&self) -> PatientState { self.state }

    /// Remaining stay in seconds; negative once overshot.
    #[inline]
    pub fn remaining_los(&self) -> i64 {
        self.remaining_los
    }

    /// The department the patient is assigned to, if any.
    pub fn department(&self) -> Option<DepartmentId> {
        match self.state {
            PatientState::EnRoute { department } | PatientState::InIcu { department, .. } => Some(department),
            PatientState::Unassigned | PatientState::Discharged => None,
        }
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.state == PatientState::Unassigned
    }

    #[inline]
    pub fn in_icu(&self) -> bool {
        matches!(self.state, PatientState::InIcu { .. })
    }

    /// `Unassigned → EnRoute`.  Any other starting state is an invariant
    /// violation (a bed would be reserved twice).
    pub fn assign(&mut self, department: DepartmentId) -> IcuResult<()> {
        match self.state {
            PatientState::Unassigned => {
                self.state = PatientState::EnRoute { department };
                self.boarding = true;
                Ok(())
            }
            other => Err(IcuError::InvariantViolation(format!(
                "{} assigned to {department} while {other:?}",
                self.id
            ))),
        }
    }

    /// Advance one step.
    ///
    /// A patient assigned during this step stays `EnRoute` and is admitted
    /// on the next one.
    ///
    /// `decrement` gives the seconds of stay consumed per step in a
    /// department: the clock quantum, plus the efficiency bonus when the
    /// department is specialized.  It is only consulted while `InIcu`.
    pub fn step<F>(&mut self, now: Timestamp, decrement: F) -> IcuResult<PatientEvent>
    where
        F: FnOnce(DepartmentId) -> u64,
    {
        match self.state {
            PatientState::Unassigned => {
                if self.remaining_los <= 0 {
                    return Err(IcuError::InvariantViolation(format!(
                        "{} reached the end of its stay without a department",
                        self.id
                    )));
                }
                Ok(PatientEvent::Idle)
            }
            PatientState::EnRoute { .. } if self.boarding => {
                self.boarding = false;
                Ok(PatientEvent::Idle)
            }
            PatientState::EnRoute { department } => {
                self.state = PatientState::InIcu { department, admitted_at: now };
                debug!("{} admitted to {department} at {now}", self.id);
                Ok(PatientEvent::Admitted(department))
            }
            PatientState::InIcu { department, admitted_at } => {
                let used = decrement(department).min(i64::MAX as u64) as i64;
                self.remaining_los = self.remaining_los.saturating_sub(used);
                if self.remaining_los > 0 {
                    return Ok(PatientEvent::Idle);
                }
                self.state = PatientState::Discharged;
                debug!("{} discharged from {department} at {now}", self.id);
                Ok(PatientEvent::Discharged(DischargeRecord {
                    patient:       self.id,
                    department,
                    specialty:     self.profile.specialty,
                    admitted_at,
                    discharged_at: now,
                    los_days:      self.profile.los_secs as f64 / SECONDS_PER_DAY as f64,
                    age:           self.profile.age,
                    gender:        self.profile.gender,
                    planned:       self.planned,
                }))
            }
            PatientState::Discharged => Ok(PatientEvent::Idle),
        }
    }
}
