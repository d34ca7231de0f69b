//! `PatientStore`: the active patient population.
//!
//! Patients are keyed by creation-ordered [`PatientId`] in a `BTreeMap`, so
//! iteration is always in creation order and "the lowest waiting id" is the
//! first waiting entry found.  Ids are never reused, including after a
//! patient is removed.

use std::collections::BTreeMap;

use icu_core::{IcuError, IcuResult, PatientId, PatientProfile};

use crate::Patient;

#[derive(Clone, Debug, Default)]
pub struct PatientStore {
    patients: BTreeMap<PatientId, Patient>,
    next_id:  u32,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiting patient and return its id.
    pub fn spawn(&mut self, profile: PatientProfile, planned: bool, arrival_ts: u32) -> PatientId {
        let id = PatientId(self.next_id);
        self.next_id += 1;
        self.patients.insert(id, Patient::new(id, profile, planned, arrival_ts));
        id
    }

    pub fn get(&self, id: PatientId) -> IcuResult<&Patient> {
        self.patients.get(&id).ok_or(IcuError::PatientNotFound(id))
    }

    pub fn get_mut(&mut self, id: PatientId) -> IcuResult<&mut Patient> {
        self.patients.get_mut(&id).ok_or(IcuError::PatientNotFound(id))
    }

    /// Remove a patient from the simulation.
    pub fn remove(&mut self, id: PatientId) -> IcuResult<Patient> {
        self.patients.remove(&id).ok_or(IcuError::PatientNotFound(id))
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.patients.contains_key(&id)
    }

    /// The waiting patient with the lowest id.
    pub fn first_waiting(&self) -> Option<PatientId> {
        self.patients.values().find(|p| p.is_waiting()).map(Patient::id)
    }

    pub fn waiting_count(&self) -> usize {
        self.patients.values().filter(|p| p.is_waiting()).count()
    }

    /// Active patient ids in ascending order.
    pub fn ids(&self) -> Vec<PatientId> {
        self.patients.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patient> + '_ {
        self.patients.values()
    }

    /// Patients created so far, including removed ones.
    pub fn spawned(&self) -> u32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
