//! `Department`: a specialty-serving bed pool.
//!
//! # Bed table
//!
//! A department with capacity `C` and pandemic fraction `f` holds
//! `P = floor(f × C)` pandemic beds and `C − P` normal beds.  Slots are
//! namespaced by kind, so `(Normal, 0)` and `(Pandemic, 0)` are distinct beds
//! and the table always has exactly `C` entries.
//!
//! # Allocation
//!
//! [`Department::allocate`] hands the list of currently empty slots to the
//! department's [`BedSelector`].  The default, [`pick_random_free_slot`],
//! ignores bed kind; a kind-aware policy can be installed with
//! [`Department::with_selector`].
//!
//! The free-capacity count the front desk reads is recomputed by
//! [`Department::step`], once per simulation step.

use std::collections::BTreeMap;
use std::fmt;

use icu_core::{DepartmentId, IcuError, IcuResult, PatientId, SimRng, Specialty};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BedKind {
    Normal,
    Pandemic,
}

/// A bed id, unique within its department.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BedSlot {
    pub kind:  BedKind,
    pub index: u32,
}

impl fmt::Display for BedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BedKind::Normal   => write!(f, "N{}", self.index),
            BedKind::Pandemic => write!(f, "P{}", self.index),
        }
    }
}

/// Picks one bed out of the currently empty slots (given in slot order).
pub type BedSelector = fn(&[BedSlot], &mut SimRng) -> Option<BedSlot>;

/// Uniform choice among the empty slots, regardless of kind.
pub fn pick_random_free_slot(free: &[BedSlot], rng: &mut SimRng) -> Option<BedSlot> {
    rng.choose(free).copied()
}

pub struct Department {
    id:            DepartmentId,
    specialties:   Vec<Specialty>,
    specialized:   bool,
    capacity:      u32,
    beds:          BTreeMap<BedSlot, Option<PatientId>>,
    free_capacity: u32,
    rng:           SimRng,
    selector:      BedSelector,
}

impl Department {
    pub fn new(
        id:                DepartmentId,
        specialties:       Vec<Specialty>,
        capacity:          u32,
        specialized:       bool,
        pandemic_fraction: f64,
        rng:               SimRng,
    ) -> Self {
        let pandemic = ((pandemic_fraction.clamp(0.0, 1.0) * capacity as f64).floor() as u32).min(capacity);
        let normal = capacity - pandemic;

        let mut beds = BTreeMap::new();
        for index in 0..normal {
            beds.insert(BedSlot { kind: BedKind::Normal, index }, None);
        }
        for index in 0..pandemic {
            beds.insert(BedSlot { kind: BedKind::Pandemic, index }, None);
        }

        Self {
            id,
            specialties,
            specialized,
            capacity,
            beds,
            free_capacity: capacity,
            rng,
            selector: pick_random_free_slot,
        }
    }

    /// Replace the bed-choice policy.
    pub fn with_selector(mut self, selector: BedSelector) -> Self {
        self.selector = selector;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> DepartmentId {
        self.id
    }

    pub fn specialties(&self) -> &[Specialty] {
        &self.specialties
    }

    pub fn serves(&self, specialty: Specialty) -> bool {
        self.specialties.contains(&specialty)
    }

    /// Specialty codes joined with `", "`; used as the department's column
    /// name in capacity reports.
    pub fn label(&self) -> String {
        self.specialties.iter().map(|s| s.code()).collect::<Vec<_>>().join(", ")
    }

    #[inline]
    pub fn specialized(&self) -> bool {
        self.specialized
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn bed_count(&self, kind: BedKind) -> u32 {
        self.beds.keys().filter(|s| s.kind == kind).count() as u32
    }

    /// Free beds as of the last [`step`](Self::step).
    #[inline]
    pub fn free_capacity(&self) -> u32 {
        self.free_capacity
    }

    /// Beds occupied right now.
    pub fn occupied(&self) -> u32 {
        self.beds.values().filter(|o| o.is_some()).count() as u32
    }

    pub fn occupant(&self, slot: BedSlot) -> Option<PatientId> {
        self.beds.get(&slot).copied().flatten()
    }

    /// The slot `patient` occupies, if any.
    pub fn bed_of(&self, patient: PatientId) -> Option<BedSlot> {
        self.beds
            .iter()
            .find(|(_, o)| **o == Some(patient))
            .map(|(slot, _)| *slot)
    }

    pub fn beds(&self) -> impl Iterator<Item = (BedSlot, Option<PatientId>)> + '_ {
        self.beds.iter().map(|(s, o)| (*s, *o))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Occupy an empty bed with `patient`.
    ///
    /// Fails if no bed is empty or if `patient` already holds a bed here.
    pub fn allocate(&mut self, patient: PatientId) -> IcuResult<BedSlot> {
        if let Some(slot) = self.bed_of(patient) {
            return Err(IcuError::InvariantViolation(format!(
                "{patient} already occupies bed {slot} in {}",
                self.id
            )));
        }
        let free: Vec<BedSlot> = self
            .beds
            .iter()
            .filter(|(_, o)| o.is_none())
            .map(|(s, _)| *s)
            .collect();
        let slot = (self.selector)(&free, &mut self.rng).ok_or_else(|| {
            IcuError::InvariantViolation(format!("no free bed in {} for {patient}", self.id))
        })?;

        let id = self.id;
        let occupant = self.beds.get_mut(&slot).ok_or_else(|| {
            IcuError::InvariantViolation(format!("selector returned unknown bed {slot} in {id}"))
        })?;
        if let Some(other) = *occupant {
            return Err(IcuError::InvariantViolation(format!(
                "bed {slot} in {id} already holds {other}"
            )));
        }
        *occupant = Some(patient);
        Ok(slot)
    }

    /// Empty every bed held by `patient`.  Returns the number of beds freed
    /// (0 or 1 while the allocation invariant holds).
    pub fn free(&mut self, patient: PatientId) -> usize {
        let mut freed = 0;
        for occupant in self.beds.values_mut() {
            if *occupant == Some(patient) {
                *occupant = None;
                freed += 1;
            }
        }
        freed
    }

    /// Recompute the free-capacity count.
    pub fn step(&mut self) {
        self.free_capacity = self.capacity - self.occupied();
    }
}

impl fmt::Debug for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Department")
            .field("id", &self.id)
            .field("specialties", &self.specialties)
            .field("specialized", &self.specialized)
            .field("capacity", &self.capacity)
            .field("free_capacity", &self.free_capacity)
            .finish_non_exhaustive()
    }
}
