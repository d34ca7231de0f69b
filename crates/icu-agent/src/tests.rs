//! Unit tests for icu-agent.

use icu_core::{DepartmentId, Gender, PatientId, PatientProfile, SimRng, Specialty, Timestamp};

use crate::{BedKind, BedSlot, Department, PatientStore};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn profile(los_secs: u64) -> PatientProfile {
    PatientProfile { specialty: Specialty::Neu, age: 71, gender: Gender::Female, los_secs }
}

fn dept(capacity: u32, pandemic_fraction: f64) -> Department {
    Department::new(DepartmentId(0), vec![Specialty::Neu, Specialty::Card], capacity, false, pandemic_fraction, SimRng::new(42))
}

fn at(hour: u8, minute: u8) -> Timestamp {
    Timestamp { hour, minute, ..Timestamp::new_year(25) }
}

// ── Patient ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod patient {
    use super::*;
    use crate::{Patient, PatientEvent, PatientState};

    #[test]
    fn waits_until_assigned() {
        let mut p = Patient::new(PatientId(0), profile(600), true, 120);
        assert!(p.is_waiting());
        assert_eq!(p.step(at(0, 10), |_| 600).unwrap(), PatientEvent::Idle);
        assert_eq!(p.remaining_los(), 600);
        assert_eq!(p.department(), None);
        assert_eq!(p.arrival_ts(), 120);
    }

    #[test]
    fn lifecycle_one_quantum_stay() {
        let mut p = Patient::new(PatientId(3), profile(600), true, 0);
        p.assign(DepartmentId(1)).unwrap();
        assert_eq!(p.state(), PatientState::EnRoute { department: DepartmentId(1) });

        let event = p.step(at(0, 10), |_| panic!("no countdown while en route")).unwrap();
        assert_eq!(event, PatientEvent::Idle, "not admitted on the assignment step");
        assert_eq!(p.state(), PatientState::EnRoute { department: DepartmentId(1) });
        assert_eq!(p.department(), Some(DepartmentId(1)));

        let event = p.step(at(0, 20), |_| panic!("no countdown on the admission step")).unwrap();
        assert_eq!(event, PatientEvent::Admitted(DepartmentId(1)));
        assert!(p.in_icu());
        assert_eq!(p.remaining_los(), 600);

        match p.step(at(0, 30), |_| 600).unwrap() {
            PatientEvent::Discharged(record) => {
                assert_eq!(record.patient, PatientId(3));
                assert_eq!(record.department, DepartmentId(1));
                assert_eq!(record.admitted_at, at(0, 20));
                assert_eq!(record.discharged_at, at(0, 30));
                assert!((record.los_days - 600.0 / 86_400.0).abs() < 1e-12);
                assert!(record.planned);
            }
            other => panic!("expected discharge, got {other:?}"),
        }
        assert_eq!(p.state(), PatientState::Discharged);
        assert_eq!(p.step(at(0, 40), |_| 600).unwrap(), PatientEvent::Idle);
    }

    #[test]
    fn countdown_uses_department_decrement() {
        let mut p = Patient::new(PatientId(0), profile(2_000), false, 0);
        p.assign(DepartmentId(2)).unwrap();
        p.step(at(0, 0), |_| 0).unwrap();
        p.step(at(0, 10), |_| 0).unwrap();
        assert!(p.in_icu());
        let mut seen = None;
        p.step(at(0, 20), |d| {
            seen = Some(d);
            660
        })
        .unwrap();
        assert_eq!(seen, Some(DepartmentId(2)));
        assert_eq!(p.remaining_los(), 1_340);
    }

    #[test]
    fn double_assignment_is_rejected() {
        let mut p = Patient::new(PatientId(0), profile(600), false, 0);
        p.assign(DepartmentId(0)).unwrap();
        assert!(p.assign(DepartmentId(1)).is_err());
    }

    #[test]
    fn exhausted_stay_without_department_is_a_violation() {
        let mut p = Patient::new(PatientId(9), profile(0), false, 0);
        let err = p.step(at(0, 0), |_| 600).unwrap_err();
        assert!(err.to_string().contains("PatientId(9)"), "{err}");
    }
}

#[cfg(test)]
mod patient_properties {
    use proptest::prelude::*;

    use super::*;
    use crate::{Patient, PatientEvent};

    proptest! {
        #[test]
        fn discharge_is_emitted_exactly_once(
            los in 1u64..200_000,
            quantum in 1u64..86_400,
            bonus in 0u64..1_000,
        ) {
            let mut p = Patient::new(PatientId(0), profile(los), false, 0);
            p.assign(DepartmentId(0)).unwrap();
            p.step(at(0, 0), |_| quantum + bonus).unwrap();
            p.step(at(0, 0), |_| quantum + bonus).unwrap();
            prop_assert!(p.in_icu());

            let mut discharges = 0;
            let mut last = p.remaining_los();
            for _ in 0..(los / quantum + 5) {
                let before = p.remaining_los();
                match p.step(at(0, 0), |_| quantum + bonus).unwrap() {
                    PatientEvent::Discharged(_) => {
                        discharges += 1;
                        prop_assert!(before > 0);
                        prop_assert!(p.remaining_los() <= 0);
                    }
                    PatientEvent::Idle if p.in_icu() => {
                        prop_assert!(p.remaining_los() < last);
                    }
                    _ => {}
                }
                last = p.remaining_los();
            }
            prop_assert_eq!(discharges, 1);
        }
    }
}

// ── Department ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod department {
    use super::*;

    #[test]
    fn bed_table_is_namespaced() {
        let d = dept(10, 0.3);
        assert_eq!(d.bed_count(BedKind::Pandemic), 3);
        assert_eq!(d.bed_count(BedKind::Normal), 7);
        assert_eq!(d.beds().count(), 10);
        assert_eq!(d.free_capacity(), 10);
        assert!(d.beds().any(|(s, _)| s == BedSlot { kind: BedKind::Pandemic, index: 0 }));
        assert!(d.beds().any(|(s, _)| s == BedSlot { kind: BedKind::Normal, index: 0 }));
    }

    #[test]
    fn pandemic_count_is_floored() {
        let d = dept(7, 0.5);
        assert_eq!(d.bed_count(BedKind::Pandemic), 3);
        assert_eq!(d.bed_count(BedKind::Normal), 4);
        let all_pandemic = dept(4, 1.0);
        assert_eq!(all_pandemic.bed_count(BedKind::Normal), 0);
        assert_eq!(all_pandemic.beds().count(), 4);
    }

    #[test]
    fn allocate_free_and_step() {
        let mut d = dept(2, 0.0);
        let a = d.allocate(PatientId(1)).unwrap();
        let b = d.allocate(PatientId(2)).unwrap();
        assert_ne!(a, b);
        assert_eq!(d.free_capacity(), 2, "free capacity only changes on step");
        d.step();
        assert_eq!(d.free_capacity(), 0);
        assert!(d.allocate(PatientId(3)).is_err());

        assert_eq!(d.free(PatientId(1)), 1);
        assert_eq!(d.free(PatientId(1)), 0);
        d.step();
        assert_eq!(d.free_capacity(), 1);
        assert_eq!(d.occupant(a), None);
        assert_eq!(d.occupant(b), Some(PatientId(2)));
        assert_eq!(d.bed_of(PatientId(2)), Some(b));
    }

    #[test]
    fn same_patient_cannot_hold_two_beds() {
        let mut d = dept(3, 0.0);
        d.allocate(PatientId(5)).unwrap();
        assert!(d.allocate(PatientId(5)).is_err());
        assert_eq!(d.occupied(), 1);
    }

    #[test]
    fn zero_capacity_department() {
        let mut d = dept(0, 0.5);
        assert_eq!(d.beds().count(), 0);
        d.step();
        assert_eq!(d.free_capacity(), 0);
        assert!(d.allocate(PatientId(0)).is_err());
    }

    #[test]
    fn custom_selector_prefers_pandemic_beds() {
        fn pandemic_first(free: &[BedSlot], _rng: &mut SimRng) -> Option<BedSlot> {
            free.iter().rev().copied().find(|s| s.kind == BedKind::Pandemic).or_else(|| free.first().copied())
        }
        let mut d = dept(4, 0.5).with_selector(pandemic_first);
        assert_eq!(d.allocate(PatientId(0)).unwrap().kind, BedKind::Pandemic);
        assert_eq!(d.allocate(PatientId(1)).unwrap().kind, BedKind::Pandemic);
        assert_eq!(d.allocate(PatientId(2)).unwrap().kind, BedKind::Normal);
    }

    #[test]
    fn label_joins_codes() {
        assert_eq!(dept(1, 0.0).label(), "NEU, CARD");
        assert!(dept(1, 0.0).serves(Specialty::Card));
        assert!(!dept(1, 0.0).serves(Specialty::Int));
    }
}

#[cfg(test)]
mod department_properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn slot_counts_sum_to_capacity(capacity in 0u32..500, percent in 0u32..=100) {
            let d = dept(capacity, percent as f64 / 100.0);
            prop_assert_eq!(d.bed_count(BedKind::Normal) + d.bed_count(BedKind::Pandemic), capacity);
            prop_assert_eq!(d.beds().count() as u32, capacity);
        }

        #[test]
        fn no_bed_has_two_occupants(
            capacity in 1u32..40,
            ops in prop::collection::vec((any::<bool>(), 0u32..60), 1..300),
        ) {
            let mut d = dept(capacity, 0.25);
            for (admit, pid) in ops {
                let pid = PatientId(pid);
                if admit {
                    let _ = d.allocate(pid);
                } else {
                    d.free(pid);
                }
                let mut holders: Vec<PatientId> = d.beds().filter_map(|(_, o)| o).collect();
                let held = holders.len();
                holders.sort();
                holders.dedup();
                prop_assert_eq!(holders.len(), held, "a patient holds two beds");
                prop_assert!(held as u32 <= capacity);
            }
        }
    }
}

// ── PatientStore ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use super::*;

    #[test]
    fn ids_are_creation_ordered_and_not_reused() {
        let mut store = PatientStore::new();
        let a = store.spawn(profile(10), true, 0);
        let b = store.spawn(profile(10), false, 0);
        assert!(a < b);
        store.remove(a).unwrap();
        let c = store.spawn(profile(10), false, 0);
        assert_eq!(c, PatientId(2));
        assert_eq!(store.spawned(), 3);
        assert_eq!(store.len(), 2);
        assert!(store.remove(a).is_err());
    }

    #[test]
    fn first_waiting_skips_assigned() {
        let mut store = PatientStore::new();
        let a = store.spawn(profile(10), true, 0);
        let b = store.spawn(profile(10), true, 0);
        assert_eq!(store.first_waiting(), Some(a));
        store.get_mut(a).unwrap().assign(DepartmentId(0)).unwrap();
        assert_eq!(store.first_waiting(), Some(b));
        assert_eq!(store.waiting_count(), 1);
        assert_eq!(store.ids(), vec![a, b]);
    }
}
