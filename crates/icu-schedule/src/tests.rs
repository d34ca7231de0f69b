//! Unit tests for icu-schedule.

use icu_core::{Gender, PatientProfile, SimRng, Specialty};

use crate::{ArrivalStats, FixedCalibration};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn profile() -> PatientProfile {
    PatientProfile { specialty: Specialty::Card, age: 60, gender: Gender::Male, los_secs: 86_400 }
}

fn is_sorted(q: &std::collections::VecDeque<u32>) -> bool {
    q.iter().zip(q.iter().skip(1)).all(|(a, b)| a <= b)
}

// ── ArrivalSchedule ───────────────────────────────────────────────────────────

#[cfg(test)]
mod table {
    use super::*;
    use crate::ArrivalSchedule;

    #[test]
    fn empty_has_365_days() {
        let table = ArrivalSchedule::empty();
        assert_eq!(table.day_count(), 365);
        assert_eq!(table.total(), 0);
        assert!(table.iter().all(|(_, q)| q.is_empty()));
        assert_eq!(table.iter().last().map(|(d, _)| d), Some(365));
    }

    #[test]
    fn insert_keeps_day_sorted() {
        let mut table = ArrivalSchedule::empty();
        for ts in [500, 100, 900, 100, 300] {
            table.insert(10, ts);
        }
        let day: Vec<u32> = table.day(10).iter().copied().collect();
        assert_eq!(day, vec![100, 100, 300, 500, 900]);
        assert_eq!(table.len_of(10), 5);
        assert_eq!(table.len_of(11), 0);
    }

    #[test]
    fn pop_due_only_pops_past_entries() {
        let mut table = ArrivalSchedule::empty();
        table.set_day(1, vec![3_600, 0, 7_200]);
        assert_eq!(table.pop_due(1, 0), Some(0));
        assert_eq!(table.pop_due(1, 0), None);
        assert_eq!(table.pop_due(1, 3_599), None);
        assert_eq!(table.pop_due(1, 3_600), Some(3_600));
        assert_eq!(table.peek(1), Some(7_200));
    }

    #[test]
    fn day_arguments_wrap() {
        let mut table = ArrivalSchedule::empty();
        table.insert(366, 42);
        assert_eq!(table.len_of(1), 1);
    }

    #[test]
    fn generate_from_fixed_fractions() {
        let cal = FixedCalibration::new(profile())
            .with_fractions(0.01, 0.0)
            .with_stats(ArrivalStats::new(36_000.0, 3_600.0), ArrivalStats::new(0.0, 0.0));
        let mut rng = SimRng::new(7);
        let table = ArrivalSchedule::generate(&cal, 1_000, &mut rng);

        assert_eq!(table.day_count(), 365);
        assert_eq!(table.total(), 3_650);
        for (_, q) in table.iter() {
            assert_eq!(q.len(), 10);
            assert!(is_sorted(q));
            assert!(q.iter().all(|&t| t < 86_400));
        }
    }

    #[test]
    fn generate_with_zero_fraction_is_empty() {
        let cal = FixedCalibration::new(profile());
        let table = ArrivalSchedule::generate(&cal, 4_500, &mut SimRng::new(1));
        assert_eq!(table.total(), 0);
    }
}

// ── ReschedulePolicy ──────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use super::*;
    use crate::{ArrivalSchedule, ReschedulePolicy};

    #[test]
    fn next_day_wraps_at_year_end() {
        let table = ArrivalSchedule::empty();
        let mut rng = SimRng::new(0);
        assert_eq!(ReschedulePolicy::NextDay.target_day(10, &table, &mut rng), 11);
        assert_eq!(ReschedulePolicy::NextDay.target_day(365, &table, &mut rng), 1);
    }

    #[test]
    fn random_window_is_one_to_fourteen_days_ahead() {
        let table = ArrivalSchedule::empty();
        let mut rng = SimRng::new(99);
        for _ in 0..500 {
            let d = ReschedulePolicy::RandomWithinTwoWeeks.target_day(100, &table, &mut rng);
            assert!((101..=114).contains(&d), "{d}");
        }
        for _ in 0..500 {
            let d = ReschedulePolicy::RandomWithinTwoWeeks.target_day(360, &table, &mut rng);
            assert!((361..=365).contains(&d) || (1..=9).contains(&d), "{d}");
        }
    }

    #[test]
    fn lowest_load_scans_seven_days_from_today() {
        let mut table = ArrivalSchedule::empty();
        for day in 20..27 {
            table.set_day(day, vec![0; 5]);
        }
        table.set_day(23, vec![0; 2]);
        table.set_day(25, vec![0; 2]);
        // Day 27 is empty but outside the window.
        let d = ReschedulePolicy::LowestLoadThisWeek.target_day(20, &table, &mut SimRng::new(0));
        assert_eq!(d, 23);
    }

    #[test]
    fn lowest_load_may_pick_today() {
        let mut table = ArrivalSchedule::empty();
        for day in 1..=7 {
            table.set_day(day, vec![0; 3]);
        }
        table.set_day(1, vec![]);
        let d = ReschedulePolicy::LowestLoadThisWeek.target_day(1, &table, &mut SimRng::new(0));
        assert_eq!(d, 1);
    }

    #[test]
    fn lowest_load_wraps_past_year_end() {
        let mut table = ArrivalSchedule::empty();
        for day in [362, 363, 364, 365, 1, 2, 3] {
            table.set_day(day, vec![0; 4]);
        }
        table.set_day(2, vec![0]);
        let d = ReschedulePolicy::LowestLoadThisWeek.target_day(362, &table, &mut SimRng::new(0));
        assert_eq!(d, 2);
    }

    #[test]
    fn reschedule_inserts_exactly_one_entry() {
        let mut table = ArrivalSchedule::empty();
        table.set_day(6, vec![100, 900]);
        let day = ReschedulePolicy::NextDay.reschedule(5, 500, &mut table, &mut SimRng::new(0));
        assert_eq!(day, 6);
        assert_eq!(table.total(), 3);
        let entries: Vec<u32> = table.day(6).iter().copied().collect();
        assert_eq!(entries, vec![100, 500, 900]);
    }

    #[test]
    fn numbers_round_trip() {
        for n in 1..=3u8 {
            assert_eq!(ReschedulePolicy::try_from(n).unwrap().number(), n);
        }
        assert!(ReschedulePolicy::try_from(0).is_err());
        assert!(ReschedulePolicy::try_from(4).is_err());
    }
}

#[cfg(test)]
mod policy_properties {
    use proptest::prelude::*;

    use super::*;
    use crate::{ArrivalSchedule, ReschedulePolicy};

    proptest! {
        #[test]
        fn rescheduling_keeps_days_sorted(
            moves in prop::collection::vec((1u16..=365, 0u32..86_400, 1u8..=3), 1..200),
            seed in any::<u64>(),
        ) {
            let mut table = ArrivalSchedule::empty();
            let mut rng = SimRng::new(seed);
            for (i, (today, ts, policy)) in moves.iter().enumerate() {
                let policy = ReschedulePolicy::try_from(*policy).unwrap();
                let day = policy.reschedule(*today, *ts, &mut table, &mut rng);
                prop_assert!((1..=365).contains(&day));
                prop_assert!(table.day(day).contains(ts));
                prop_assert_eq!(table.total(), i + 1);
            }
            for (_, q) in table.iter() {
                prop_assert!(is_sorted(q));
            }
        }
    }
}

// ── Sampling ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampling {
    use super::*;
    use crate::{daily_arrival_count, sample_arrival_times, HistoricalCalibration};

    #[test]
    fn count_is_floored() {
        let cal = FixedCalibration::new(profile()).with_fractions(0.0, 0.0025);
        assert_eq!(daily_arrival_count(&cal, 1, false, 4_500), 11);
        assert_eq!(daily_arrival_count(&cal, 1, true, 4_500), 0);
    }

    #[test]
    fn unavailable_data_means_zero_arrivals() {
        let empty = HistoricalCalibration::from_records(&[]);
        assert_eq!(daily_arrival_count(&empty, 1, false, 4_500), 0);
        assert!(sample_arrival_times(&empty, 5, false, &mut SimRng::new(0)).is_empty());
    }

    #[test]
    fn samples_are_clamped_into_the_day() {
        let early = FixedCalibration::new(profile())
            .with_stats(ArrivalStats::new(-5_000.0, 0.0), ArrivalStats::new(200_000.0, 0.0));
        let mut rng = SimRng::new(3);
        assert_eq!(sample_arrival_times(&early, 3, true, &mut rng), vec![0, 0, 0]);
        assert_eq!(sample_arrival_times(&early, 2, false, &mut rng), vec![86_399, 86_399]);
    }

    #[test]
    fn samples_are_sorted_and_seeded() {
        let cal = FixedCalibration::new(profile())
            .with_stats(ArrivalStats::new(43_200.0, 10_000.0), ArrivalStats::new(43_200.0, 10_000.0));
        let a = sample_arrival_times(&cal, 50, true, &mut SimRng::new(11));
        let b = sample_arrival_times(&cal, 50, true, &mut SimRng::new(11));
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn invalid_std_drops_the_day() {
        let cal = FixedCalibration::new(profile())
            .with_stats(ArrivalStats::new(0.0, f64::NAN), ArrivalStats::new(0.0, f64::NAN));
        assert!(sample_arrival_times(&cal, 4, true, &mut SimRng::new(0)).is_empty());
    }
}

// ── Calibrations ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod calibration {
    use chrono::NaiveDate;

    use super::*;
    use crate::{AdmissionRecord, Calibration, HistoricalCalibration};

    fn record(y: i32, m: u32, d: u32, h: u32, planned: bool, spec: Specialty) -> AdmissionRecord {
        AdmissionRecord {
            admitted: NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap(),
            planned,
            los_days: 1.5,
            specialty: spec,
            age: 50,
            gender: Gender::Female,
        }
    }

    fn history() -> Vec<AdmissionRecord> {
        vec![
            record(2019, 1, 1, 8, true, Specialty::Card),
            record(2019, 1, 1, 8, true, Specialty::Card),
            record(2019, 1, 1, 3, false, Specialty::Neu),
            record(2019, 1, 2, 10, true, Specialty::Card),
            record(2020, 1, 1, 12, true, Specialty::Card),
            record(2020, 1, 3, 20, false, Specialty::Neu),
        ]
    }

    #[test]
    fn fixed_surge_day_one_reads_first_entry() {
        let cal = FixedCalibration::new(profile()).with_surge(vec![5, 6, 7]);
        assert_eq!(cal.historical_surge(1).unwrap(), 5);
        assert_eq!(cal.historical_surge(3).unwrap(), 7);
        assert_eq!(cal.historical_surge(4).unwrap(), 5, "wraps after the series");
        assert_eq!(cal.historical_surge(0).unwrap(), 7);
        assert!(FixedCalibration::new(profile()).historical_surge(1).is_err());
    }

    #[test]
    fn fixed_profiles_come_from_the_pool() {
        let cal = FixedCalibration::new(profile());
        let drawn = cal.sample_profiles(3, &mut SimRng::new(0)).unwrap();
        assert_eq!(drawn, vec![profile(); 3]);
        let empty = FixedCalibration::new(profile()).with_profiles(Vec::new());
        assert!(empty.sample_profiles(1, &mut SimRng::new(0)).is_err());
    }

    #[test]
    fn daily_fraction_is_mean_over_years() {
        let cal = HistoricalCalibration::from_records(&history());
        let eps = 1e-12;
        assert!((cal.daily_admission_fraction(1, true).unwrap() - 0.5).abs() < eps);
        assert!((cal.daily_admission_fraction(2, true).unwrap() - 0.125).abs() < eps);
        assert_eq!(cal.daily_admission_fraction(3, true).unwrap(), 0.0);
        assert!((cal.daily_admission_fraction(1, false).unwrap() - 0.125).abs() < eps);
        assert!((cal.daily_admission_fraction(3, false).unwrap() - 0.25).abs() < eps);
    }

    #[test]
    fn hour_stats_use_population_std() {
        let cal = HistoricalCalibration::from_records(&history());
        let stats = cal.arrival_hour_stats(true).unwrap();
        assert!((stats.mean_secs - 34_200.0).abs() < 1e-9);
        assert!((stats.std_secs - 2.75f64.sqrt() * 3_600.0).abs() < 1e-6);
    }

    #[test]
    fn profiles_follow_history() {
        let cal = HistoricalCalibration::from_records(&history());
        assert_eq!(cal.specialties(), &[Specialty::Card, Specialty::Neu]);
        let drawn = cal.sample_profiles(200, &mut SimRng::new(5)).unwrap();
        assert_eq!(drawn.len(), 200);
        for p in &drawn {
            assert!(matches!(p.specialty, Specialty::Card | Specialty::Neu));
            assert_eq!(p.age, 50);
            assert_eq!(p.gender, Gender::Female);
            assert_eq!(p.los_secs, 129_600);
        }
        let cards = drawn.iter().filter(|p| p.specialty == Specialty::Card).count();
        assert!(cards > 100, "CARD is 4 of 6 records, drew {cards}");
    }

    #[test]
    fn non_positive_stays_are_ignored() {
        let mut rows = history();
        rows.push(AdmissionRecord { los_days: 0.0, ..record(2019, 5, 5, 1, true, Specialty::Chir) });
        let cal = HistoricalCalibration::from_records(&rows);
        assert!(!cal.specialties().contains(&Specialty::Chir));
    }

    #[test]
    fn surge_is_scaled_to_local_beds() {
        let cal = HistoricalCalibration::from_records(&history())
            .with_surge_admissions(&[1_350, 100, 0]);
        assert_eq!(cal.surge_len(), 3);
        assert_eq!(cal.historical_surge(1).unwrap(), 37);
        assert_eq!(cal.historical_surge(2).unwrap(), 2);
        assert_eq!(cal.historical_surge(3).unwrap(), 0);
        assert_eq!(cal.historical_surge(4).unwrap(), 37);
    }

    #[test]
    fn empty_history_is_unavailable() {
        let cal = HistoricalCalibration::from_records(&[]);
        assert!(cal.daily_admission_fraction(1, true).is_err());
        assert!(cal.arrival_hour_stats(false).is_err());
        assert!(cal.historical_surge(1).is_err());
        assert!(cal.sample_profiles(1, &mut SimRng::new(0)).is_err());
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use chrono::{Datelike, Timelike};

    use super::*;
    use crate::{Calibration, HistoricalCalibration, load_history_reader, load_surge_reader};

    #[test]
    fn history_rows_are_parsed_and_filtered() {
        let csv = "\
adm_icu,plan_adm,los_icu,ref_spec,age,gender,extra
2019-01-03 08:12:00,1,2.5,3,67,M,x
2019-01-03 22:40,0,0.8,CARD,54,F,x
2019-02-01,True,1,29.0,40,F,x
2019-02-02 10:00:00,0,,3,40,F,x
2019-02-03 10:00:00,0,1.0,1,40,F,x
2019-02-04 10:00:00,0,1.0,12,,M,x
";
        let rows = load_history_reader(Cursor::new(csv)).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].specialty, Specialty::Card);
        assert!(rows[0].planned);
        assert_eq!(rows[0].admitted.hour(), 8);
        assert_eq!(rows[0].gender, Gender::Male);

        assert!(!rows[1].planned);
        assert_eq!(rows[1].admitted.minute(), 40);

        assert_eq!(rows[2].specialty, Specialty::Capu);
        assert_eq!(rows[2].admitted.hour(), 0);
        assert_eq!(rows[2].admitted.ordinal(), 32);
    }

    #[test]
    fn bad_flag_is_an_error() {
        let csv = "adm_icu,plan_adm,los_icu,ref_spec,age,gender\n2019-01-01,maybe,1,3,1,M\n";
        assert!(load_history_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn surge_drops_baseline_and_sums_dates() {
        let csv = "\
Version;Date_of_statistics;IC_admission
1;2020-02-27;9
1;2020-02-28;3
1;2020-02-28;4
1;2020-02-29;
1;2020-03-01;10
";
        let series = load_surge_reader(Cursor::new(csv)).unwrap();
        assert_eq!(series, vec![7, 0, 10]);
    }

    #[test]
    fn loaded_surge_starts_on_day_one() {
        let csv = "\
Date_of_statistics;IC_admission
2020-02-27;0
2020-02-28;1350
2020-02-29;2700
2020-03-01;4050
";
        let series = load_surge_reader(Cursor::new(csv)).unwrap();
        let cal = HistoricalCalibration::from_records(&[]).with_surge_admissions(&series);
        assert_eq!(cal.surge_len(), 3);
        assert_eq!(cal.historical_surge(1).unwrap(), 37);
        assert_eq!(cal.historical_surge(2).unwrap(), 74);
        assert_eq!(cal.historical_surge(3).unwrap(), 111);
    }

    #[test]
    fn surge_keeps_two_years() {
        let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut csv = String::from("Date_of_statistics;IC_admission\n");
        for i in 0..800u64 {
            let d = start + chrono::Days::new(i);
            csv.push_str(&format!("{};1\n", d.format("%Y-%m-%d")));
        }
        let series = load_surge_reader(Cursor::new(csv)).unwrap();
        assert_eq!(series.len(), 730);
    }
}
