//! End-to-end roster scenarios and randomized invariant checks.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use u_roster::fairness::shift_weight;
use u_roster::feasibility::{audit_schedule, is_blocked, rest_violation, Eligibility};
use u_roster::models::{Shift, ShiftId, SolveStatus, Staff, StaffId, TimeOffInterval, ViolationType};
use u_roster::scheduler::{
    OptimizingScheduler, RoundRobinScheduler, RosterRequest, ScheduleReport, SchedulingStrategy,
};
use u_roster::{EngineConfig, ScheduleError};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 3)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
}

fn shift_at(id: i64, offset_hours: i64, length_hours: i64) -> Shift {
    let start = base() + TimeDelta::hours(offset_hours);
    Shift::new(id, start, start + TimeDelta::hours(length_hours))
}

fn staff(n: i64) -> Vec<Staff> {
    (1..=n).map(|i| Staff::new(i, format!("Staff {i}"))).collect()
}

#[test]
fn test_two_staff_alternate_evenly() {
    let staff = staff(2);
    let shifts: Vec<Shift> = (0..4).map(|i| shift_at(i + 1, 48 * i, 24)).collect();
    let request = RosterRequest::new(staff.clone(), shifts.clone());
    let config = EngineConfig::default();

    let schedule = OptimizingScheduler::new().schedule(&request, &config).unwrap();
    assert_eq!(schedule.status, SolveStatus::Optimal);
    assert_eq!(schedule.objective, Some(0));
    assert_eq!(schedule.assignments_for_staff(StaffId(1)).len(), 2);
    assert_eq!(schedule.assignments_for_staff(StaffId(2)).len(), 2);
    assert!(audit_schedule(&schedule, &staff, &shifts, &[], config.min_rest_hours).is_empty());

    let report = ScheduleReport::calculate(&schedule, &request, &config.fairness_weights());
    assert!(report.total_abs_deviation.abs() < 1e-10);
    assert_eq!(report.consecutive_hits, 0);
}

#[test]
fn test_overlapping_leave_blocks_named_shift() {
    let staff = staff(1);
    let shifts = vec![shift_at(1, 0, 24), shift_at(2, 96, 24)];
    // Two overlapping leave records spanning shift 2.
    let time_off = vec![
        TimeOffInterval::new(1, base() + TimeDelta::hours(90), base() + TimeDelta::hours(105)),
        TimeOffInterval::new(1, base() + TimeDelta::hours(100), base() + TimeDelta::hours(130)),
    ];
    let request = RosterRequest::new(staff, shifts).with_time_off(time_off);
    let config = EngineConfig::default();

    let err = OptimizingScheduler::new().schedule(&request, &config).unwrap_err();
    assert_eq!(err.blocking_shift(), Some(ShiftId(2)));
    assert!(err.to_string().contains("shift 2"));

    let err = RoundRobinScheduler::new().schedule(&request, &config).unwrap_err();
    assert_eq!(err.blocking_shift(), Some(ShiftId(2)));
}

#[test]
fn test_round_robin_three_staff_five_shifts() {
    let staff = staff(3);
    let shifts: Vec<Shift> = (0..5).map(|i| shift_at(i + 1, 24 * i, 24)).collect();
    let request = RosterRequest::new(staff.clone(), shifts);

    let schedule = RoundRobinScheduler::new()
        .schedule(&request, &EngineConfig::default())
        .unwrap();
    let indices: Vec<usize> = schedule
        .assignments
        .iter()
        .map(|a| staff.iter().position(|s| s.id == a.staff_id).unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 0, 1]);
}

#[test]
fn test_weekend_holiday_weight_composes() {
    let config = EngineConfig::default()
        .with_weekend_weight(2.0)
        .with_holiday_weight(3.0);
    let shift = shift_at(1, 0, 24).with_weekend(true).with_holiday(true);
    assert!((shift_weight(&shift, &config.fairness_weights()) - 6.0).abs() < 1e-10);
}

#[test]
fn test_invalid_input_rejected_before_solving() {
    let request = RosterRequest::new(staff(2), vec![shift_at(1, 0, 24), shift_at(1, 48, 24)])
        .with_time_off(vec![TimeOffInterval::new(
            7,
            base(),
            base() + TimeDelta::hours(1),
        )]);
    let config = EngineConfig::default();
    for strategy in [
        &OptimizingScheduler::new() as &dyn SchedulingStrategy,
        &RoundRobinScheduler::new(),
    ] {
        let Err(ScheduleError::InvalidInput(errors)) = strategy.schedule(&request, &config) else {
            panic!("{} accepted invalid input", strategy.name());
        };
        assert_eq!(errors.len(), 2);
    }
}

#[test]
fn test_rest_window_unsatisfiable() {
    // Three overlapping shifts, two staff.
    let request = RosterRequest::new(
        staff(2),
        vec![shift_at(1, 0, 12), shift_at(2, 6, 12), shift_at(3, 10, 12)],
    );
    let err = OptimizingScheduler::new()
        .schedule(&request, &EngineConfig::default())
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Infeasible { .. }));
}

struct Instance {
    request: RosterRequest,
    config: EngineConfig,
}

fn random_instance(rng: &mut StdRng) -> Instance {
    let n_staff: i64 = rng.random_range(2..=4);
    let staff: Vec<Staff> = (1..=n_staff)
        .map(|i| {
            let fte = [0.5, 0.8, 1.0][rng.random_range(0..3)];
            Staff::new(i, format!("Staff {i}")).with_fte(fte)
        })
        .collect();

    let n_shifts: i64 = rng.random_range(3..=7);
    let shifts: Vec<Shift> = (1..=n_shifts)
        .map(|id| {
            shift_at(id, rng.random_range(0..14 * 24), rng.random_range(4..=24))
                .with_weekend(rng.random_bool(0.3))
                .with_holiday(rng.random_bool(0.1))
        })
        .collect();

    let time_off: Vec<TimeOffInterval> = (0..rng.random_range(0..=3))
        .map(|_| {
            let start = base() + TimeDelta::hours(rng.random_range(0..14 * 24));
            let staff_id = rng.random_range(1..=n_staff);
            let end = start + TimeDelta::hours(rng.random_range(1..=72));
            TimeOffInterval::new(staff_id, start, end)
        })
        .collect();

    let config = EngineConfig::default()
        .with_min_rest_hours([0.0, 12.0, 24.0][rng.random_range(0..3)])
        .with_time_limit_secs(2.0);

    Instance {
        request: RosterRequest::new(staff, shifts).with_time_off(time_off),
        config,
    }
}

/// Exhaustive search for any assignment satisfying time-off and rest.
fn any_valid_assignment(instance: &Instance) -> bool {
    let RosterRequest {
        staff,
        shifts,
        time_off,
    } = &instance.request;
    let min_rest = instance.config.min_rest_hours;
    let mut choice = vec![0_usize; shifts.len()];

    fn extend(
        row: usize,
        choice: &mut [usize],
        staff: &[Staff],
        shifts: &[Shift],
        time_off: &[TimeOffInterval],
        min_rest: f64,
    ) -> bool {
        if row == shifts.len() {
            return true;
        }
        for col in 0..staff.len() {
            if is_blocked(&staff[col], &shifts[row], time_off) {
                continue;
            }
            let clash = (0..row).any(|prev| {
                choice[prev] == col && rest_violation(&shifts[prev], &shifts[row], min_rest)
            });
            if clash {
                continue;
            }
            choice[row] = col;
            if extend(row + 1, choice, staff, shifts, time_off, min_rest) {
                return true;
            }
        }
        false
    }

    extend(0, &mut choice, staff, shifts, time_off, min_rest)
}

#[test]
fn test_optimizer_invariants_on_random_rosters() {
    let mut rng = StdRng::seed_from_u64(0x0C_A11);
    let scheduler = OptimizingScheduler::new();

    for _ in 0..40 {
        let instance = random_instance(&mut rng);
        let RosterRequest {
            staff,
            shifts,
            time_off,
        } = &instance.request;
        let result = scheduler.schedule(&instance.request, &instance.config);

        match result {
            Ok(schedule) => {
                assert!(matches!(
                    schedule.status,
                    SolveStatus::Optimal | SolveStatus::Feasible
                ));
                let min_rest = instance.config.min_rest_hours;
                let violations = audit_schedule(&schedule, staff, shifts, time_off, min_rest);
                assert!(violations.is_empty(), "violations: {violations:?}");
                assert_eq!(schedule.assignment_count(), shifts.len());
                let keys: Vec<_> = schedule
                    .assignments
                    .iter()
                    .map(|a| (a.start, a.shift_id))
                    .collect();
                assert!(keys.windows(2).all(|w| w[0] <= w[1]));
            }
            Err(ScheduleError::Infeasible { .. }) => {
                assert!(!any_valid_assignment(&instance));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_round_robin_invariants_on_random_rosters() {
    let mut rng = StdRng::seed_from_u64(7);

    for round in 0..60 {
        let instance = random_instance(&mut rng);
        let RosterRequest {
            staff,
            shifts,
            time_off,
        } = &instance.request;
        let scheduler = RoundRobinScheduler::new().with_start_cursor(round);
        let first = scheduler.schedule(&instance.request, &instance.config);
        let second = scheduler.schedule(&instance.request, &instance.config);

        let mut sorted = shifts.clone();
        sorted.sort_by_key(Shift::order_key);
        let uncoverable = Eligibility::compute(staff, &sorted, time_off).first_uncoverable();

        match (first, second) {
            (Ok(a), Ok(b)) => {
                assert!(uncoverable.is_none());
                assert_eq!(a.assignments, b.assignments);
                assert_eq!(a.status, SolveStatus::Heuristic);
                // Rest is not enforced by this strategy.
                let hard: Vec<_> =
                    audit_schedule(&a, staff, shifts, time_off, instance.config.min_rest_hours)
                        .into_iter()
                        .filter(|v| v.violation_type != ViolationType::RestViolation)
                        .collect();
                assert!(hard.is_empty(), "violations: {hard:?}");
            }
            (Err(a), Err(b)) => {
                assert_eq!(a, b);
                let row = uncoverable.expect("failure implies an uncoverable shift");
                assert_eq!(a.blocking_shift(), Some(sorted[row].id));
            }
            _ => panic!("round-robin is not deterministic"),
        }
    }
}

#[test]
fn test_higher_fte_never_gets_lower_target() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..30 {
        let instance = random_instance(&mut rng);
        let weights = instance.config.fairness_weights();
        let empty = u_roster::models::Schedule::new(SolveStatus::Heuristic);

        let before = ScheduleReport::calculate(&empty, &instance.request, &weights);
        let mut bumped = instance.request.clone();
        bumped.staff[0].fte += 0.5;
        let after = ScheduleReport::calculate(&empty, &bumped, &weights);

        assert!(after.staff[0].target_share >= before.staff[0].target_share - 1e-10);
    }
}
