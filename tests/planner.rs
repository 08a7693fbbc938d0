#![forbid(unsafe_code)]
use chrono::NaiveDate;
use creneau::{
    prepare_reminder, Branch, BranchId, DaySchedule, JsonStorage, LeaveRequest, LeaveStatus,
    OverrideKind, PlanError, Planner, ScheduleKind, ScheduleOverride, SlotOptions, Staff,
    StaffBranchSchedule, StaffId, Storage, TextReminder, TimeOfDay, TimeSlot, WeekPattern,
};
use tempfile::tempdir;

const MONDAY: &str = "2026-03-02";

fn d(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

fn t(raw: &str) -> TimeOfDay {
    raw.parse().unwrap()
}

fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::new(t(start), t(end)).unwrap()
}

fn week_with_monday(slots: Vec<TimeSlot>) -> WeekPattern {
    WeekPattern {
        monday: Some(DaySchedule {
            closed: false,
            slots,
        }),
        ..WeekPattern::default()
    }
}

/// Annuaire de travail : Amélie au « centre » le lundi 10:00-16:00,
/// succursale ouverte 09:00-18:00.
fn sample_planner() -> (Planner, StaffId, BranchId) {
    let mut planner = Planner::new();
    let staff = Staff::new("amelie", "Amélie");
    let staff_id = staff.id.clone();
    let mut branch = Branch::new("centre");
    branch.week = week_with_monday(vec![slot("09:00", "18:00")]);
    let branch_id = branch.id.clone();

    planner.add_staff(vec![staff]);
    planner.directory_mut().branches.push(branch);
    planner.directory_mut().schedules.push(StaffBranchSchedule {
        staff_id: staff_id.clone(),
        branch_id: branch_id.clone(),
        week: week_with_monday(vec![slot("10:00", "16:00")]),
        overrides: Vec::new(),
    });

    (planner, staff_id, branch_id)
}

#[test]
fn unknown_ids_are_reported() {
    let (planner, staff_id, branch_id) = sample_planner();

    let missing_staff = planner.resolve_staff_day(&StaffId::new("nope"), &branch_id, d(MONDAY));
    assert!(matches!(missing_staff, Err(PlanError::UnknownStaff(_))));

    let missing_branch = planner.resolve_staff_day(&staff_id, &BranchId::new("nope"), d(MONDAY));
    assert!(matches!(missing_branch, Err(PlanError::UnknownBranch(_))));
}

#[test]
fn missing_schedule_degrades_to_closed() {
    let (mut planner, staff_id, _) = sample_planner();
    let other = Branch::new("nord");
    let other_id = other.id.clone();
    planner.directory_mut().branches.push(other);

    let day = planner
        .resolve_staff_day(&staff_id, &other_id, d(MONDAY))
        .unwrap();
    assert_eq!(day.kind, ScheduleKind::Closed);
    assert!(day.slots.is_empty());
}

#[test]
fn facade_resolves_and_generates_slots() {
    let (planner, staff_id, branch_id) = sample_planner();

    let day = planner
        .resolve_staff_day(&staff_id, &branch_id, d(MONDAY))
        .unwrap();
    assert_eq!(day.kind, ScheduleKind::Regular);
    assert_eq!(day.slots, vec![slot("10:00", "16:00")]);

    let slots = planner
        .available_slots(&staff_id, &branch_id, d(MONDAY), 60, SlotOptions::default())
        .unwrap();
    assert_eq!(slots.first(), Some(&slot("10:00", "11:00")));
    assert_eq!(slots.last(), Some(&slot("15:00", "16:00")));
}

#[test]
fn booking_is_guarded() {
    let (mut planner, staff_id, branch_id) = sample_planner();

    // hors de la disponibilité du membre
    let early = planner.book_appointment(&staff_id, &branch_id, d(MONDAY), t("09:00"), t("10:00"));
    assert!(matches!(early, Err(PlanError::BookingInvalid(_))));

    // fenêtre inversée
    let inverted =
        planner.book_appointment(&staff_id, &branch_id, d(MONDAY), t("11:00"), t("10:00"));
    assert!(matches!(inverted, Err(PlanError::InvalidTimeRange)));

    let booked = planner
        .book_appointment(&staff_id, &branch_id, d(MONDAY), t("10:00"), t("11:00"))
        .unwrap();

    // chevauchement avec le rendez-vous actif
    let overlapping =
        planner.book_appointment(&staff_id, &branch_id, d(MONDAY), t("10:30"), t("11:30"));
    assert!(matches!(overlapping, Err(PlanError::BookingInvalid(_))));

    // l'annulation libère la fenêtre
    planner.cancel_appointment(&booked).unwrap();
    planner
        .book_appointment(&staff_id, &branch_id, d(MONDAY), t("10:30"), t("11:30"))
        .unwrap();
}

#[test]
fn utilization_reads_the_resolved_day() {
    let (mut planner, staff_id, branch_id) = sample_planner();
    planner
        .book_appointment(&staff_id, &branch_id, d(MONDAY), t("10:00"), t("13:00"))
        .unwrap();

    let m = planner.utilization(&staff_id, &branch_id, d(MONDAY)).unwrap();
    assert_eq!(m.available_minutes, 360);
    assert_eq!(m.booked_minutes, 180);
    assert_eq!(m.percentage, 50);
}

#[test]
fn materialize_honours_overrides_and_leave() {
    let (mut planner, staff_id, branch_id) = sample_planner();

    // ouvre aussi le mardi, puis le neutralise par une exception ; congé le
    // lundi suivant
    {
        let directory = planner.directory_mut();
        let schedule = directory.schedules.first_mut().unwrap();
        schedule.week.tuesday = Some(DaySchedule {
            closed: false,
            slots: vec![slot("10:00", "16:00")],
        });
        schedule.overrides.push(ScheduleOverride {
            date: d("2026-03-03"),
            kind: OverrideKind::Unavailable,
            slots: Vec::new(),
            reason: None,
        });
        directory.staff[0].leaves.push(
            LeaveRequest::new(d("2026-03-09"), d("2026-03-09"), LeaveStatus::Approved).unwrap(),
        );
    }

    let count = planner
        .materialize(&staff_id, &branch_id, d("2026-03-02"), d("2026-03-10"))
        .unwrap();
    // lundi 02 et mardi 10 ; mardi 03 annulé par l'exception, lundi 09 en congé
    assert_eq!(count, 2);

    let dates: Vec<NaiveDate> = planner
        .directory()
        .assignments
        .iter()
        .map(|a| a.date)
        .collect();
    assert_eq!(dates, vec![d("2026-03-02"), d("2026-03-10")]);

    // relancer remplace au lieu de dupliquer
    let again = planner
        .materialize(&staff_id, &branch_id, d("2026-03-02"), d("2026-03-10"))
        .unwrap();
    assert_eq!(again, 2);
    assert_eq!(planner.directory().assignments.len(), 2);
}

#[test]
fn materialize_rejects_inverted_ranges() {
    let (mut planner, staff_id, branch_id) = sample_planner();
    let result = planner.materialize(&staff_id, &branch_id, d("2026-03-10"), d("2026-03-02"));
    assert!(matches!(result, Err(PlanError::InvalidDateRange)));
}

#[test]
fn directory_round_trips_through_json_storage() {
    let (mut planner, staff_id, branch_id) = sample_planner();
    planner
        .book_appointment(&staff_id, &branch_id, d(MONDAY), t("10:00"), t("11:00"))
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("directory.json");
    let storage = JsonStorage::open(&path).unwrap();
    storage.save(planner.directory()).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.staff, planner.directory().staff);
    assert_eq!(loaded.branches, planner.directory().branches);
    assert_eq!(loaded.schedules, planner.directory().schedules);
    assert_eq!(loaded.appointments, planner.directory().appointments);
}

#[test]
fn reminder_targets_the_next_active_appointment() {
    let (mut planner, staff_id, branch_id) = sample_planner();
    let next = planner
        .book_appointment(&staff_id, &branch_id, d(MONDAY), t("10:00"), t("11:00"))
        .unwrap();
    planner
        .book_appointment(&staff_id, &branch_id, d("2026-03-09"), t("14:00"), t("15:00"))
        .unwrap();

    let reminder = prepare_reminder(
        planner.directory(),
        "amelie",
        2,
        d("2026-02-27"),
        &TextReminder,
    )
    .unwrap();

    assert_eq!(reminder.appointment_id, next.as_str());
    assert_eq!(reminder.notice_on, d("2026-02-28"));
    assert!(reminder.content.contains("Amélie"));
    assert!(reminder.content.contains("centre"));
    assert!(reminder.content.contains("2026-03-02"));
    assert!(reminder.content.contains("10:00"));
}

#[test]
fn reminder_fails_without_upcoming_appointment() {
    let (planner, _, _) = sample_planner();
    let result = prepare_reminder(planner.directory(), "amelie", 2, d(MONDAY), &TextReminder);
    assert!(result.is_err());
}
