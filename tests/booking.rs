#![forbid(unsafe_code)]
use chrono::NaiveDate;
use creneau::{
    appointment_conflicts, available_slots, overlap_minutes, staff_utilization,
    validate_against_branch_hours, validate_appointment_slot, Appointment, AppointmentStatus,
    BranchId, ResolvedDay, ScheduleKind, SlotOptions, StaffId, TimeOfDay, TimeSlot,
    UtilizationStatus,
};

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

fn appointment(staff: &StaffId, date: &str, start: &str, end: &str) -> Appointment {
    Appointment::new(
        staff.clone(),
        BranchId::new("centre"),
        d(date),
        t(start),
        t(end),
    )
    .unwrap()
}

#[test]
fn thirty_minute_service_yields_eleven_quarter_hour_starts() {
    let got = available_slots(&[slot("09:00", "12:00")], &[], 30, SlotOptions::default());
    assert_eq!(got.len(), 11);
    assert_eq!(got[0], slot("09:00", "09:30"));
    assert_eq!(got[10], slot("11:30", "12:00"));
}

#[test]
fn booked_windows_are_excluded() {
    let staff = StaffId::new("amelie");
    let busy = appointment(&staff, MONDAY, "10:00", "10:30");

    let got = available_slots(
        &[slot("09:00", "12:00")],
        &[busy],
        30,
        SlotOptions::default(),
    );
    // les départs 09:45, 10:00 et 10:15 chevauchent le rendez-vous
    assert_eq!(got.len(), 8);
    assert!(!got.contains(&slot("09:45", "10:15")));
    assert!(!got.contains(&slot("10:00", "10:30")));
    assert!(!got.contains(&slot("10:15", "10:45")));
    // se toucher n'est pas se chevaucher
    assert!(got.contains(&slot("09:30", "10:00")));
    assert!(got.contains(&slot("10:30", "11:00")));
}

#[test]
fn cancelled_appointments_do_not_block_slots() {
    let staff = StaffId::new("amelie");
    let mut cancelled = appointment(&staff, MONDAY, "10:00", "10:30");
    cancelled.status = AppointmentStatus::Cancelled;

    let got = available_slots(
        &[slot("09:00", "12:00")],
        &[cancelled],
        30,
        SlotOptions::default(),
    );
    assert_eq!(got.len(), 11);
}

#[test]
fn service_longer_than_block_yields_nothing() {
    let got = available_slots(&[slot("09:00", "10:00")], &[], 90, SlotOptions::default());
    assert!(got.is_empty());
}

#[test]
fn blocks_are_walked_in_given_order() {
    let got = available_slots(
        &[slot("14:00", "15:00"), slot("09:00", "10:00")],
        &[],
        60,
        SlotOptions::default(),
    );
    assert_eq!(got, vec![slot("14:00", "15:00"), slot("09:00", "10:00")]);
}

#[test]
fn double_booked_windows_conflict_with_fifteen_shared_minutes() {
    let staff = StaffId::new("amelie");
    let first = appointment(&staff, MONDAY, "10:00", "10:30");
    let second = appointment(&staff, MONDAY, "10:15", "10:45");

    let conflicts = appointment_conflicts(&second, &[first.clone()]);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(overlap_minutes(first.window(), second.window()), 15);

    let reverse = appointment_conflicts(&first, &[second]);
    assert_eq!(reverse.len(), 1);
}

#[test]
fn conflicts_ignore_self_other_staff_other_dates_and_cancelled() {
    let staff = StaffId::new("amelie");
    let other = StaffId::new("bruno");
    let proposed = appointment(&staff, MONDAY, "10:00", "11:00");

    let other_staff = appointment(&other, MONDAY, "10:00", "11:00");
    let other_date = appointment(&staff, "2026-03-03", "10:00", "11:00");
    let mut cancelled = appointment(&staff, MONDAY, "10:30", "11:30");
    cancelled.status = AppointmentStatus::Cancelled;

    let existing = vec![proposed.clone(), other_staff, other_date, cancelled];
    assert!(appointment_conflicts(&proposed, &existing).is_empty());
}

#[test]
fn containment_is_stricter_than_overlap() {
    let slots = [slot("09:00", "12:00"), slot("14:00", "18:00")];
    assert!(validate_appointment_slot(t("09:00"), t("12:00"), &slots));
    assert!(validate_appointment_slot(t("10:00"), t("11:00"), &slots));
    assert!(validate_appointment_slot(t("14:30"), t("15:30"), &slots));
    // chevauche sans être contenu
    assert!(!validate_appointment_slot(t("11:30"), t("12:30"), &slots));
    // à cheval sur le trou de midi
    assert!(!validate_appointment_slot(t("11:00"), t("14:30"), &slots));
    assert!(!validate_appointment_slot(t("08:00"), t("09:30"), &slots));
}

fn branch_day(slots: Vec<TimeSlot>) -> ResolvedDay {
    let kind = if slots.is_empty() {
        ScheduleKind::Closed
    } else {
        ScheduleKind::Regular
    };
    ResolvedDay { kind, slots }
}

#[test]
fn branch_hours_violations_are_described() {
    let day = branch_day(vec![slot("09:00", "18:00")]);

    let message = validate_against_branch_hours(&[slot("08:00", "12:00")], &day).unwrap();
    insta::assert_snapshot!(message, @"slot 08:00-12:00 starts before branch opening at 09:00");

    let message = validate_against_branch_hours(&[slot("10:00", "19:00")], &day).unwrap();
    assert_eq!(message, "slot 10:00-19:00 ends after branch closing at 18:00");

    let closed = branch_day(Vec::new());
    let message = validate_against_branch_hours(&[slot("10:00", "11:00")], &closed).unwrap();
    assert_eq!(message, "branch is closed on this date");
}

#[test]
fn branch_hours_accept_contained_slots() {
    let day = branch_day(vec![slot("09:00", "18:00")]);
    assert!(validate_against_branch_hours(&[slot("09:00", "18:00")], &day).is_none());
    assert!(validate_against_branch_hours(&[slot("10:00", "12:00")], &day).is_none());
    // rien à valider
    assert!(validate_against_branch_hours(&[], &branch_day(Vec::new())).is_none());
}

#[test]
fn branch_hours_check_the_overall_span() {
    // deux blocs: l'enveloppe 09:00-18:00 sert de bornes
    let day = branch_day(vec![slot("09:00", "12:00"), slot("14:00", "18:00")]);
    assert!(validate_against_branch_hours(&[slot("12:30", "13:30")], &day).is_none());
}

#[test]
fn utilization_at_half_capacity_is_optimal() {
    let staff = StaffId::new("amelie");
    let m = staff_utilization(
        &[slot("09:00", "17:00")],
        &[appointment(&staff, MONDAY, "10:00", "14:00")],
    );
    assert_eq!(m.available_minutes, 480);
    assert_eq!(m.booked_minutes, 240);
    assert_eq!(m.percentage, 50);
    assert_eq!(m.status, UtilizationStatus::Optimal);
}

#[test]
fn utilization_band_edges_are_exact() {
    let staff = StaffId::new("amelie");
    // 100 minutes disponibles pour des pourcentages exacts
    let slots = [slot("09:00", "10:40")];

    let m = staff_utilization(&slots, &[appointment(&staff, MONDAY, "09:00", "10:29")]);
    assert_eq!(m.percentage, 89);
    assert_eq!(m.status, UtilizationStatus::Optimal);

    let m = staff_utilization(&slots, &[appointment(&staff, MONDAY, "09:00", "10:30")]);
    assert_eq!(m.percentage, 90);
    assert_eq!(m.status, UtilizationStatus::Optimal);

    let m = staff_utilization(&slots, &[appointment(&staff, MONDAY, "09:00", "10:31")]);
    assert_eq!(m.percentage, 91);
    assert_eq!(m.status, UtilizationStatus::Overbooked);

    let m = staff_utilization(&slots, &[appointment(&staff, MONDAY, "09:00", "09:49")]);
    assert_eq!(m.percentage, 49);
    assert_eq!(m.status, UtilizationStatus::Underbooked);

    let m = staff_utilization(&slots, &[appointment(&staff, MONDAY, "09:00", "09:50")]);
    assert_eq!(m.percentage, 50);
    assert_eq!(m.status, UtilizationStatus::Optimal);
}

#[test]
fn utilization_without_availability_is_zero() {
    let staff = StaffId::new("amelie");
    let m = staff_utilization(&[], &[appointment(&staff, MONDAY, "09:00", "10:00")]);
    assert_eq!(m.available_minutes, 0);
    assert_eq!(m.percentage, 0);
    assert_eq!(m.status, UtilizationStatus::Underbooked);
}

#[test]
fn utilization_skips_cancelled_appointments() {
    let staff = StaffId::new("amelie");
    let mut cancelled = appointment(&staff, MONDAY, "10:00", "14:00");
    cancelled.status = AppointmentStatus::Cancelled;

    let m = staff_utilization(&[slot("09:00", "17:00")], &[cancelled]);
    assert_eq!(m.booked_minutes, 0);
    assert_eq!(m.status, UtilizationStatus::Underbooked);
}
