use super::types::{ResolvedDay, ScheduleKind};
use super::util;
use crate::model::{
    BranchOverride, BranchOverrideKind, DaySchedule, LeaveRequest, OverrideKind, ScheduleOverride,
    TimeSlot, WeekPattern,
};
use chrono::{Datelike, NaiveDate};

/// Palier « exception de date » de la résolution.
enum OverrideTier {
    Off(ScheduleKind),
    Slots(Vec<TimeSlot>),
}

/// Journée effective d'un membre : congés > exception de date > récurrent.
/// Premier congé approuvé couvrant la date : tout le reste est ignoré.
/// Première exception correspondant à la date : le motif récurrent est ignoré.
pub fn resolve_staff_day(
    week: &WeekPattern,
    overrides: &[ScheduleOverride],
    leaves: &[LeaveRequest],
    date: NaiveDate,
) -> ResolvedDay {
    let on_leave = leaves.iter().any(|l| l.is_approved() && l.covers(date));
    let tier = overrides
        .iter()
        .find(|o| o.date == date)
        .map(|o| match o.kind {
            OverrideKind::Unavailable => OverrideTier::Off(ScheduleKind::Unavailable),
            OverrideKind::Available | OverrideKind::CustomHours => {
                OverrideTier::Slots(o.slots.clone())
            }
        });
    resolve_tiers(on_leave, tier, week.day(date.weekday()))
}

/// Journée effective d'une succursale : exception de date > récurrent.
/// Les horaires personnalisés d'une succursale sont réduits à leur enveloppe
/// [première ouverture, dernière fermeture] ; cette réduction ne s'applique
/// jamais aux membres.
pub fn resolve_branch_day(
    week: &WeekPattern,
    overrides: &[BranchOverride],
    date: NaiveDate,
) -> ResolvedDay {
    let tier = overrides
        .iter()
        .find(|o| o.date == date)
        .map(|o| match o.kind {
            BranchOverrideKind::Closed => OverrideTier::Off(ScheduleKind::Closed),
            BranchOverrideKind::CustomHours => {
                OverrideTier::Slots(util::span_of(&o.slots).into_iter().collect())
            }
        });
    resolve_tiers(false, tier, week.day(date.weekday()))
}

fn resolve_tiers(
    on_leave: bool,
    tier: Option<OverrideTier>,
    day: Option<&DaySchedule>,
) -> ResolvedDay {
    if on_leave {
        return ResolvedDay::empty(ScheduleKind::Unavailable);
    }
    match tier {
        Some(OverrideTier::Off(kind)) => ResolvedDay::empty(kind),
        Some(OverrideTier::Slots(slots)) => ResolvedDay {
            kind: ScheduleKind::Custom,
            slots,
        },
        None => match day {
            Some(d) if !d.closed && !d.slots.is_empty() => ResolvedDay {
                kind: ScheduleKind::Regular,
                slots: d.slots.clone(),
            },
            _ => ResolvedDay::empty(ScheduleKind::Closed),
        },
    }
}
