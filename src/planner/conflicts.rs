use super::types::{DateConflict, WeeklyConflict};
use super::util;
use crate::model::{BranchId, StaffBranchSchedule, StaffDateAssignment, StaffId, TimeSlot, WeekPattern};
use chrono::{NaiveDate, Weekday};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Conflits inter-succursales pour une date précise : les créneaux proposés
/// pour `edited_branch` contre les affectations du même membre ailleurs ce
/// jour-là. La succursale en cours d'édition est toujours exclue.
pub fn date_conflicts(
    staff_id: &StaffId,
    edited_branch: &BranchId,
    date: NaiveDate,
    proposed: &[TimeSlot],
    assignments: &[StaffDateAssignment],
) -> Vec<DateConflict> {
    let mut out = Vec::new();

    for assignment in assignments {
        if &assignment.staff_id != staff_id
            || assignment.date != date
            || &assignment.branch_id == edited_branch
        {
            continue;
        }
        for p in proposed {
            for existing in &assignment.slots {
                if util::slots_overlap(*p, *existing) {
                    out.push(DateConflict {
                        branch: assignment.branch_id.clone(),
                        proposed: *p,
                        existing: *existing,
                        overlap_minutes: util::overlap_minutes(*p, *existing),
                    });
                }
            }
        }
    }

    out
}

/// Conflits sur les motifs hebdomadaires bruts, pour l'éditeur d'horaires
/// récurrents : exceptions et congés ignorés. Vérification plus grossière et
/// distincte de `date_conflicts`, à ne pas fusionner.
pub fn weekly_conflicts(
    staff_id: &StaffId,
    edited_branch: &BranchId,
    proposed_week: &WeekPattern,
    schedules: &[StaffBranchSchedule],
) -> Vec<WeeklyConflict> {
    let mut out = Vec::new();

    for weekday in WEEKDAYS {
        let Some(day) = proposed_week.day(weekday) else {
            continue;
        };
        if day.closed || day.slots.is_empty() {
            continue;
        }
        for schedule in schedules {
            if &schedule.staff_id != staff_id || &schedule.branch_id == edited_branch {
                continue;
            }
            let Some(other_day) = schedule.week.day(weekday) else {
                continue;
            };
            if other_day.closed {
                continue;
            }
            for p in &day.slots {
                for existing in &other_day.slots {
                    if util::slots_overlap(*p, *existing) {
                        out.push(WeeklyConflict {
                            weekday,
                            branch: schedule.branch_id.clone(),
                            proposed: *p,
                            existing: *existing,
                            overlap_minutes: util::overlap_minutes(*p, *existing),
                        });
                    }
                }
            }
        }
    }

    out
}
