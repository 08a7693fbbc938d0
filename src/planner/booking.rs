use super::types::{ResolvedDay, SlotOptions};
use super::util;
use crate::model::{Appointment, TimeOfDay, TimeSlot};

/// Créneaux réservables pour une prestation de `service_minutes`, au pas de
/// `opts.interval_minutes`, à l'intérieur des créneaux de travail du membre.
/// Rendus dans l'ordre des blocs fournis puis par heure de début dans chaque
/// bloc ; l'appelant trie s'il veut un ordre chronologique global.
pub fn available_slots(
    staff_slots: &[TimeSlot],
    appointments: &[Appointment],
    service_minutes: u16,
    opts: SlotOptions,
) -> Vec<TimeSlot> {
    if service_minutes == 0 || opts.interval_minutes == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for block in staff_slots {
        let mut start = block.start;
        loop {
            let Some(end) = start.add_minutes(service_minutes) else {
                break;
            };
            if end > block.end {
                break;
            }
            let candidate = TimeSlot { start, end };
            let blocked = appointments
                .iter()
                .any(|a| a.is_active() && util::slots_overlap(candidate, a.window()));
            if !blocked {
                out.push(candidate);
            }
            match start.add_minutes(opts.interval_minutes) {
                Some(next) => start = next,
                None => break,
            }
        }
    }
    out
}

/// Rendez-vous actifs du même membre, même date, dont la fenêtre chevauche
/// celle proposée. Filtre pur, sans mutation ; le rendez-vous proposé
/// lui-même est exclu par identifiant.
pub fn appointment_conflicts(proposed: &Appointment, existing: &[Appointment]) -> Vec<Appointment> {
    existing
        .iter()
        .filter(|a| {
            a.id != proposed.id
                && a.staff_id == proposed.staff_id
                && a.date == proposed.date
                && a.is_active()
                && util::slots_overlap(a.window(), proposed.window())
        })
        .cloned()
        .collect()
}

/// Contenance stricte : la fenêtre doit tenir entière dans au moins un
/// créneau du membre. Distinct d'un simple chevauchement.
pub fn validate_appointment_slot(start: TimeOfDay, end: TimeOfDay, staff_slots: &[TimeSlot]) -> bool {
    staff_slots
        .iter()
        .any(|s| start >= s.start && end <= s.end)
}

/// Message d'erreur lisible si un créneau proposé déborde des horaires
/// résolus de la succursale ; `None` quand tout rentre.
pub fn validate_against_branch_hours(
    staff_slots: &[TimeSlot],
    branch_day: &ResolvedDay,
) -> Option<String> {
    if staff_slots.is_empty() {
        return None;
    }
    let Some(span) = branch_day.span() else {
        return Some("branch is closed on this date".to_string());
    };
    for slot in staff_slots {
        if slot.start < span.start {
            return Some(format!(
                "slot {slot} starts before branch opening at {}",
                span.start
            ));
        }
        if slot.end > span.end {
            return Some(format!(
                "slot {slot} ends after branch closing at {}",
                span.end
            ));
        }
    }
    None
}
