use super::types::{Utilization, UtilizationStatus};
use crate::model::{Appointment, TimeSlot};

/// Agrège minutes réservées contre minutes disponibles et classe la journée.
/// Bandes : < 50 % sous-réservé, > 90 % sur-réservé, optimal entre les deux
/// (bornes incluses). 0 % quand aucune minute n'est disponible.
pub fn staff_utilization(slots: &[TimeSlot], appointments: &[Appointment]) -> Utilization {
    let available_minutes: u32 = slots.iter().map(TimeSlot::duration_minutes).sum();
    let booked_minutes: u32 = appointments
        .iter()
        .filter(|a| a.is_active())
        .map(Appointment::duration_minutes)
        .sum();

    let percentage = if available_minutes == 0 {
        0
    } else {
        (f64::from(booked_minutes) / f64::from(available_minutes) * 100.0).round() as u32
    };

    let status = if percentage < 50 {
        UtilizationStatus::Underbooked
    } else if percentage > 90 {
        UtilizationStatus::Overbooked
    } else {
        UtilizationStatus::Optimal
    };

    Utilization {
        available_minutes,
        booked_minutes,
        percentage,
        status,
    }
}
