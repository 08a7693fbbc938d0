use crate::model::{Appointment, Branch, Directory, Staff};
use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};

/// Représente un rappel généré pour un membre.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub staff_handle: String,
    pub appointment_id: String,
    pub notice_on: NaiveDate,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, SMS, etc.).
pub trait ReminderRenderer {
    fn render(
        &self,
        staff: &Staff,
        branch: &Branch,
        appointment: &Appointment,
        notice_on: NaiveDate,
    ) -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(
        &self,
        staff: &Staff,
        branch: &Branch,
        appointment: &Appointment,
        notice_on: NaiveDate,
    ) -> String {
        format!(
            "Bonjour {name},\n\nTu as un rendez-vous au salon \"{branch}\" le {date} de {start} à {end}.\nCe rappel est prévu pour le {notice}.\n\nMerci de préparer ton poste avant l'arrivée du client.\n",
            name = staff.display_name,
            branch = branch.name,
            date = appointment.date,
            start = appointment.start,
            end = appointment.end,
            notice = notice_on
        )
    }
}

/// Prépare un rappel pour le prochain rendez-vous actif d'un membre.
pub fn prepare_reminder(
    directory: &Directory,
    handle: &str,
    days_before: i64,
    today: NaiveDate,
    renderer: &dyn ReminderRenderer,
) -> Result<Reminder> {
    if days_before < 0 {
        bail!("days_before must be positive");
    }

    let staff = directory
        .find_staff_by_handle(handle)
        .with_context(|| format!("unknown staff handle: {handle}"))?;

    let mut upcoming: Vec<&Appointment> = directory
        .appointments
        .iter()
        .filter(|a| a.staff_id == staff.id && a.is_active() && a.date >= today)
        .collect();

    if upcoming.is_empty() {
        bail!("no upcoming appointment found for handle {handle}");
    }

    upcoming.sort_by_key(|a| (a.date, a.start));
    let appointment = upcoming[0];

    let branch = directory
        .find_branch_by_id(&appointment.branch_id)
        .with_context(|| "appointment references an unknown branch")?;

    let notice_on = appointment.date - Duration::days(days_before);

    let content = renderer.render(staff, branch, appointment, notice_on);
    Ok(Reminder {
        staff_handle: staff.handle.clone(),
        appointment_id: appointment.id.as_str().to_string(),
        notice_on,
        content,
    })
}
