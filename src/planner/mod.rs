mod assignment;
mod booking;
mod conflicts;
mod resolve;
mod types;
mod util;
mod utilization;

pub use assignment::materialize_assignments;
pub use booking::{
    appointment_conflicts, available_slots, validate_against_branch_hours,
    validate_appointment_slot,
};
pub use conflicts::{date_conflicts, weekly_conflicts};
pub use resolve::{resolve_branch_day, resolve_staff_day};
pub use types::{
    DateConflict, PlanError, ResolvedDay, ScheduleKind, SlotOptions, Utilization,
    UtilizationStatus, WeeklyConflict,
};
pub use util::{overlap_minutes, slots_overlap};
pub use utilization::staff_utilization;

use crate::model::{
    Appointment, AppointmentId, AppointmentStatus, Branch, BranchId, Directory, Staff, StaffId,
    TimeOfDay, TimeSlot, WeekPattern,
};
use chrono::NaiveDate;

/// Planner : encapsule un annuaire et expose le moteur par identifiants.
/// Les calculs ne modifient jamais l'annuaire ; seuls `book_appointment`,
/// `cancel_appointment`, `materialize` et les ajouts explicites écrivent.
#[derive(Debug, Default)]
pub struct Planner {
    directory: Directory,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            directory: Directory::default(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }
    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    pub fn add_staff(&mut self, staff: Vec<Staff>) {
        self.directory.staff.extend(staff);
    }

    pub fn add_appointments(&mut self, appointments: Vec<Appointment>) {
        self.directory.appointments.extend(appointments);
    }

    fn staff(&self, id: &StaffId) -> Result<&Staff, PlanError> {
        self.directory
            .find_staff_by_id(id)
            .ok_or_else(|| PlanError::UnknownStaff(id.as_str().to_string()))
    }

    fn branch(&self, id: &BranchId) -> Result<&Branch, PlanError> {
        self.directory
            .find_branch_by_id(id)
            .ok_or_else(|| PlanError::UnknownBranch(id.as_str().to_string()))
    }

    /// Journée effective d'un membre dans une succursale. Un membre sans
    /// horaire défini pour cette succursale est fermé, pas en erreur.
    pub fn resolve_staff_day(
        &self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        date: NaiveDate,
    ) -> Result<ResolvedDay, PlanError> {
        let staff = self.staff(staff_id)?;
        self.branch(branch_id)?;
        match self.directory.find_schedule(staff_id, branch_id) {
            Some(schedule) => Ok(resolve::resolve_staff_day(
                &schedule.week,
                &schedule.overrides,
                &staff.leaves,
                date,
            )),
            None => Ok(ResolvedDay::empty(ScheduleKind::Closed)),
        }
    }

    /// Horaires effectifs d'une succursale pour une date.
    pub fn resolve_branch_day(
        &self,
        branch_id: &BranchId,
        date: NaiveDate,
    ) -> Result<ResolvedDay, PlanError> {
        let branch = self.branch(branch_id)?;
        Ok(resolve::resolve_branch_day(
            &branch.week,
            &branch.overrides,
            date,
        ))
    }

    pub fn date_conflicts(
        &self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        date: NaiveDate,
        proposed: &[TimeSlot],
    ) -> Result<Vec<DateConflict>, PlanError> {
        self.staff(staff_id)?;
        self.branch(branch_id)?;
        Ok(conflicts::date_conflicts(
            staff_id,
            branch_id,
            date,
            proposed,
            &self.directory.assignments,
        ))
    }

    pub fn weekly_conflicts(
        &self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        proposed_week: &WeekPattern,
    ) -> Result<Vec<WeeklyConflict>, PlanError> {
        self.staff(staff_id)?;
        self.branch(branch_id)?;
        Ok(conflicts::weekly_conflicts(
            staff_id,
            branch_id,
            proposed_week,
            &self.directory.schedules,
        ))
    }

    pub fn available_slots(
        &self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        date: NaiveDate,
        service_minutes: u16,
        opts: SlotOptions,
    ) -> Result<Vec<TimeSlot>, PlanError> {
        let day = self.resolve_staff_day(staff_id, branch_id, date)?;
        let booked: Vec<Appointment> = self
            .directory
            .appointments
            .iter()
            .filter(|a| &a.staff_id == staff_id && a.date == date)
            .cloned()
            .collect();
        Ok(booking::available_slots(
            &day.slots,
            &booked,
            service_minutes,
            opts,
        ))
    }

    pub fn appointment_conflicts(&self, proposed: &Appointment) -> Vec<Appointment> {
        booking::appointment_conflicts(proposed, &self.directory.appointments)
    }

    pub fn validate_staff_against_branch_hours(
        &self,
        branch_id: &BranchId,
        date: NaiveDate,
        staff_slots: &[TimeSlot],
    ) -> Result<Option<String>, PlanError> {
        let day = self.resolve_branch_day(branch_id, date)?;
        Ok(booking::validate_against_branch_hours(staff_slots, &day))
    }

    pub fn utilization(
        &self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        date: NaiveDate,
    ) -> Result<Utilization, PlanError> {
        let day = self.resolve_staff_day(staff_id, branch_id, date)?;
        let booked: Vec<Appointment> = self
            .directory
            .appointments
            .iter()
            .filter(|a| &a.staff_id == staff_id && a.date == date)
            .cloned()
            .collect();
        Ok(utilization::staff_utilization(&day.slots, &booked))
    }

    /// Matérialise les affectations du membre sur la plage incluse, en
    /// remplaçant celles déjà présentes pour ce membre, cette succursale et
    /// ces dates. Sans horaire défini, rien n'est produit.
    pub fn materialize(
        &mut self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize, PlanError> {
        self.branch(branch_id)?;
        let staff = self.staff(staff_id)?;
        let fresh = match self.directory.find_schedule(staff_id, branch_id) {
            Some(schedule) => {
                assignment::materialize_assignments(schedule, &staff.leaves, from, to)?
            }
            None => {
                if to < from {
                    return Err(PlanError::InvalidDateRange);
                }
                Vec::new()
            }
        };
        let count = fresh.len();
        self.directory.assignments.retain(|a| {
            !(&a.staff_id == staff_id
                && &a.branch_id == branch_id
                && a.date >= from
                && a.date <= to)
        });
        self.directory.assignments.extend(fresh);
        Ok(count)
    }

    /// Réserve un rendez-vous après trois gardes : contenance dans la journée
    /// effective du membre, respect des horaires de la succursale, absence de
    /// chevauchement avec un rendez-vous actif.
    pub fn book_appointment(
        &mut self,
        staff_id: &StaffId,
        branch_id: &BranchId,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<AppointmentId, PlanError> {
        if end <= start {
            return Err(PlanError::InvalidTimeRange);
        }

        let day = self.resolve_staff_day(staff_id, branch_id, date)?;
        if !booking::validate_appointment_slot(start, end, &day.slots) {
            return Err(PlanError::BookingInvalid(
                "window outside staff availability",
            ));
        }

        let branch_day = self.resolve_branch_day(branch_id, date)?;
        let window = TimeSlot { start, end };
        if booking::validate_against_branch_hours(std::slice::from_ref(&window), &branch_day)
            .is_some()
        {
            return Err(PlanError::BookingInvalid("window outside branch hours"));
        }

        let appointment = Appointment::new(staff_id.clone(), branch_id.clone(), date, start, end)
            .map_err(|_| PlanError::InvalidTimeRange)?;
        if !booking::appointment_conflicts(&appointment, &self.directory.appointments).is_empty() {
            return Err(PlanError::BookingInvalid(
                "window overlaps an existing appointment",
            ));
        }

        let id = appointment.id.clone();
        self.directory.appointments.push(appointment);
        Ok(id)
    }

    pub fn cancel_appointment(&mut self, id: &AppointmentId) -> Result<(), PlanError> {
        match self.directory.find_appointment_mut(id) {
            Some(appointment) => {
                appointment.status = AppointmentStatus::Cancelled;
                Ok(())
            }
            None => Err(PlanError::UnknownAppointment(id.as_str().to_string())),
        }
    }
}
