#![forbid(unsafe_code)]
//! Creneau — bibliothèque de planification multi-succursales pour salons (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Résolution congés > exception de date > horaires récurrents.
//! - Détection de conflits inter-succursales, créneaux réservables, occupation.
//! - Dates naïves (calendrier local du salon) ; heures en minutes depuis minuit.

pub mod io;
pub mod model;
pub mod notification;
pub mod planner;
pub mod storage;

pub use model::{
    minutes_to_pixels, Appointment, AppointmentId, AppointmentStatus, Branch, BranchId,
    BranchOverride, BranchOverrideKind, DaySchedule, Directory, FormatError, LeaveRequest,
    LeaveStatus, OverrideKind, ScheduleOverride, Staff, StaffBranchSchedule, StaffDateAssignment,
    StaffId, TimeOfDay, TimeSlot, WeekPattern, DEFAULT_PIXELS_PER_HOUR,
};
pub use notification::{prepare_reminder, Reminder, ReminderRenderer, TextReminder};
pub use planner::{
    appointment_conflicts, available_slots, date_conflicts, materialize_assignments,
    overlap_minutes, resolve_branch_day, resolve_staff_day, slots_overlap, staff_utilization,
    validate_against_branch_hours, validate_appointment_slot, weekly_conflicts, DateConflict,
    PlanError, Planner, ResolvedDay, ScheduleKind, SlotOptions, Utilization, UtilizationStatus,
    WeeklyConflict,
};
pub use storage::{JsonStorage, Storage};
