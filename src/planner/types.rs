use crate::model::{BranchId, FormatError, TimeSlot};
use chrono::Weekday;
use std::fmt;
use thiserror::Error;

/// Options de génération des créneaux réservables.
#[derive(Debug, Clone, Copy)]
pub struct SlotOptions {
    pub interval_minutes: u16,
}

impl Default for SlotOptions {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
        }
    }
}

/// Catégorie d'une journée après résolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Unavailable,
    Custom,
    Closed,
    Regular,
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScheduleKind::Unavailable => "unavailable",
            ScheduleKind::Custom => "custom",
            ScheduleKind::Closed => "closed",
            ScheduleKind::Regular => "regular",
        };
        f.write_str(label)
    }
}

/// Journée effective : congés > exception de date > motif récurrent.
/// Une exception « custom » sans créneau garde la catégorie `Custom` même si
/// le résultat observable est vide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDay {
    pub kind: ScheduleKind,
    pub slots: Vec<TimeSlot>,
}

impl ResolvedDay {
    pub(super) fn empty(kind: ScheduleKind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
        }
    }

    pub fn is_bookable(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Enveloppe [première ouverture, dernière fermeture] de la journée.
    pub fn span(&self) -> Option<TimeSlot> {
        super::util::span_of(&self.slots)
    }
}

/// Chevauchement détecté avec une autre succursale pour une date précise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateConflict {
    pub branch: BranchId,
    pub proposed: TimeSlot,
    pub existing: TimeSlot,
    pub overlap_minutes: u32,
}

/// Chevauchement entre motifs hebdomadaires bruts de deux succursales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyConflict {
    pub weekday: Weekday,
    pub branch: BranchId,
    pub proposed: TimeSlot,
    pub existing: TimeSlot,
    pub overlap_minutes: u32,
}

/// Bande d'occupation d'une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationStatus {
    Underbooked,
    Optimal,
    Overbooked,
}

impl fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UtilizationStatus::Underbooked => "underbooked",
            UtilizationStatus::Optimal => "optimal",
            UtilizationStatus::Overbooked => "overbooked",
        };
        f.write_str(label)
    }
}

/// Minutes réservées contre minutes disponibles pour un membre sur un jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utilization {
    pub available_minutes: u32,
    pub booked_minutes: u32,
    pub percentage: u32,
    pub status: UtilizationStatus,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("invalid date range: end must be on or after start")]
    InvalidDateRange,
    #[error("unknown staff: {0}")]
    UnknownStaff(String),
    #[error("unknown branch: {0}")]
    UnknownBranch(String),
    #[error("unknown appointment: {0}")]
    UnknownAppointment(String),
    #[error("booking invalid: {0}")]
    BookingInvalid(&'static str),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
