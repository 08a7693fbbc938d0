use chrono::{NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Erreur de format pour les heures saisies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid time of day: {0:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTime(String),
    #[error("invalid time slot: {0:?} (expected HH:MM-HH:MM with start < end)")]
    InvalidSlot(String),
    #[error("minutes out of range: {0} (expected 0..1440)")]
    MinutesOutOfRange(u32),
}

/// Heure de la journée en minutes depuis minuit, toujours dans [0, 1440).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    pub fn from_minutes(minutes: u32) -> Result<Self, FormatError> {
        if minutes >= u32::from(Self::MINUTES_PER_DAY) {
            return Err(FormatError::MinutesOutOfRange(minutes));
        }
        Ok(Self(minutes as u16))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Décale l'heure de `delta` minutes ; `None` au-delà de minuit.
    pub fn add_minutes(self, delta: u16) -> Option<Self> {
        let total = u32::from(self.0) + u32::from(delta);
        (total < u32::from(Self::MINUTES_PER_DAY)).then_some(Self(total as u16))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = FormatError;

    /// Accepte `HH:MM` et `HH:MM:SS` ; les secondes sont validées puis ignorées.
    fn from_str(raw: &str) -> Result<Self, FormatError> {
        let bad = || FormatError::InvalidTime(raw.to_string());
        let mut parts = raw.split(':');
        let hours: u32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(bad)?;
        let minutes: u32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(bad)?;
        if let Some(seconds) = parts.next() {
            let seconds: u32 = seconds.parse().map_err(|_| bad())?;
            if seconds >= 60 {
                return Err(bad());
            }
        }
        if parts.next().is_some() || hours >= 24 || minutes >= 60 {
            return Err(bad());
        }
        Ok(Self((hours * 60 + minutes) as u16))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Créneau horaire [start, end) à l'intérieur d'une même journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSlot {
    /// Crée un créneau en validant que `end > start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, String> {
        if end <= start {
            return Err("slot end must be after start".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes()) - u32::from(self.start.minutes())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for TimeSlot {
    type Err = FormatError;

    fn from_str(raw: &str) -> Result<Self, FormatError> {
        let (start_raw, end_raw) = raw
            .split_once('-')
            .ok_or_else(|| FormatError::InvalidSlot(raw.to_string()))?;
        let start: TimeOfDay = start_raw.trim().parse()?;
        let end: TimeOfDay = end_raw.trim().parse()?;
        Self::new(start, end).map_err(|_| FormatError::InvalidSlot(raw.to_string()))
    }
}

/// Échelle par défaut des vues chronologiques (px par heure).
pub const DEFAULT_PIXELS_PER_HOUR: f32 = 80.0;

/// Conversion linéaire minutes → pixels pour les composants de timeline.
pub fn minutes_to_pixels(minutes: u32, pixels_per_hour: f32) -> f32 {
    minutes as f32 / 60.0 * pixels_per_hour
}

/// Identifiant fort pour Staff
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Branch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(String);

impl BranchId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Appointment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Statut d'une demande de congé ; seules les demandes approuvées comptent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Congé d'un membre, bornes incluses (granularité jour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, status: LeaveStatus) -> Result<Self, String> {
        if end_date < start_date {
            return Err("leave end must not precede start".to_string());
        }
        Ok(Self {
            start_date,
            end_date,
            status,
        })
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Membre du personnel ; les congés sont portés par le membre, pas par succursale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub handle: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaves: Vec<LeaveRequest>,
}

impl Staff {
    pub fn new<H: Into<String>, D: Into<String>>(handle: H, display_name: D) -> Self {
        Self {
            id: StaffId::random(),
            handle: handle.into(),
            display_name: display_name.into(),
            leaves: Vec::new(),
        }
    }
}

/// Journée d'un motif hebdomadaire. Jour absent, `closed` ou sans créneau
/// valent tous « aucune disponibilité ».
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

/// Motif hebdomadaire récurrent, indexé par jour de semaine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DaySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DaySchedule>,
}

impl WeekPattern {
    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }
}

/// Nature d'une exception de date pour un membre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    Available,
    Unavailable,
    CustomHours,
}

/// Exception de date sur le motif récurrent d'un membre.
/// Au plus une exception par (membre, date) ; invariant tenu par l'appelant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub date: NaiveDate,
    pub kind: OverrideKind,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Nature d'une exception de date pour une succursale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchOverrideKind {
    Closed,
    CustomHours,
}

/// Exception de date sur les horaires d'ouverture d'une succursale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOverride {
    pub date: NaiveDate,
    pub kind: BranchOverrideKind,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

/// Succursale et ses horaires d'ouverture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    #[serde(default)]
    pub week: WeekPattern,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<BranchOverride>,
}

impl Branch {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: BranchId::random(),
            name: name.into(),
            week: WeekPattern::default(),
            overrides: Vec::new(),
        }
    }
}

/// Horaires récurrents d'un membre dans une succursale donnée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffBranchSchedule {
    pub staff_id: StaffId,
    pub branch_id: BranchId,
    #[serde(default)]
    pub week: WeekPattern,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ScheduleOverride>,
}

/// Affectation concrète « le membre X travaille à la succursale Y le jour Z ».
/// C'est l'unité sur laquelle raisonne la détection de conflits par date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDateAssignment {
    pub staff_id: StaffId,
    pub branch_id: BranchId,
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Statut d'un rendez-vous ; un rendez-vous annulé ne compte plus nulle part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Rendez-vous client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub staff_id: StaffId,
    pub branch_id: BranchId,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Crée un rendez-vous en validant que `end > start`.
    pub fn new(
        staff_id: StaffId,
        branch_id: BranchId,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        Ok(Self {
            id: AppointmentId::random(),
            staff_id,
            branch_id,
            date,
            start,
            end,
            status: AppointmentStatus::Scheduled,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    pub fn window(&self) -> TimeSlot {
        TimeSlot {
            start: self.start,
            end: self.end,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.window().duration_minutes()
    }
}

/// Annuaire complet : l'instantané que le moteur ne fait que lire.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Directory {
    pub staff: Vec<Staff>,
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub schedules: Vec<StaffBranchSchedule>,
    #[serde(default)]
    pub assignments: Vec<StaffDateAssignment>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl Directory {
    pub fn find_staff_by_handle<'a>(&'a self, handle: &str) -> Option<&'a Staff> {
        self.staff.iter().find(|s| s.handle == handle)
    }
    pub fn find_staff_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a Staff> {
        self.staff.iter().find(|s| &s.id == id)
    }
    pub fn find_branch_by_name<'a>(&'a self, name: &str) -> Option<&'a Branch> {
        self.branches.iter().find(|b| b.name == name)
    }
    pub fn find_branch_by_id<'a>(&'a self, id: &BranchId) -> Option<&'a Branch> {
        self.branches.iter().find(|b| &b.id == id)
    }
    pub fn find_schedule<'a>(
        &'a self,
        staff_id: &StaffId,
        branch_id: &BranchId,
    ) -> Option<&'a StaffBranchSchedule> {
        self.schedules
            .iter()
            .find(|s| &s.staff_id == staff_id && &s.branch_id == branch_id)
    }
    pub fn find_appointment_mut(&mut self, id: &AppointmentId) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| &a.id == id)
    }
}
