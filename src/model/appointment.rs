use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Accept,
    #[default]
    Pending,
    Cancel,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Accept => "ACCEPT",
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Cancel => "CANCEL",
        }
    }

    /// Pending may be accepted or cancelled, an accepted appointment may still
    /// be cancelled, and a cancelled one is final. Re-applying the current
    /// status is always allowed.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Accept) | (Pending, Cancel) | (Accept, Cancel)
        ) || *self == next
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AppointmentSchedule {
    pub id: i64,
    pub room: String,
    pub date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub note: Option<String>,
    pub doctor_id: i64,
    pub patient_id: i64,
    /// User who made the booking; may be someone other than the patient.
    pub booked_by: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub room: String,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub note: Option<String>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub booked_by: i64,
}

impl NewAppointment {
    pub fn new(room: impl Into<String>, doctor_id: i64, patient_id: i64, booked_by: i64) -> Self {
        Self {
            room: room.into(),
            date: None,
            status: None,
            note: None,
            doctor_id,
            patient_id,
            booked_by,
        }
    }

    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
