// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A consultation request between a patient and a practitioner.
///
/// Field names serialize in the camelCase used by the hosted `appointments`
/// collection, so stored records round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// The requested slot as a single point in time.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.scheduled_at() < now
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Terminal statuses have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Booking form payload: the slot and reason a patient submits after
/// selecting a practitioner. Patient identity is attached by the manager
/// from the authenticated viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: String,
}

/// Fully attributed record handed to the store for insertion. The store
/// assigns the id; the adapter stamps `status = pending` and `createdAt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: String,
}

impl NewAppointment {
    /// Required-field check performed by the store adapter before writing.
    pub fn validate(&self) -> Result<(), AppointmentError> {
        if self.patient_id.trim().is_empty() {
            return Err(AppointmentError::Validation("patient id is required".to_string()));
        }
        if self.doctor_id.trim().is_empty() {
            return Err(AppointmentError::Validation("doctor id is required".to_string()));
        }
        if self.reason.trim().is_empty() {
            return Err(AppointmentError::Validation("reason is required".to_string()));
        }
        Ok(())
    }
}

/// Read-only projection of a practitioner profile from the `users`
/// collection. Owned by the external profile store; refreshed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub license: String,
}

// ==============================================================================
// BOOKING RULES
// ==============================================================================

/// Business rules gating a new appointment draft.
#[derive(Debug, Clone)]
pub struct BookingRules {
    /// Earliest bookable day, in days from the submission date. 1 means
    /// same-day booking is disallowed.
    pub min_lead_days: i64,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub slot_minutes: u32,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            min_lead_days: 1,
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            slot_minutes: 30,
        }
    }
}

impl BookingRules {
    /// The fixed grid of bookable marks, `day_start..=day_end` at
    /// `slot_minutes` steps (09:00, 09:30, ... 17:00 by default).
    pub fn time_slots(&self) -> Vec<NaiveTime> {
        let mut slots = Vec::new();
        let mut cursor = self.day_start;
        while cursor <= self.day_end {
            slots.push(cursor);
            match cursor.overflowing_add_signed(Duration::minutes(self.slot_minutes as i64)) {
                (next, 0) if next > cursor => cursor = next,
                _ => break, // wrapped past midnight
            }
        }
        slots
    }

    pub fn earliest_bookable_date(&self, now: NaiveDateTime) -> NaiveDate {
        now.date() + Duration::days(self.min_lead_days)
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Appointment not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        AppointmentError::Store(err.to_string())
    }
}
