// libs/appointment-cell/src/services/booking.rs
use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::{AppointmentDraft, AppointmentError, BookingRules};

/// Gates submission of a new appointment draft.
///
/// These checks are advisory UX, not a security boundary: the store adapter
/// re-checks required fields, and nothing here prevents two patients from
/// booking the identical slot with the same doctor.
pub struct BookingService {
    rules: BookingRules,
}

impl BookingService {
    pub fn new() -> Self {
        Self {
            rules: BookingRules::default(),
        }
    }

    pub fn with_rules(rules: BookingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Validate a draft against the booking rules at submission time.
    pub fn validate_draft(
        &self,
        draft: &AppointmentDraft,
        now: NaiveDateTime,
    ) -> Result<(), AppointmentError> {
        debug!("Validating booking draft for doctor {}", draft.doctor_id);

        if draft.doctor_id.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "a practitioner must be selected".to_string(),
            ));
        }

        if draft.reason.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "a reason for the consultation is required".to_string(),
            ));
        }

        let earliest = self.rules.earliest_bookable_date(now);
        if draft.date < earliest {
            return Err(AppointmentError::Validation(format!(
                "appointments must be booked for {} or later",
                earliest
            )));
        }

        if !self.rules.time_slots().contains(&draft.time) {
            return Err(AppointmentError::Validation(format!(
                "{} is not an available time slot",
                draft.time.format("%H:%M")
            )));
        }

        Ok(())
    }
}

impl Default for BookingService {
    fn default() -> Self {
        Self::new()
    }
}
