// libs/appointment-cell/src/services/lifecycle.rs
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use shared_models::ViewerRole;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// The appointment status state machine.
///
/// pending -> {approved, cancelled}
/// approved -> {completed, cancelled}
/// completed, cancelled -> (terminal)
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Get all valid next statuses for a given current status
    pub fn valid_transitions(&self, current: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Approved,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Approved => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    /// Validate that a status transition follows a defined edge
    pub fn validate_transition(
        &self,
        from: &AppointmentStatus,
        to: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", from, to);

        if !self.valid_transitions(from).contains(to) {
            warn!("Invalid status transition attempted: {} -> {}", from, to);
            return Err(AppointmentError::InvalidTransition {
                from: *from,
                to: *to,
            });
        }

        Ok(())
    }

    /// Validate that the viewer's role is allowed to trigger a transition.
    ///
    /// Approval and decline are practitioner actions. Patients may cancel
    /// only while the request is still pending; practitioners may also
    /// cancel an approved slot. Completion is system-triggered and never
    /// goes through a viewer.
    pub fn validate_actor(
        &self,
        from: &AppointmentStatus,
        to: &AppointmentStatus,
        role: ViewerRole,
    ) -> Result<(), AppointmentError> {
        match (to, role) {
            (AppointmentStatus::Approved, ViewerRole::Doctor) => Ok(()),
            (AppointmentStatus::Approved, ViewerRole::Patient) => Err(
                AppointmentError::Unauthorized("only a doctor can approve an appointment".to_string()),
            ),
            (AppointmentStatus::Cancelled, ViewerRole::Doctor) => Ok(()),
            (AppointmentStatus::Cancelled, ViewerRole::Patient) => {
                if *from == AppointmentStatus::Pending {
                    Ok(())
                } else {
                    Err(AppointmentError::Unauthorized(
                        "patients can only cancel appointments that are still pending".to_string(),
                    ))
                }
            }
            (AppointmentStatus::Completed, _) => Err(AppointmentError::Unauthorized(
                "completion is a system action".to_string(),
            )),
            (AppointmentStatus::Pending, _) => Err(AppointmentError::Unauthorized(
                "appointments re-enter pending only through booking".to_string(),
            )),
        }
    }

    /// Whether the reconciliation pass should mark this record completed:
    /// approved, with its slot strictly in the past.
    pub fn should_auto_complete(&self, appointment: &Appointment, now: NaiveDateTime) -> bool {
        appointment.status == AppointmentStatus::Approved && appointment.is_past(now)
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
