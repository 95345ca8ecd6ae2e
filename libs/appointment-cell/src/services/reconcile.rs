// libs/appointment-cell/src/services/reconcile.rs
use chrono::NaiveDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus};
use crate::store::AppointmentStore;

/// Background reconciliation pass: mark approved appointments whose slot is
/// strictly in the past as completed.
///
/// Runs opportunistically on every snapshot refresh. Already-completed
/// records are skipped instead of rewritten, and an individual write
/// failure is logged and skipped so the rest of the set is still
/// reconciled. Returns the ids that were transitioned.
pub async fn reconcile<S>(store: &S, appointments: &[Appointment], now: NaiveDateTime) -> Vec<Uuid>
where
    S: AppointmentStore + ?Sized,
{
    let mut completed = Vec::new();

    for appointment in appointments {
        if appointment.status != AppointmentStatus::Approved || !appointment.is_past(now) {
            continue;
        }

        match store
            .set_status(appointment.id, AppointmentStatus::Completed)
            .await
        {
            Ok(()) => {
                debug!("Auto-completed appointment {}", appointment.id);
                completed.push(appointment.id);
            }
            Err(err) => {
                warn!("Skipping auto-completion of appointment {}: {}", appointment.id, err);
            }
        }
    }

    completed
}
