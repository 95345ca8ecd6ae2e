// libs/appointment-cell/src/manager.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use tracing::info;
use uuid::Uuid;

use shared_models::{Viewer, ViewerRole};

use crate::models::{
    Appointment, AppointmentDraft, AppointmentError, AppointmentStatus, BookingRules,
    NewAppointment, Practitioner,
};
use crate::services::booking::BookingService;
use crate::services::buckets::{partition, AppointmentBuckets};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::reconcile::reconcile;
use crate::services::subscription::AppointmentFeed;
use crate::store::AppointmentStore;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Mediates between patients, practitioners, and the shared appointment
/// collection. Every view (patient dashboard, doctor dashboard, scheduler)
/// consumes this one manager instead of re-deriving the lifecycle itself.
///
/// Viewer identity is passed explicitly into every call; the manager never
/// infers role from ambient state.
pub struct AppointmentLifecycleManager<S: AppointmentStore> {
    store: Arc<S>,
    lifecycle: AppointmentLifecycleService,
    booking: BookingService,
    poll_interval: Duration,
}

impl<S: AppointmentStore + 'static> AppointmentLifecycleManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            lifecycle: AppointmentLifecycleService::new(),
            booking: BookingService::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_rules(store: Arc<S>, rules: BookingRules, poll_interval: Duration) -> Self {
        Self {
            store,
            lifecycle: AppointmentLifecycleService::new(),
            booking: BookingService::with_rules(rules),
            poll_interval,
        }
    }

    pub async fn list_practitioners(&self) -> Result<Vec<Practitioner>, AppointmentError> {
        self.store.list_practitioners().await
    }

    /// Book a new appointment as the given patient. The draft is validated
    /// against the booking rules and written with `status = pending`.
    pub async fn book(
        &self,
        viewer: &Viewer,
        draft: AppointmentDraft,
    ) -> Result<Appointment, AppointmentError> {
        if viewer.role != ViewerRole::Patient {
            return Err(AppointmentError::Unauthorized(
                "only patients can book appointments".to_string(),
            ));
        }

        self.booking
            .validate_draft(&draft, Utc::now().naive_utc())?;

        let appointment = self
            .store
            .insert(NewAppointment {
                patient_id: viewer.id.clone(),
                patient_name: viewer.display_name_or_default(),
                doctor_id: draft.doctor_id,
                doctor_name: draft.doctor_name,
                date: draft.date,
                time: draft.time,
                reason: draft.reason,
            })
            .await?;

        info!(
            "Appointment {} requested by patient {} with doctor {}",
            appointment.id, appointment.patient_id, appointment.doctor_id
        );

        Ok(appointment)
    }

    /// Practitioner accepts a pending request.
    pub async fn approve(
        &self,
        viewer: &Viewer,
        id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        self.transition(viewer, id, AppointmentStatus::Approved)
            .await
    }

    /// Practitioner turns down a pending request. Declining an already
    /// approved slot is a cancellation, not a decline.
    pub async fn decline(
        &self,
        viewer: &Viewer,
        id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        if viewer.role != ViewerRole::Doctor {
            return Err(AppointmentError::Unauthorized(
                "only a doctor can decline an appointment request".to_string(),
            ));
        }

        let appointment = self.store.fetch(id).await?;
        if appointment.status != AppointmentStatus::Pending {
            // cancelling an approved slot is legal, declining it is not
            return Err(AppointmentError::Validation(
                "decline applies only to pending requests".to_string(),
            ));
        }

        self.apply_transition(viewer, appointment, AppointmentStatus::Cancelled)
            .await
    }

    /// Cancel an appointment. Patients may cancel their own pending
    /// requests; practitioners may cancel pending or approved ones.
    pub async fn cancel(
        &self,
        viewer: &Viewer,
        id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        self.transition(viewer, id, AppointmentStatus::Cancelled)
            .await
    }

    /// System action: mark an approved appointment completed. Calling this
    /// on an already-completed record is a no-op and issues no write.
    pub async fn complete(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointment = self.store.fetch(id).await?;

        match appointment.status {
            AppointmentStatus::Completed => Ok(appointment),
            AppointmentStatus::Approved => {
                self.store
                    .set_status(id, AppointmentStatus::Completed)
                    .await?;
                Ok(Appointment {
                    status: AppointmentStatus::Completed,
                    ..appointment
                })
            }
            other => Err(AppointmentError::InvalidTransition {
                from: other,
                to: AppointmentStatus::Completed,
            }),
        }
    }

    /// Run the auto-completion pass over a snapshot. Returns the ids that
    /// were transitioned to completed.
    pub async fn reconcile(&self, appointments: &[Appointment], now: NaiveDateTime) -> Vec<Uuid> {
        reconcile(self.store.as_ref(), appointments, now).await
    }

    /// Partition a snapshot into upcoming / pending / history for display.
    pub fn buckets(&self, appointments: Vec<Appointment>, now: NaiveDateTime) -> AppointmentBuckets {
        partition(appointments, now)
    }

    /// Open a live feed of the viewer's appointment set. The feed polls the
    /// store, reconciles past approved slots, and publishes full snapshots
    /// until cancelled or dropped.
    pub fn subscribe(&self, viewer: &Viewer) -> AppointmentFeed {
        AppointmentFeed::spawn(
            Arc::clone(&self.store),
            viewer.role,
            viewer.id.clone(),
            self.poll_interval,
        )
    }

    async fn transition(
        &self,
        viewer: &Viewer,
        id: Uuid,
        to: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        // Re-fetch first so a vanished record surfaces as NotFound rather
        // than a silent write.
        let appointment = self.store.fetch(id).await?;
        self.apply_transition(viewer, appointment, to).await
    }

    async fn apply_transition(
        &self,
        viewer: &Viewer,
        appointment: Appointment,
        to: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let owns = match viewer.role {
            ViewerRole::Patient => appointment.patient_id == viewer.id,
            ViewerRole::Doctor => appointment.doctor_id == viewer.id,
        };
        if !owns {
            return Err(AppointmentError::Unauthorized(
                "viewers can only act on their own appointments".to_string(),
            ));
        }

        self.lifecycle.validate_transition(&appointment.status, &to)?;
        self.lifecycle
            .validate_actor(&appointment.status, &to, viewer.role)?;

        self.store.set_status(appointment.id, to).await?;

        info!(
            "Appointment {} transitioned {} -> {} by {}",
            appointment.id, appointment.status, to, viewer.role
        );

        Ok(Appointment {
            status: to,
            ..appointment
        })
    }
}
