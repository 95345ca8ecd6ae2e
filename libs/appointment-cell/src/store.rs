// libs/appointment-cell/src/store.rs
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::ViewerRole;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, NewAppointment, Practitioner};

/// Seam between the lifecycle manager and the hosted document store.
///
/// `set_status` is deliberately a blind write: transition legality is the
/// caller's responsibility, and concurrent writers resolve last-write-wins
/// in the store with no version check.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// All identities flagged with the practitioner role. No pagination;
    /// the full clinic directory is assumed to fit in memory.
    async fn list_practitioners(&self) -> Result<Vec<Practitioner>, AppointmentError>;

    /// The viewer's appointment set: filtered by `doctorId` for a doctor,
    /// `patientId` for a patient.
    async fn list_for_viewer(
        &self,
        role: ViewerRole,
        viewer_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn fetch(&self, id: Uuid) -> Result<Appointment, AppointmentError>;

    /// Validates required fields, stamps `status = pending` and
    /// `createdAt = now`, and writes. No slot-conflict check is performed.
    async fn insert(&self, record: NewAppointment) -> Result<Appointment, AppointmentError>;

    /// Write a new status value. `NotFound` when the record no longer
    /// exists.
    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentError>;
}

/// REST adapter over the hosted store's `appointments` and `users`
/// collections.
pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseAppointmentStore {
    pub fn new(supabase: SupabaseClient, auth_token: Option<String>) -> Self {
        Self {
            supabase,
            auth_token,
        }
    }

    /// Build the adapter straight from environment configuration. The auth
    /// token is the viewer's session token, when one is available.
    pub fn from_config(config: &AppConfig, auth_token: Option<String>) -> Self {
        Self::new(SupabaseClient::new(config), auth_token)
    }

    fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn list_practitioners(&self) -> Result<Vec<Practitioner>, AppointmentError> {
        debug!("Fetching practitioner directory");

        let path = "/rest/v1/users?role=eq.doctor&select=id,name,specialization,license";
        let practitioners: Vec<Practitioner> = self
            .supabase
            .request(Method::GET, path, self.token(), None)
            .await?;

        Ok(practitioners)
    }

    async fn list_for_viewer(
        &self,
        role: ViewerRole,
        viewer_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let filter_column = match role {
            ViewerRole::Doctor => "doctorId",
            ViewerRole::Patient => "patientId",
        };
        let path = format!(
            "/rest/v1/appointments?{}=eq.{}&select=*",
            filter_column, viewer_id
        );

        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        Ok(appointments)
    }

    async fn fetch(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}&select=*", id);
        let mut result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        if result.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        Ok(result.remove(0))
    }

    async fn insert(&self, record: NewAppointment) -> Result<Appointment, AppointmentError> {
        record.validate()?;

        debug!(
            "Creating appointment for patient {} with doctor {}",
            record.patient_id, record.doctor_id
        );

        let body = json!({
            "patientId": record.patient_id,
            "patientName": record.patient_name,
            "doctorId": record.doctor_id,
            "doctorName": record.doctor_name,
            "date": record.date,
            "time": record.time,
            "reason": record.reason,
            "status": AppointmentStatus::Pending,
            "createdAt": Utc::now(),
        });

        let mut result: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                self.token(),
                Some(body),
                Some(Self::representation_headers()),
            )
            .await?;

        if result.is_empty() {
            return Err(AppointmentError::Store(
                "appointment insert returned no record".to_string(),
            ));
        }

        Ok(result.remove(0))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let body = json!({ "status": status });

        // return=representation so a vanished record shows up as zero rows
        let updated: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                self.token(),
                Some(body),
                Some(Self::representation_headers()),
            )
            .await?;

        if updated.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        Ok(())
    }
}
