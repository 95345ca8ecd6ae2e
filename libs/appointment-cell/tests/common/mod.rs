#![allow(dead_code)] // not every test binary uses every helper

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use appointment_cell::models::{
    Appointment, AppointmentError, AppointmentStatus, NewAppointment, Practitioner,
};
use appointment_cell::store::AppointmentStore;
use shared_models::ViewerRole;

/// In-memory stand-in for the hosted appointment collection.
pub struct InMemoryStore {
    pub appointments: Mutex<Vec<Appointment>>,
    pub practitioners: Vec<Practitioner>,
    /// Number of set_status writes actually accepted.
    pub status_writes: AtomicUsize,
    /// Ids whose status writes should fail with a store error.
    pub failing_ids: Mutex<HashSet<Uuid>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(Vec::new()),
            practitioners: vec![Practitioner {
                id: "doc-1".to_string(),
                name: "Asha Rao".to_string(),
                specialization: "General Medicine".to_string(),
                license: "MED-1001".to_string(),
            }],
            status_writes: AtomicUsize::new(0),
            failing_ids: Mutex::new(HashSet::new()),
        }
    }

    pub fn seed(&self, appointment: Appointment) -> Uuid {
        let id = appointment.id;
        self.appointments.lock().unwrap().push(appointment);
        id
    }

    pub fn fail_status_writes_for(&self, id: Uuid) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    pub fn status_of(&self, id: Uuid) -> Option<AppointmentStatus> {
        self.appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.status)
    }

    pub fn write_count(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn list_practitioners(&self) -> Result<Vec<Practitioner>, AppointmentError> {
        Ok(self.practitioners.clone())
    }

    async fn list_for_viewer(
        &self,
        role: ViewerRole,
        viewer_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.lock().unwrap();
        Ok(appointments
            .iter()
            .filter(|a| match role {
                ViewerRole::Doctor => a.doctor_id == viewer_id,
                ViewerRole::Patient => a.patient_id == viewer_id,
            })
            .cloned()
            .collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(AppointmentError::NotFound)
    }

    async fn insert(&self, record: NewAppointment) -> Result<Appointment, AppointmentError> {
        record.validate()?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: record.patient_id,
            patient_name: record.patient_name,
            doctor_id: record.doctor_id,
            doctor_name: record.doctor_name,
            date: record.date,
            time: record.time,
            reason: record.reason,
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        };
        self.appointments.lock().unwrap().push(appointment.clone());
        Ok(appointment)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if self.failing_ids.lock().unwrap().contains(&id) {
            return Err(AppointmentError::Store("write refused".to_string()));
        }

        let mut appointments = self.appointments.lock().unwrap();
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppointmentError::NotFound)?;

        appointment.status = status;
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Build an appointment for doctor `doc-1` / patient `pat-1` at the given
/// slot and status.
pub fn appointment_at(date: NaiveDate, time: NaiveTime, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id: "pat-1".to_string(),
        patient_name: "Ravi Kumar".to_string(),
        doctor_id: "doc-1".to_string(),
        doctor_name: "Asha Rao".to_string(),
        date,
        time,
        reason: "Recurring headaches".to_string(),
        status,
        created_at: Utc::now(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
