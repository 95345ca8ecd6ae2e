// libs/appointment-cell/src/services/buckets.rs
use chrono::NaiveDateTime;

use crate::models::{Appointment, AppointmentStatus};

/// The three display partitions derived from status and slot time.
#[derive(Debug, Clone, Default)]
pub struct AppointmentBuckets {
    /// Approved appointments whose slot has not yet passed, soonest first.
    pub upcoming: Vec<Appointment>,
    /// Pending requests whose slot has not yet passed, soonest first.
    pub pending: Vec<Appointment>,
    /// Everything concluded or past-dated, most recent slot first.
    pub history: Vec<Appointment>,
}

impl AppointmentBuckets {
    pub fn total(&self) -> usize {
        self.upcoming.len() + self.pending.len() + self.history.len()
    }
}

/// Partition a viewer's appointment set for display at wall-clock `now`.
///
/// The buckets are disjoint and exhaustive. History is the fallback: any
/// past-dated record lands there even when its status has not yet been
/// reconciled to completed, so a stale approved record is never shown as
/// upcoming.
pub fn partition(appointments: Vec<Appointment>, now: NaiveDateTime) -> AppointmentBuckets {
    let mut buckets = AppointmentBuckets::default();

    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Approved if !appointment.is_past(now) => {
                buckets.upcoming.push(appointment)
            }
            AppointmentStatus::Pending if !appointment.is_past(now) => {
                buckets.pending.push(appointment)
            }
            _ => buckets.history.push(appointment),
        }
    }

    buckets.upcoming.sort_by_key(Appointment::scheduled_at);
    buckets.pending.sort_by_key(Appointment::scheduled_at);
    buckets
        .history
        .sort_by_key(|appointment| std::cmp::Reverse(appointment.scheduled_at()));

    buckets
}
