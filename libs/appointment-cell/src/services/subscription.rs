// libs/appointment-cell/src/services/subscription.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use shared_models::ViewerRole;

use crate::models::{Appointment, AppointmentStatus};
use crate::services::reconcile::reconcile;
use crate::store::AppointmentStore;

/// Live view of one viewer's appointment set.
///
/// A background task polls the store on a fixed interval, runs the
/// auto-completion pass, and publishes the full snapshot on a watch
/// channel. Each notification is a full replace of the previous snapshot,
/// never an incremental patch. A failed poll is logged and the previous
/// snapshot stays current.
pub struct AppointmentFeed {
    receiver: watch::Receiver<Vec<Appointment>>,
    task: JoinHandle<()>,
}

impl AppointmentFeed {
    pub fn spawn<S>(
        store: Arc<S>,
        role: ViewerRole,
        viewer_id: String,
        interval: Duration,
    ) -> Self
    where
        S: AppointmentStore + 'static,
    {
        let (tx, rx) = watch::channel(Vec::new());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;

                let mut snapshot = match store.list_for_viewer(role, &viewer_id).await {
                    Ok(snapshot) => snapshot,
                    Err(err) => {
                        warn!("Appointment feed poll failed for {} {}: {}", role, viewer_id, err);
                        continue;
                    }
                };

                let now = Utc::now().naive_utc();
                let reconciled = reconcile(store.as_ref(), &snapshot, now).await;
                if !reconciled.is_empty() {
                    debug!("Reconciled {} appointment(s) for {} {}", reconciled.len(), role, viewer_id);
                    for appointment in snapshot.iter_mut() {
                        if reconciled.contains(&appointment.id) {
                            appointment.status = AppointmentStatus::Completed;
                        }
                    }
                }

                // the feed itself holds a receiver, so the channel stays
                // open for as long as this task can run
                let _ = tx.send(snapshot);
            }
        });

        Self { receiver: rx, task }
    }

    /// Snapshot channel. The initial value is an empty set until the first
    /// poll lands; use `changed()` to wait for a real snapshot.
    pub fn snapshots(&self) -> watch::Receiver<Vec<Appointment>> {
        self.receiver.clone()
    }

    /// Stop the polling task. Idempotent; dropping the feed also cancels.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for AppointmentFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}
