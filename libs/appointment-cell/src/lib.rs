pub mod manager;
pub mod models;
pub mod services;
pub mod store;

// Re-export the public surface for external consumers
pub use manager::AppointmentLifecycleManager;
pub use models::*;
pub use services::*;
pub use store::{AppointmentStore, SupabaseAppointmentStore};
