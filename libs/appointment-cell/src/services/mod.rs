pub mod booking;
pub mod buckets;
pub mod lifecycle;
pub mod reconcile;
pub mod subscription;

pub use booking::BookingService;
pub use buckets::{partition, AppointmentBuckets};
pub use lifecycle::AppointmentLifecycleService;
pub use reconcile::reconcile;
pub use subscription::AppointmentFeed;
