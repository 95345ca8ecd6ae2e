pub mod identity;

pub use identity::{Viewer, ViewerRole};
