use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the authenticated principal. Threaded explicitly into every
/// appointment-cell call; the core never infers it from ambient state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    Patient,
    Doctor,
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerRole::Patient => write!(f, "patient"),
            ViewerRole::Doctor => write!(f, "doctor"),
        }
    }
}

/// The currently authenticated principal, as supplied by the identity
/// provider at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    /// Stable opaque identifier from the identity provider.
    pub id: String,
    /// Best-effort display name; may be absent for fresh accounts.
    pub display_name: Option<String>,
    pub role: ViewerRole,
}

impl Viewer {
    pub fn new(id: impl Into<String>, display_name: Option<String>, role: ViewerRole) -> Self {
        Self {
            id: id.into(),
            display_name,
            role,
        }
    }

    pub fn patient(id: impl Into<String>, display_name: Option<String>) -> Self {
        Self::new(id, display_name, ViewerRole::Patient)
    }

    pub fn doctor(id: impl Into<String>, display_name: Option<String>) -> Self {
        Self::new(id, display_name, ViewerRole::Doctor)
    }

    /// Display name recorded on appointments booked by this viewer.
    pub fn display_name_or_default(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Patient")
            .to_string()
    }
}
