//! Transient user-visible notifications.
//!
//! Every surfaced message is also traced by the caller; this is only the
//! user-facing half of the feedback path.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Destination for transient notifications (toast in the shell,
/// a collecting fake in tests).
pub trait NotifySink: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);
}
