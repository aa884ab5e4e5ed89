//! Task status value object
//!
//! Represents the current state of a task in its lifecycle.

use serde::{Deserialize, Serialize};

/// Task status indicating its current state
///
/// Based on iCalendar VTODO STATUS property (RFC 5545). Serialized with the
/// iCalendar spelling so API consumers see the same values as the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    /// Task needs action (not yet started)
    #[default]
    #[serde(rename = "NEEDS-ACTION")]
    NeedsAction,
    /// Task is in progress
    #[serde(rename = "IN-PROCESS")]
    InProgress,
    /// Task is completed
    #[serde(rename = "COMPLETED")]
    Completed,
    /// Task is cancelled
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl TaskStatus {
    /// Convert to iCalendar STATUS value
    #[must_use]
    pub const fn to_ical(&self) -> &'static str {
        match self {
            Self::NeedsAction => "NEEDS-ACTION",
            Self::InProgress => "IN-PROCESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse from iCalendar STATUS value, falling back to `NeedsAction`
    #[must_use]
    pub fn from_ical(status: &str) -> Self {
        Self::parse_ical(status).unwrap_or_default()
    }

    /// Parse one of the four VTODO status values (case-insensitive)
    ///
    /// Returns `None` for anything else, so callers can ignore or reject it.
    #[must_use]
    pub fn parse_ical(status: &str) -> Option<Self> {
        match status.trim().to_uppercase().as_str() {
            "NEEDS-ACTION" => Some(Self::NeedsAction),
            "IN-PROCESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Status implied by a completion percentage
    ///
    /// 100 means completed, 0 means needs action, anything in between is in
    /// process. Values above 100 count as 100.
    #[must_use]
    pub const fn for_percent(percent: u8) -> Self {
        match percent {
            0 => Self::NeedsAction,
            1..=99 => Self::InProgress,
            _ => Self::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_needs_action() {
        assert_eq!(TaskStatus::default(), TaskStatus::NeedsAction);
    }

    #[test]
    fn ical_roundtrip() {
        for status in [
            TaskStatus::NeedsAction,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            let ical = status.to_ical();
            let parsed = TaskStatus::from_ical(ical);
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn parse_ical_is_case_insensitive() {
        assert_eq!(
            TaskStatus::parse_ical("completed"),
            Some(TaskStatus::Completed)
        );
        assert_eq!(
            TaskStatus::parse_ical(" In-Process "),
            Some(TaskStatus::InProgress)
        );
    }

    #[test]
    fn parse_ical_rejects_unknown_values() {
        assert_eq!(TaskStatus::parse_ical("IN-PROGRESS"), None);
        assert_eq!(TaskStatus::parse_ical("done"), None);
        assert_eq!(TaskStatus::parse_ical(""), None);
    }

    #[test]
    fn from_ical_falls_back_to_needs_action() {
        assert_eq!(TaskStatus::from_ical("whatever"), TaskStatus::NeedsAction);
    }

    #[test]
    fn for_percent_boundaries() {
        assert_eq!(TaskStatus::for_percent(0), TaskStatus::NeedsAction);
        assert_eq!(TaskStatus::for_percent(1), TaskStatus::InProgress);
        assert_eq!(TaskStatus::for_percent(99), TaskStatus::InProgress);
        assert_eq!(TaskStatus::for_percent(100), TaskStatus::Completed);
        assert_eq!(TaskStatus::for_percent(250), TaskStatus::Completed);
    }

    #[test]
    fn serialization_uses_ical_spelling() {
        let status = TaskStatus::InProgress;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#""IN-PROCESS""#);

        let parsed: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }

    #[test]
    fn deserialization_accepts_only_ical_values() {
        for alias in [r#""done""#, r#""pending""#, r#""Needs Action""#] {
            assert!(serde_json::from_str::<TaskStatus>(alias).is_err());
        }
    }
}
