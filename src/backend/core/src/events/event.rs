//! Lifecycle events recorded against ink units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::InkError;
use crate::validation::{
    validate_field, validate_optional, MaxLength, Required, Validate, ValidationErrors,
    ValidationResult,
};

// =============================================================================
// Event IDs
// =============================================================================

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(EventId)
            .map_err(|_| InkError::invalid_format("event id", s))
    }
}

// =============================================================================
// Event Kinds
// =============================================================================

/// What happened to the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Install,
    Refill,
    DrumReplace,
    Dispose,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Install,
        EventKind::Refill,
        EventKind::DrumReplace,
        EventKind::Dispose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Install => "INSTALL",
            EventKind::Refill => "REFILL",
            EventKind::DrumReplace => "DRUM_REPLACE",
            EventKind::Dispose => "DISPOSE",
        }
    }

    /// Whether recording this kind rewrites the unit's status.
    pub fn changes_status(&self) -> bool {
        matches!(self, EventKind::Install | EventKind::Dispose)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                InkError::validation(format!("Unknown event kind: {}", s))
                    .with_context("allowed", EventKind::ALL.map(|k| k.as_str()))
            })
    }
}

// =============================================================================
// Events
// =============================================================================

/// A stored lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub unit_id: String,
    pub printer_id: String,
    #[serde(rename = "event_kind")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LifecycleEvent {
    /// Stamp a request with a fresh id and the current server time.
    pub fn record(new: NewEvent) -> Self {
        Self::at(Utc::now(), new)
    }

    /// Stamp a request with a fresh id and an explicit time.
    pub fn at(timestamp: DateTime<Utc>, new: NewEvent) -> Self {
        Self {
            id: EventId::new(),
            timestamp,
            unit_id: new.unit_id,
            printer_id: new.printer_id,
            kind: new.kind,
            detail: new.detail.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Body of `POST /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub unit_id: String,
    pub printer_id: String,
    #[serde(rename = "event_kind")]
    pub kind: EventKind,
    #[serde(default)]
    pub detail: Option<String>,
}

impl NewEvent {
    pub fn new(unit_id: impl Into<String>, printer_id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            unit_id: unit_id.into(),
            printer_id: printer_id.into(),
            kind,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl Validate for NewEvent {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        validate_field("unit_id", &self.unit_id)
            .rule(Required)
            .rule(MaxLength(64))
            .collect_into(&mut errors);
        validate_field("printer_id", &self.printer_id)
            .rule(Required)
            .rule(MaxLength(64))
            .collect_into(&mut errors);
        validate_optional(
            "detail",
            self.detail.as_deref(),
            |f| f.rule(MaxLength(1000)),
            &mut errors,
        );

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventKind::DrumReplace).unwrap(),
            "\"DRUM_REPLACE\""
        );
        assert_eq!("REFILL".parse::<EventKind>().unwrap(), EventKind::Refill);
        assert!("RECYCLE".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_only_install_and_dispose_change_status() {
        assert!(EventKind::Install.changes_status());
        assert!(EventKind::Dispose.changes_status());
        assert!(!EventKind::Refill.changes_status());
        assert!(!EventKind::DrumReplace.changes_status());
    }

    #[test]
    fn test_new_event_from_json() {
        let new: NewEvent = serde_json::from_str(
            r#"{"unit_id":"HP80A-STOCK-001","printer_id":"VP-HANOI-01","event_kind":"INSTALL"}"#,
        )
        .unwrap();
        assert_eq!(new.kind, EventKind::Install);
        assert!(new.detail.is_none());
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_new_event_requires_printer() {
        let new = NewEvent::new("HP80A-STOCK-001", "", EventKind::Refill);
        let errors = new.validate().unwrap_err();
        assert!(errors.has_field("printer_id"));
        assert!(!errors.has_field("unit_id"));
    }

    #[test]
    fn test_record_stamps_id_and_drops_blank_detail() {
        let a = LifecycleEvent::record(NewEvent::new("U", "P", EventKind::Refill).with_detail(" "));
        let b = LifecycleEvent::record(NewEvent::new("U", "P", EventKind::Refill));
        assert_ne!(a.id, b.id);
        assert!(a.detail.is_none());
        assert!(a.timestamp <= b.timestamp);
    }

    #[test]
    fn test_event_id_parse() {
        let id = EventId::new();
        assert_eq!(id.to_string().parse::<EventId>().unwrap(), id);

        let err = "not-a-uuid".parse::<EventId>().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidFormat);
        assert_eq!(err.user_message(), "Invalid event id: not-a-uuid");
    }
}
