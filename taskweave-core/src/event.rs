//! Inbound event model for the rule engine.
//!
//! Events are ephemeral: constructed once per webhook delivery, routed,
//! and discarded. They carry identifiers and raw field changes; handlers
//! fetch current state from the record gateway rather than trusting the
//! delivery payload.

use serde_json::Value;
use taskweave_sdk::objects::WebhookPayload;

/// Classified webhook event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TaskCreated,
    TaskUpdated,
    TaskTagUpdated,
}

impl EventKind {
    /// Parse the wire event string. `None` for event types the engine does
    /// not react to (expected, not an error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "taskCreated" => Some(EventKind::TaskCreated),
            "taskUpdated" => Some(EventKind::TaskUpdated),
            "taskTagUpdated" => Some(EventKind::TaskTagUpdated),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::TaskCreated => "taskCreated",
            EventKind::TaskUpdated => "taskUpdated",
            EventKind::TaskTagUpdated => "taskTagUpdated",
        };
        f.write_str(s)
    }
}

/// One field change from the delivery history.
#[derive(Debug, Clone)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    /// Set when the change touched a custom field.
    pub custom_field_id: Option<String>,
}

impl FieldChange {
    fn non_null(value: Option<Value>) -> Option<Value> {
        value.filter(|v| !v.is_null())
    }
}

/// One inbound notification, classified and ready for routing.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub kind: EventKind,
    pub task_id: String,
    pub channel_id: String,
    /// Field changes in delivery order.
    pub history: Vec<FieldChange>,
}

impl WebhookEvent {
    /// Build an event from a parsed payload.
    ///
    /// Returns `None` when the event type is not one the engine handles or
    /// the payload names no task; the caller logs and moves on.
    pub fn from_payload(payload: WebhookPayload) -> Option<Self> {
        let kind = EventKind::parse(&payload.event)?;
        let task_id = payload.task_id()?.to_owned();
        let history = payload
            .history_items
            .into_iter()
            .map(|item| FieldChange {
                field: item.field,
                before: FieldChange::non_null(item.before),
                after: FieldChange::non_null(item.after),
                custom_field_id: item.custom_field.map(|f| f.id),
            })
            .collect();
        Some(Self {
            kind,
            task_id,
            channel_id: payload.webhook_id,
            history,
        })
    }

    /// First history change for a named (non-custom) field.
    pub fn change_for_field(&self, name: &str) -> Option<&FieldChange> {
        self.history
            .iter()
            .find(|c| c.field == name && c.custom_field_id.is_none())
    }

    /// First history change for a custom field id.
    pub fn change_for_custom_field(&self, field_id: &str) -> Option<&FieldChange> {
        self.history
            .iter()
            .find(|c| c.custom_field_id.as_deref() == Some(field_id))
    }
}
