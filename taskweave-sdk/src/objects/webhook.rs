//! Inbound webhook payload shapes.
//!
//! One payload is constructed per delivery, consumed once, and discarded.
//! `before`/`after` stay as raw JSON values; their interpretation depends on
//! the field that changed (millis for dates, tag arrays for tag updates,
//! id lists for relationship fields).

use serde::Deserialize;
use serde_json::Value;

/// The body of one webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Event type string, e.g. `taskCreated`, `taskUpdated`, `taskTagUpdated`.
    pub event: String,
    /// Id of the webhook channel that produced this delivery.
    pub webhook_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task: Option<TaskRef>,
    #[serde(default)]
    pub history_items: Vec<HistoryItem>,
}

/// Nested task reference some event shapes use instead of `task_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRef {
    pub id: String,
}

/// One field change recorded in a delivery's history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    pub field: String,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
    #[serde(default)]
    pub custom_field: Option<CustomFieldRef>,
}

/// Reference to the custom field a history item touched.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldRef {
    pub id: String,
}

impl WebhookPayload {
    /// The subject task id, from `task_id` or the nested `task.id`.
    pub fn task_id(&self) -> Option<&str> {
        self.task_id
            .as_deref()
            .or(self.task.as_ref().map(|t| t.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_update_payload() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "event": "taskUpdated",
            "webhook_id": "wh-1",
            "task_id": "t1",
            "history_items": [
                {"field": "due_date", "before": "1000", "after": "2000"},
                {"field": "relevance", "after": 3, "custom_field": {"id": "f-num"}}
            ]
        }))
        .unwrap();
        assert_eq!(payload.task_id(), Some("t1"));
        assert_eq!(payload.history_items.len(), 2);
        assert_eq!(
            payload.history_items[1].custom_field.as_ref().map(|f| f.id.as_str()),
            Some("f-num")
        );
    }

    #[test]
    fn nested_task_id_fallback() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "event": "taskCreated",
            "webhook_id": "wh-1",
            "task": {"id": "t9"}
        }))
        .unwrap();
        assert_eq!(payload.task_id(), Some("t9"));
        assert!(payload.history_items.is_empty());
    }

    #[test]
    fn missing_task_id_is_none() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "event": "taskCreated",
            "webhook_id": "wh-1"
        }))
        .unwrap();
        assert_eq!(payload.task_id(), None);
    }
}
