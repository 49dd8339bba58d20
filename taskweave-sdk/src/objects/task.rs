//! Task record snapshot as returned by `GET /task/{id}`.
//!
//! The remote service owns the record; this type is a read-only snapshot.
//! Date fields stay as raw JSON values here because the service is
//! inconsistent about number-vs-string encoding; the typed accessors go
//! through [`timestamp`](super::timestamp) in one place.

use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;

use super::timestamp::{parse_millis, parse_millis_i64};

/// A task record snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: String,
    /// Task-type discriminator ("event", log, meeting, or plain task),
    /// matched against configured type ids.
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub status: Option<StatusField>,
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub due_date: Option<Value>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub list: Option<ListRef>,
    #[serde(default)]
    pub locations: Vec<ListRef>,
}

/// Wrapper the service uses for the status attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusField {
    pub status: String,
}

/// A tag attached to a task.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// Reference to a list a task belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRef {
    pub id: String,
}

/// One custom field entry on a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl Task {
    /// Raw start date, if the field is present and non-null.
    pub fn start_date_raw(&self) -> Option<&Value> {
        self.start_date.as_ref().filter(|v| !v.is_null())
    }

    /// Raw due date, if the field is present and non-null.
    pub fn due_date_raw(&self) -> Option<&Value> {
        self.due_date.as_ref().filter(|v| !v.is_null())
    }

    pub fn start_date(&self) -> Option<OffsetDateTime> {
        self.start_date_raw().and_then(parse_millis)
    }

    pub fn due_date(&self) -> Option<OffsetDateTime> {
        self.due_date_raw().and_then(parse_millis)
    }

    pub fn due_date_ms(&self) -> Option<i64> {
        self.due_date_raw().and_then(parse_millis_i64)
    }

    /// Current status string, if any.
    pub fn status_str(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.status.as_str())
    }

    /// Look up a custom field by id.
    pub fn custom_field(&self, field_id: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.id == field_id)
    }

    /// The non-null value of a custom field, if set.
    pub fn custom_value(&self, field_id: &str) -> Option<&Value> {
        self.custom_field(field_id)
            .and_then(|f| f.value.as_ref())
            .filter(|v| !v.is_null())
    }

    pub fn is_type(&self, type_id: &str) -> bool {
        self.type_id.as_deref() == Some(type_id)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Whether the task belongs to `list_id`, checked against both the
    /// direct list reference and the locations collection (the service may
    /// represent membership either way).
    pub fn in_list(&self, list_id: &str) -> bool {
        self.list.as_ref().is_some_and(|l| l.id == list_id)
            || self.locations.iter().any(|l| l.id == list_id)
    }
}

/// Extract a list of task ids from a custom-field value.
///
/// The service encodes task-relationship fields either as an array of id
/// strings or as an array of objects carrying an `id` key.
pub fn id_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("id").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect()
}

/// Extract tag names from a webhook history value (array of `{name}` objects
/// or plain strings).
pub fn tag_names(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect()
}
