//! Shared wire objects for the task-service API and its webhooks.

pub mod status;
pub mod task;
pub mod timestamp;
pub mod webhook;

pub use status::{EventStatus, RelevanceUnit, TaskStatus, WireEnumError};
pub use task::{CustomField, ListRef, StatusField, Tag, Task};
pub use webhook::{CustomFieldRef, HistoryItem, WebhookPayload};
