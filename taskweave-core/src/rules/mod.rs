//! Rule routing and shared handler plumbing.
//!
//! One webhook event enters [`route`], the current task snapshot is fetched
//! exactly once, and the first matching rule in the fixed priority order
//! fires. Unmatched events are normal and produce no side effect.
//!
//! All remote writes inside handlers are best-effort: failures are logged
//! with the task id and operation and never abort sibling writes or the
//! request.

mod event_schedule;
mod meeting_cascade;
mod record_log;
mod shopping_list;
mod task_status;

pub use meeting_cascade::{DueWrite, linked_init, premeeting_update};

use serde_json::Value;
use taskweave_sdk::gateway::{GatewayError, RecordGateway};
use taskweave_sdk::objects::Task;
use taskweave_sdk::objects::timestamp::parse_millis;
use time::OffsetDateTime;
use tracing::warn;

use crate::config::AutomationConfig;
use crate::event::{EventKind, WebhookEvent};

/// What the router did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingOutcome {
    /// Event schedule fields were recomputed and written.
    EventScheduled,
    /// A log record got its timestamp stamp.
    LogStamped,
    /// Task status was recomputed; `changed` is false when the status was
    /// already correct or the write was skipped.
    TaskStatusSet { changed: bool },
    /// Pre-meeting due-date cascade ran; `updated` dependents written.
    MeetingDueCascaded { updated: usize },
    /// Newly linked dependents were initialized.
    DependentsInitialized { updated: usize },
    /// Shopping-list membership was synced.
    ShoppingListSynced { changed: bool },
    /// The subject task no longer exists.
    TaskMissing,
    /// No rule matched. Expected for most deliveries.
    NoMatch,
}

/// Route one event: fetch the task snapshot once, then dispatch to the
/// first matching rule.
///
/// The only error that propagates is a failed fetch of the anchor snapshot;
/// everything past that point is logged and absorbed.
pub async fn route(
    event: &WebhookEvent,
    config: &AutomationConfig,
    gateway: &dyn RecordGateway,
    now: OffsetDateTime,
) -> Result<RoutingOutcome, GatewayError> {
    let Some(task) = gateway.get_task(&event.task_id).await? else {
        warn!(task_id = %event.task_id, event = %event.kind, "task not found, skipping");
        return Ok(RoutingOutcome::TaskMissing);
    };

    let outcome = match event.kind {
        EventKind::TaskCreated => {
            if task.is_type(&config.types.event) && has_schedule_source(&task, config) {
                event_schedule::apply(&task, config, gateway, now).await
            } else if task.is_type(&config.types.log) {
                record_log::stamp(&task, config, gateway, now).await
            } else {
                task_status::apply(&task, gateway, now).await
            }
        }
        EventKind::TaskUpdated => {
            if task.is_type(&config.types.event) && schedule_field_changed(event, config) {
                event_schedule::apply(&task, config, gateway, now).await
            } else if task.is_type(&config.types.meeting)
                && let Some(change) = event.change_for_field("due_date")
            {
                meeting_cascade::due_date_changed(&task, change, config, gateway).await
            } else if task.is_type(&config.types.meeting)
                && let Some(change) =
                    event.change_for_custom_field(&config.fields.pre_meeting_tasks)
            {
                meeting_cascade::dependents_linked(&task, change, gateway).await
            } else if event.change_for_field("start_date").is_some()
                || event.change_for_field("due_date").is_some()
            {
                task_status::apply(&task, gateway, now).await
            } else {
                RoutingOutcome::NoMatch
            }
        }
        EventKind::TaskTagUpdated => shopping_list::sync(event, &task, config, gateway).await,
    };

    Ok(outcome)
}

/// Created-event relevance guard: any schedule source field present.
fn has_schedule_source(task: &Task, config: &AutomationConfig) -> bool {
    task.start_date_raw().is_some()
        || task.due_date_raw().is_some()
        || task.custom_value(&config.fields.relevance_num).is_some()
        || task.custom_value(&config.fields.relevance_unit).is_some()
}

/// Updated-event relevance guard: a schedule source field is in the history.
fn schedule_field_changed(event: &WebhookEvent, config: &AutomationConfig) -> bool {
    event.change_for_field("start_date").is_some()
        || event.change_for_field("due_date").is_some()
        || event
            .change_for_custom_field(&config.fields.relevance_num)
            .is_some()
        || event
            .change_for_custom_field(&config.fields.relevance_unit)
            .is_some()
}

/// Parse a raw date value, falling back to `now` (with a warning) when the
/// value is present but unparseable. Absent stays absent.
pub(crate) fn parse_date_value(
    raw: Option<&Value>,
    now: OffsetDateTime,
    task_id: &str,
    field: &str,
) -> Option<OffsetDateTime> {
    let value = raw?;
    match parse_millis(value) {
        Some(ts) => Some(ts),
        None => {
            warn!(task_id, field, raw = %value, "unparseable timestamp, falling back to now");
            Some(now)
        }
    }
}

/// Log a write failure and report whether the write landed.
pub(crate) fn log_write(task_id: &str, op: &str, result: Result<(), GatewayError>) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            warn!(task_id, op, error = %error, "remote update failed");
            false
        }
    }
}
