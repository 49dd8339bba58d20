//! Event schedule derivation.
//!
//! Recomputes every derived schedule field of an event-type task from its
//! current raw fields and writes them out in one concurrent batch. Nothing
//! is patched incrementally; recomputing from scratch keeps stored and true
//! derived state from drifting apart and makes redelivery idempotent.

use serde_json::Value;
use taskweave_sdk::gateway::RecordGateway;
use taskweave_sdk::objects::timestamp::{parse_millis_i64, to_millis};
use taskweave_sdk::objects::{RelevanceUnit, Task};
use time::OffsetDateTime;
use tracing::{debug, warn};

use super::{RoutingOutcome, log_write, parse_date_value};
use crate::config::AutomationConfig;
use crate::derive;

pub(super) async fn apply(
    task: &Task,
    config: &AutomationConfig,
    gateway: &dyn RecordGateway,
    now: OffsetDateTime,
) -> RoutingOutcome {
    let start_date = parse_date_value(task.start_date_raw(), now, &task.id, "start_date");
    let due_date = parse_date_value(task.due_date_raw(), now, &task.id, "due_date");
    let num = task
        .custom_value(&config.fields.relevance_num)
        .and_then(parse_millis_i64);
    let unit = task
        .custom_value(&config.fields.relevance_unit)
        .and_then(Value::as_str)
        .and_then(|s| match s.parse::<RelevanceUnit>() {
            Ok(unit) => Some(unit),
            Err(error) => {
                warn!(task_id = %task.id, error = %error, "ignoring relevance unit");
                None
            }
        });

    let start_time = derive::calculate_start_time(start_date, due_date);
    let end_time = derive::calculate_end_time(due_date);
    let status = derive::calculate_event_status(start_time, end_time, now);
    let relevance = derive::calculate_relevance_date(start_time, end_time, num, unit);

    debug!(
        task_id = %task.id,
        start = ?start_time,
        end = ?end_time,
        status = %status,
        relevance = ?relevance,
        "derived event schedule"
    );

    let fields = &config.fields;
    let write_start = async {
        let result = match start_time {
            Some(ts) => {
                gateway
                    .set_date_field(&task.id, &fields.start_time, to_millis(ts))
                    .await
            }
            None => gateway.clear_field(&task.id, &fields.start_time).await,
        };
        log_write(&task.id, "set start time", result);
    };
    let write_end = async {
        let result = match end_time {
            Some(ts) => {
                gateway
                    .set_date_field(&task.id, &fields.end_time, to_millis(ts))
                    .await
            }
            None => gateway.clear_field(&task.id, &fields.end_time).await,
        };
        log_write(&task.id, "set end time", result);
    };
    let write_status = async {
        let result = gateway.update_status(&task.id, status.as_str()).await;
        log_write(&task.id, "set event status", result);
    };
    let write_relevance = async {
        let result = match relevance {
            Some(ts) => {
                gateway
                    .set_date_field(&task.id, &fields.relevance_date, to_millis(ts))
                    .await
            }
            None => gateway.clear_field(&task.id, &fields.relevance_date).await,
        };
        log_write(&task.id, "set relevance date", result);
    };

    tokio::join!(write_start, write_end, write_status, write_relevance);
    RoutingOutcome::EventScheduled
}
