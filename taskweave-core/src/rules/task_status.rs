//! Date-presence status tracking for plain tasks.

use taskweave_sdk::gateway::RecordGateway;
use taskweave_sdk::objects::{Task, TaskStatus};
use time::OffsetDateTime;
use tracing::{debug, warn};

use super::{RoutingOutcome, log_write, parse_date_value};
use crate::derive;

pub(super) async fn apply(
    task: &Task,
    gateway: &dyn RecordGateway,
    now: OffsetDateTime,
) -> RoutingOutcome {
    // A status outside the tracked set is treated as absent here; only
    // explicit enum construction elsewhere treats it as a hard error.
    let previous = task.status_str().and_then(|s| match s.parse::<TaskStatus>() {
        Ok(status) => Some(status),
        Err(error) => {
            debug!(task_id = %task.id, error = %error, "status outside tracked set");
            None
        }
    });
    let start_date = parse_date_value(task.start_date_raw(), now, &task.id, "start_date");
    let due_date = parse_date_value(task.due_date_raw(), now, &task.id, "due_date");

    match derive::calculate_task_status(start_date, due_date, previous) {
        Ok(next) if Some(next) != previous => {
            let changed = log_write(
                &task.id,
                "update task status",
                gateway.update_status(&task.id, next.as_str()).await,
            );
            RoutingOutcome::TaskStatusSet { changed }
        }
        Ok(_) => RoutingOutcome::TaskStatusSet { changed: false },
        Err(error) => {
            warn!(task_id = %task.id, error = %error, "skipping status write");
            RoutingOutcome::TaskStatusSet { changed: false }
        }
    }
}
