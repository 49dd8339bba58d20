//! Timestamp stamping for newly created log records.

use taskweave_sdk::gateway::RecordGateway;
use taskweave_sdk::objects::Task;
use taskweave_sdk::objects::timestamp::to_millis;
use time::OffsetDateTime;

use super::{RoutingOutcome, log_write};
use crate::config::AutomationConfig;

pub(super) async fn stamp(
    task: &Task,
    config: &AutomationConfig,
    gateway: &dyn RecordGateway,
    now: OffsetDateTime,
) -> RoutingOutcome {
    let result = gateway
        .set_date_field(&task.id, &config.fields.logged_at, to_millis(now))
        .await;
    log_write(&task.id, "stamp logged-at", result);
    RoutingOutcome::LogStamped
}
