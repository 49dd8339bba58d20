//! Pre-meeting task cascades.
//!
//! A meeting record carries a custom field listing its preparation tasks.
//! Two cascades keep their due dates in step with the meeting:
//!
//! * due-date change: every dependent is re-evaluated against a strict
//!   two-tier rule (exact match always follows the meeting, otherwise
//!   earlier-wins / fill-empty);
//! * dependent-list change: newly linked tasks inherit the meeting's due
//!   date when theirs is unset or later.
//!
//! The decision logic is pure; the orchestration fans writes out
//! concurrently and treats each dependent independently: one failure never
//! blocks the siblings.

use std::collections::HashSet;

use futures_util::future::join_all;
use taskweave_sdk::gateway::RecordGateway;
use taskweave_sdk::objects::Task;
use taskweave_sdk::objects::task::id_list;
use taskweave_sdk::objects::timestamp::parse_millis_i64;
use tracing::{debug, warn};

use super::{RoutingOutcome, log_write};
use crate::config::AutomationConfig;
use crate::event::FieldChange;

/// A due-date write decided by the cascade rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWrite {
    Set(i64),
    Clear,
}

/// Decide whether a dependent's due date follows a meeting due-date change.
///
/// Tier 1: a dependent whose due date exactly equals the meeting's previous
/// due date (including both unset) always takes the new value, even when
/// that clears it. Tier 2 applies only when tier 1 did not match and the
/// new date is set: fill an empty due date, or pull in one the new date is
/// strictly earlier than.
pub fn premeeting_update(
    dep_due: Option<i64>,
    previous_due: Option<i64>,
    new_due: Option<i64>,
) -> Option<DueWrite> {
    if dep_due == previous_due {
        return Some(match new_due {
            Some(ms) => DueWrite::Set(ms),
            None => DueWrite::Clear,
        });
    }
    let new_ms = new_due?;
    match dep_due {
        None => Some(DueWrite::Set(new_ms)),
        Some(current) if new_ms < current => Some(DueWrite::Set(new_ms)),
        Some(_) => None,
    }
}

/// Decide the initial due date for a task newly linked to a meeting:
/// inherit the meeting's due date when the task has none or a strictly
/// later one.
pub fn linked_init(dep_due: Option<i64>, meeting_due: i64) -> Option<i64> {
    match dep_due {
        None => Some(meeting_due),
        Some(current) if current > meeting_due => Some(meeting_due),
        Some(_) => None,
    }
}

/// Cascade A: the meeting's due date changed.
pub(super) async fn due_date_changed(
    meeting: &Task,
    change: &FieldChange,
    config: &AutomationConfig,
    gateway: &dyn RecordGateway,
) -> RoutingOutcome {
    let previous_due = change.before.as_ref().and_then(parse_millis_i64);
    let new_due = change.after.as_ref().and_then(parse_millis_i64);
    let dep_ids = meeting
        .custom_value(&config.fields.pre_meeting_tasks)
        .map(id_list)
        .unwrap_or_default();

    debug!(
        meeting = %meeting.id,
        dependents = dep_ids.len(),
        ?previous_due,
        ?new_due,
        "running pre-meeting due-date cascade"
    );

    let updates = dep_ids.iter().map(|dep_id| async move {
        let dep = match gateway.get_task(dep_id).await {
            Ok(Some(dep)) => dep,
            Ok(None) => {
                warn!(task_id = %dep_id, "dependent task not found");
                return false;
            }
            Err(error) => {
                warn!(task_id = %dep_id, error = %error, "failed to fetch dependent");
                return false;
            }
        };
        match premeeting_update(dep.due_date_ms(), previous_due, new_due) {
            Some(DueWrite::Set(ms)) => log_write(
                dep_id,
                "cascade due date",
                gateway.update_due_date(dep_id, Some(ms)).await,
            ),
            Some(DueWrite::Clear) => log_write(
                dep_id,
                "cascade clear due date",
                gateway.update_due_date(dep_id, None).await,
            ),
            None => false,
        }
    });

    let updated = join_all(updates).await.into_iter().filter(|ok| *ok).count();
    RoutingOutcome::MeetingDueCascaded { updated }
}

/// Cascade B: entries were added to the meeting's dependent-task list.
pub(super) async fn dependents_linked(
    meeting: &Task,
    change: &FieldChange,
    gateway: &dyn RecordGateway,
) -> RoutingOutcome {
    let Some(meeting_due) = meeting.due_date_ms() else {
        // Nothing to inherit.
        return RoutingOutcome::DependentsInitialized { updated: 0 };
    };

    let before: HashSet<String> = change
        .before
        .as_ref()
        .map(id_list)
        .unwrap_or_default()
        .into_iter()
        .collect();
    let added: Vec<String> = change
        .after
        .as_ref()
        .map(id_list)
        .unwrap_or_default()
        .into_iter()
        .filter(|id| !before.contains(id))
        .collect();

    let updates = added.iter().map(|dep_id| async move {
        let dep = match gateway.get_task(dep_id).await {
            Ok(Some(dep)) => dep,
            Ok(None) => {
                warn!(task_id = %dep_id, "linked task not found");
                return false;
            }
            Err(error) => {
                warn!(task_id = %dep_id, error = %error, "failed to fetch linked task");
                return false;
            }
        };
        match linked_init(dep.due_date_ms(), meeting_due) {
            Some(ms) => log_write(
                dep_id,
                "init linked due date",
                gateway.update_due_date(dep_id, Some(ms)).await,
            ),
            None => false,
        }
    });

    let updated = join_all(updates).await.into_iter().filter(|ok| *ok).count();
    RoutingOutcome::DependentsInitialized { updated }
}
