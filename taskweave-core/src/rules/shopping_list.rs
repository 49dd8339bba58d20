//! Purchase-tag → shopping-list membership sync.

use taskweave_sdk::gateway::RecordGateway;
use taskweave_sdk::objects::Task;
use taskweave_sdk::objects::task::tag_names;
use tracing::debug;

use super::{RoutingOutcome, log_write};
use crate::config::AutomationConfig;
use crate::event::WebhookEvent;

pub(super) async fn sync(
    event: &WebhookEvent,
    task: &Task,
    config: &AutomationConfig,
    gateway: &dyn RecordGateway,
) -> RoutingOutcome {
    let Some(change) = event.change_for_field("tag") else {
        return RoutingOutcome::NoMatch;
    };

    let before = change.before.as_ref().map(tag_names).unwrap_or_default();
    let after = change.after.as_ref().map(tag_names).unwrap_or_default();
    let tag = &config.shopping.purchase_tag;
    let was_tagged = before.iter().any(|n| n == tag);
    let is_tagged = after.iter().any(|n| n == tag);

    let list_id = &config.shopping.list_id;
    if is_tagged && !was_tagged {
        if task.in_list(list_id) {
            debug!(task_id = %task.id, "already on shopping list");
            return RoutingOutcome::ShoppingListSynced { changed: false };
        }
        let changed = log_write(
            &task.id,
            "add to shopping list",
            gateway.add_to_list(list_id, &task.id).await,
        );
        RoutingOutcome::ShoppingListSynced { changed }
    } else if was_tagged && !is_tagged {
        if !task.in_list(list_id) {
            debug!(task_id = %task.id, "not on shopping list");
            return RoutingOutcome::ShoppingListSynced { changed: false };
        }
        let changed = log_write(
            &task.id,
            "remove from shopping list",
            gateway.remove_from_list(list_id, &task.id).await,
        );
        RoutingOutcome::ShoppingListSynced { changed }
    } else {
        RoutingOutcome::NoMatch
    }
}
