//! Automation configuration types.
//!
//! These represent the validated runtime configuration the rule engine
//! needs: webhook channels, task-type ids, custom-field ids, and the
//! shopping-list mapping. Loading and validation live in the server crate;
//! once constructed the configuration is immutable for the life of the
//! process.

/// One configured webhook subscription.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Channel id, matched against the delivery's `webhook_id`.
    pub id: String,
    /// Shared HMAC secret. `None` participates in the degraded unsigned
    /// mode when no channel in the whole configuration carries a secret.
    pub secret: Option<String>,
}

/// Task-type ids that discriminate routing.
#[derive(Debug, Clone)]
pub struct TypeIds {
    pub event: String,
    pub log: String,
    pub meeting: String,
}

/// Custom-field ids consumed and written by the rules.
#[derive(Debug, Clone)]
pub struct FieldIds {
    pub start_time: String,
    pub end_time: String,
    pub relevance_date: String,
    pub relevance_num: String,
    pub relevance_unit: String,
    pub pre_meeting_tasks: String,
    pub logged_at: String,
}

/// Shopping-list sync configuration.
#[derive(Debug, Clone)]
pub struct ShoppingConfig {
    /// List that mirrors purchase-tagged tasks.
    pub list_id: String,
    /// Tag name that marks a task as a purchase.
    pub purchase_tag: String,
}

/// Immutable configuration for the whole automation engine, constructed
/// once at boot and shared read-only.
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    pub channels: Vec<ChannelConfig>,
    pub types: TypeIds,
    pub fields: FieldIds,
    pub shopping: ShoppingConfig,
}

impl AutomationConfig {
    /// Look up a channel by id.
    pub fn channel(&self, id: &str) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Whether signature verification is active.
    ///
    /// When no channel carries a secret the engine runs in a deliberate
    /// degraded-security mode and accepts unsigned deliveries.
    pub fn signing_enabled(&self) -> bool {
        self.channels.iter().any(|c| c.secret.is_some())
    }
}
