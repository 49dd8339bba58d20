//! Application state shared across all request handlers.

use std::sync::Arc;
use taskweave_core::config::AutomationConfig;
use taskweave_sdk::gateway::RecordGateway;

/// Application state shared across all request handlers.
///
/// Cloneable and cheap to pass around (everything is behind Arc). The
/// configuration is immutable after boot.
#[derive(Clone)]
pub struct AppState {
    /// Validated automation configuration, loaded once at startup.
    pub config: Arc<AutomationConfig>,
    /// Gateway to the remote task store.
    pub gateway: Arc<dyn RecordGateway>,
}

impl AppState {
    pub fn new(config: AutomationConfig, gateway: Arc<dyn RecordGateway>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }
}
