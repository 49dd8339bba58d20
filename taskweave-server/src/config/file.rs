//! TOML configuration file shape.

use serde::Deserialize;
use std::net::SocketAddr;
use url::Url;

/// Root of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub server: ServerSection,
    pub gateway: GatewaySection,
    #[serde(default)]
    pub channels: Vec<ChannelSection>,
    pub types: TypesSection,
    pub fields: FieldsSection,
    pub shopping: ShoppingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    pub listen: SocketAddr,
    /// Route path the webhook provider posts to.
    #[serde(default = "default_webhook_route")]
    pub webhook_route: String,
}

fn default_webhook_route() -> String {
    "/webhook".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySection {
    /// Root URL of the task-service API.
    pub base_url: Url,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSection {
    pub id: String,
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypesSection {
    pub event: String,
    pub log: String,
    pub meeting: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldsSection {
    pub start_time: String,
    pub end_time: String,
    pub relevance_date: String,
    pub relevance_num: String,
    pub relevance_unit: String,
    pub pre_meeting_tasks: String,
    pub logged_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingSection {
    pub list_id: String,
    pub purchase_tag: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"
[server]
listen = "127.0.0.1:8080"

[gateway]
base_url = "https://api.example.com"

[[channels]]
id = "wh-1"
secret = "topsecret"

[types]
event = "type-event"
log = "type-log"
meeting = "type-meeting"

[fields]
start_time = "f-start"
end_time = "f-end"
relevance_date = "f-rel"
relevance_num = "f-rel-num"
relevance_unit = "f-rel-unit"
pre_meeting_tasks = "f-deps"
logged_at = "f-logged"

[shopping]
list_id = "l-shopping"
purchase_tag = "buy"
"#;

    #[test]
    fn test_sample_config_parsing() {
        let config: FileConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        // webhook_route defaults when omitted.
        assert_eq!(config.server.webhook_route, "/webhook");
        assert_eq!(config.channels.len(), 1);
        assert_eq!(config.channels[0].secret.as_deref(), Some("topsecret"));
        assert_eq!(config.types.meeting, "type-meeting");
        assert_eq!(config.shopping.purchase_tag, "buy");
    }

    #[test]
    fn test_secretless_channel_parses() {
        let toml_str = SAMPLE.replace("secret = \"topsecret\"\n", "");
        let config: FileConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.channels[0].secret, None);
    }
}
