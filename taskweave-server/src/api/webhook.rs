//! Webhook intake handler.
//!
//! Rejection ladder, evaluated against the raw body before any rule runs:
//! unparseable JSON is a 400; a non-object payload, a missing or unknown
//! `webhook_id`, and a missing or mismatching `x-signature` are all 403.
//! Everything past authentication is acknowledged with `200 "ok"`: the
//! webhook provider has no feedback channel, so automation failures are an
//! observability concern, not a caller-visible error.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use taskweave_core::event::WebhookEvent;
use taskweave_core::rules::route;
use taskweave_sdk::objects::WebhookPayload;
use taskweave_sdk::signature::{SIGNATURE_HEADER, verify_signature};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Reasons a delivery is rejected before rule evaluation.
#[derive(Debug, thiserror::Error)]
pub enum WebhookRejection {
    #[error("invalid json")]
    InvalidJson,
    #[error("payload is not an object")]
    NotAnObject,
    #[error("missing webhook_id")]
    MissingChannelId,
    #[error("unknown webhook channel")]
    UnknownChannel,
    #[error("missing {SIGNATURE_HEADER} header")]
    MissingSignature,
    #[error("signature verification failed")]
    BadSignature,
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = match self {
            WebhookRejection::InvalidJson => StatusCode::BAD_REQUEST,
            WebhookRejection::NotAnObject
            | WebhookRejection::MissingChannelId
            | WebhookRejection::UnknownChannel
            | WebhookRejection::MissingSignature
            | WebhookRejection::BadSignature => StatusCode::FORBIDDEN,
        };
        (status, self.to_string()).into_response()
    }
}

/// `POST {webhook_route}`: authenticate and dispatch one delivery.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match accept(&state, &headers, &body).await {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(rejection) => {
            warn!(error = %rejection, "rejected webhook delivery");
            rejection.into_response()
        }
    }
}

async fn accept(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<(), WebhookRejection> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| WebhookRejection::InvalidJson)?;
    if !value.is_object() {
        return Err(WebhookRejection::NotAnObject);
    }
    let channel_id = value
        .get("webhook_id")
        .and_then(Value::as_str)
        .ok_or(WebhookRejection::MissingChannelId)?;
    let channel = state
        .config
        .channel(channel_id)
        .ok_or(WebhookRejection::UnknownChannel)?;

    // Config validation guarantees secrets are all-or-none across channels;
    // a secretless channel means the whole deployment runs unsigned.
    if let Some(secret) = &channel.secret {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .ok_or(WebhookRejection::MissingSignature)?
            .to_str()
            .map_err(|_| WebhookRejection::BadSignature)?;
        if !verify_signature(body, provided, secret.as_bytes()) {
            return Err(WebhookRejection::BadSignature);
        }
    } else {
        debug!(channel = channel_id, "accepting unsigned delivery");
    }

    let payload: WebhookPayload = match serde_json::from_value(value) {
        Ok(payload) => payload,
        Err(error) => {
            debug!(%error, "unroutable payload shape, acknowledging");
            return Ok(());
        }
    };
    let Some(event) = WebhookEvent::from_payload(payload) else {
        debug!("event type not handled, acknowledging");
        return Ok(());
    };

    // Dispatch runs to completion before the 200 goes out; per-write
    // failures are absorbed inside the rules.
    match route(
        &event,
        &state.config,
        state.gateway.as_ref(),
        OffsetDateTime::now_utc(),
    )
    .await
    {
        Ok(outcome) => {
            info!(task_id = %event.task_id, event = %event.kind, ?outcome, "processed delivery");
        }
        Err(error) => {
            error!(task_id = %event.task_id, event = %event.kind, %error, "failed to fetch task");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taskweave_core::config::{
        AutomationConfig, ChannelConfig, FieldIds, ShoppingConfig, TypeIds,
    };
    use taskweave_sdk::gateway::{GatewayError, RecordGateway};
    use taskweave_sdk::objects::Task;
    use taskweave_sdk::signature::sign_body;
    use tower::ServiceExt;

    /// Gateway stub: no tasks exist, writes always succeed.
    #[derive(Default)]
    struct StubGateway {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl RecordGateway for StubGateway {
        async fn get_task(&self, _task_id: &str) -> Result<Option<Task>, GatewayError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
        async fn update_status(&self, _: &str, _: &str) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn update_due_date(&self, _: &str, _: Option<i64>) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn set_date_field(&self, _: &str, _: &str, _: i64) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn clear_field(&self, _: &str, _: &str) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn add_to_list(&self, _: &str, _: &str) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn remove_from_list(&self, _: &str, _: &str) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    fn config(secret: Option<&str>) -> AutomationConfig {
        AutomationConfig {
            channels: vec![ChannelConfig {
                id: "wh-1".into(),
                secret: secret.map(str::to_owned),
            }],
            types: TypeIds {
                event: "type-event".into(),
                log: "type-log".into(),
                meeting: "type-meeting".into(),
            },
            fields: FieldIds {
                start_time: "f-start".into(),
                end_time: "f-end".into(),
                relevance_date: "f-rel".into(),
                relevance_num: "f-rel-num".into(),
                relevance_unit: "f-rel-unit".into(),
                pre_meeting_tasks: "f-deps".into(),
                logged_at: "f-logged".into(),
            },
            shopping: ShoppingConfig {
                list_id: "l-shopping".into(),
                purchase_tag: "buy".into(),
            },
        }
    }

    fn router(secret: Option<&str>) -> axum::Router {
        let state = AppState::new(config(secret), Arc::new(StubGateway::default()));
        build_router(state, "/webhook")
    }

    fn post(body: &[u8], signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/webhook");
        if let Some(sig) = signature {
            builder = builder.header(SIGNATURE_HEADER, sig);
        }
        builder.body(Body::from(body.to_vec())).unwrap()
    }

    #[tokio::test]
    async fn unparseable_json_is_400() {
        let resp = router(Some("s"))
            .oneshot(post(b"{not json", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_object_payload_is_403() {
        let resp = router(Some("s"))
            .oneshot(post(b"[1,2,3]", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_channel_id_is_403() {
        let resp = router(Some("s"))
            .oneshot(post(br#"{"event":"taskCreated"}"#, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_channel_is_403() {
        let body = br#"{"event":"taskCreated","webhook_id":"wh-9","task_id":"t1"}"#;
        let sig = sign_body(body, b"s");
        let resp = router(Some("s")).oneshot(post(body, Some(&sig))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_signature_is_403() {
        let body = br#"{"event":"taskCreated","webhook_id":"wh-1","task_id":"t1"}"#;
        let resp = router(Some("s")).oneshot(post(body, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn bad_signature_is_403() {
        let body = br#"{"event":"taskCreated","webhook_id":"wh-1","task_id":"t1"}"#;
        let sig = sign_body(body, b"wrong-secret");
        let resp = router(Some("s")).oneshot(post(body, Some(&sig))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn valid_delivery_is_200_even_when_task_is_missing() {
        let body = br#"{"event":"taskCreated","webhook_id":"wh-1","task_id":"t1"}"#;
        let sig = sign_body(body, b"s");
        let resp = router(Some("s")).oneshot(post(body, Some(&sig))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unhandled_event_type_is_still_200() {
        let body = br#"{"event":"goalCreated","webhook_id":"wh-1","task_id":"t1"}"#;
        let sig = sign_body(body, b"s");
        let resp = router(Some("s")).oneshot(post(body, Some(&sig))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unsigned_mode_accepts_without_header() {
        let body = br#"{"event":"taskCreated","webhook_id":"wh-1","task_id":"t1"}"#;
        let resp = router(None).oneshot(post(body, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_check_is_open() {
        let resp = router(Some("s"))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
