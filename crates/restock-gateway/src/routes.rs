//! Route handlers for the gateway.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use crate::server::AppState;
use crate::update::INVENTORY_JOB;

/// Liveness probe.
pub async fn root() -> &'static str {
    "LINE inventory bot is running."
}

/// Status endpoint.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "jobs": state.scheduler.list(),
        "webhook_signature": if state.line.can_verify() { "enabled" } else { "disabled" },
    }))
}

/// The platform's webhook verification probe expects a bare 200.
pub async fn webhook_verify() -> StatusCode {
    StatusCode::OK
}

/// Inbound webhook: verify, parse, dispatch.
///
/// Always answers the platform with 200 once the signature checks out —
/// per-event problems are captured in the dispatch outcomes, and a
/// non-2xx would only make the platform redeliver the same batch.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<serde_json::Value>) {
    if state.line.can_verify() {
        let signature = headers
            .get("x-line-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !state.line.verify_signature(body.as_bytes(), signature) {
            tracing::warn!("webhook rejected: bad or missing signature");
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "status": "invalid signature" })),
            );
        }
    }

    let events = match restock_channels::events::parse_events(&body) {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("webhook error: {e}");
            return (StatusCode::OK, Json(serde_json::json!({ "status": "error" })));
        }
    };

    let outcomes = state.dispatcher.dispatch_batch(&events).await;
    tracing::debug!(events = events.len(), ?outcomes, "webhook batch processed");
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Manual trigger for one inventory update.
pub async fn trigger_update(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.updater.run().await {
        Ok(report) if report.all_succeeded() => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Inventory update sent",
                "report": report,
            })),
        ),
        Ok(report) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": format!("{} of {} targets failed", report.failed, report.per_target.len()),
                "report": report,
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        ),
    }
}

/// Start (or restart) the recurring inventory update.
pub async fn schedule_start(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.start_inventory_schedule() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Weekly inventory update scheduled",
                "jobs": state.scheduler.list(),
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        ),
    }
}

/// Stop the recurring inventory update.
pub async fn schedule_stop(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let cancelled = state.scheduler.cancel(INVENTORY_JOB);
    Json(serde_json::json!({
        "success": true,
        "cancelled": cancelled,
        "jobs": state.scheduler.list(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TestMessageRequest {
    #[serde(rename = "groupId")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Push an arbitrary message to one target — handy while wiring up a new
/// group.
pub async fn test_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TestMessageRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(group_id) = request.group_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "groupId required" })),
        );
    };

    match state.messenger.push(&group_id, &request.message).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct GetIdRequest {
    #[serde(rename = "groupId")]
    pub group_id: Option<String>,
}

/// Echo a chat's ID back into it, for confirming a group is reachable.
pub async fn test_get_id(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetIdRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(group_id) = request.group_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "groupId required" })),
        );
    };

    let text = format!("This group's ID is: {group_id}");
    match state.messenger.push(&group_id, &text).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "groupId": group_id })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
