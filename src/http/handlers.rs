//! Request handlers for the email routes.
//!
//! Response envelopes follow a fixed shape: `{status, message, ...}` with
//! `200` for success (including partially failed batches), `400` for
//! validation failures, `404` when no recipients resolve, and `500` for
//! storage or transport failures. A batch is never reported as failed
//! merely because some of its sends failed.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::address::Address;
use crate::booking::group_bookings;
use crate::recipient::{RecipientClass, Resolver};
use crate::template;

use super::AppState;

type ApiResponse = (StatusCode, Json<Value>);

/// Body for `POST /emails/send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub client_name: String,
    pub client_email: String,
    pub recipient_email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub cc: Option<Vec<String>>,
}

/// Body for `POST /emails/broadcast`.
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub subject: String,
    pub message: String,
    pub recipient_type: RecipientClass,
}

fn bad_request() -> ApiResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "error", "message": "Missing required fields"})),
    )
}

fn not_found(message: &str) -> ApiResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": "error", "message": message})),
    )
}

fn database_error(detail: &str) -> ApiResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "message": format!("Database error: {}", detail)})),
    )
}

/// Send an individual email to one explicit recipient.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(req)) = payload else {
        return bad_request();
    };

    let html = template::render_direct_message(&format!("<p>{}</p>", req.message));
    let reply_to = Address::with_name(&req.client_name, &req.client_email);
    let cc = req
        .cc
        .unwrap_or_default()
        .into_iter()
        .map(Address::new)
        .collect();

    match state
        .dispatcher
        .send_direct(
            Address::new(&req.recipient_email),
            &req.subject,
            html,
            Some(reply_to),
            cc,
        )
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({"status": "success", "message": "Email sent successfully"})),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Failed to send email",
                "error": err.to_string(),
            })),
        ),
    }
}

/// Broadcast one message to a recipient class.
pub async fn broadcast(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(req)) = payload else {
        return bad_request();
    };

    let candidates = match state.store.recipients(req.recipient_type).await {
        Ok(rows) => rows,
        Err(err) => return database_error(err.detail()),
    };

    let resolver = Resolver::new(&state.cipher);
    let recipients = resolver.resolve(candidates);
    if recipients.is_empty() {
        return not_found("No recipients found");
    }

    let fragment = format!("<p>{}</p>", req.message);
    let report = state
        .dispatcher
        .broadcast(&recipients, &req.subject, &fragment)
        .await;

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": format!(
                "Broadcast complete. {}/{} emails sent successfully.",
                report.sent(),
                report.total()
            ),
            "results": report.results,
        })),
    )
}

/// Send booking reminders for everything starting in the next 24 hours.
pub async fn reminders(State(state): State<Arc<AppState>>) -> ApiResponse {
    let now = Utc::now();
    let until = now + Duration::hours(24);

    let rows = match state.store.bookings_in_window(now, until).await {
        Ok(rows) => rows,
        Err(err) => return database_error(err.detail()),
    };
    if rows.is_empty() {
        return not_found("No upcoming bookings found");
    }

    let resolver = Resolver::new(&state.cipher);
    let groups = group_bookings(&resolver, rows);
    if groups.is_empty() {
        return not_found("No recipients found");
    }

    let report = state.dispatcher.remind(&groups).await;

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "messages_sent": report.sent(),
            "total": report.total(),
            "details": report.results,
        })),
    )
}
