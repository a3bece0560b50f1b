//! Public contact and newsletter form endpoint.
//!
//! A single `POST /contact-submit` endpoint serves both flows, selected by
//! the `action` query parameter (`newsletter`, anything else means contact).
//! The response contract is fixed down to the message strings; clients match
//! on them. Any failure outside the explicit validation chain collapses to
//! `400 {"error": "Invalid request"}` so no internal detail leaks.
//!
//! The rate-limit check runs before body validation in both flows, and the
//! attempt is recorded only after validation passes, so malformed requests
//! do not consume quota.

use std::sync::LazyLock;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use nfluential_core::Email;

use crate::db::{FormsRepository, RateLimitRepository, RepositoryError, SubscribeOutcome};
use crate::middleware::client_ip;
use crate::models::{ContactSubject, NewContactSubmission};
use crate::state::AppState;

/// Endpoint names as recorded in the attempts log.
const CONTACT_ENDPOINT: &str = "contact";
const NEWSLETTER_ENDPOINT: &str = "newsletter";

/// Per-IP thresholds: 5 requests per trailing 60 minutes, per endpoint.
const MAX_REQUESTS_PER_WINDOW: i64 = 5;
const WINDOW_MINUTES: i64 = 60;

/// Field limits.
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;
const MAX_MESSAGE_LENGTH: usize = 2000;

/// The form's arithmetic works out to 11; a submission that answers it
/// correctly is treated as automated and rejected, while any other 1-3
/// digit answer passes.
const REJECTED_CAPTCHA_ANSWER: &str = "11";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid literal")
});

static CAPTCHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}$").expect("captcha pattern is a valid literal"));

/// Query parameters for the form endpoint.
#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}

/// Failures outside the explicit validation chain. These all collapse to a
/// generic 400 at the top level.
#[derive(Debug, thiserror::Error)]
enum FlowError {
    #[error("malformed body: {0}")]
    Body(#[from] serde_json::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

type FlowResult = Result<Response, FlowError>;

/// Handle a form submission.
///
/// POST /contact-submit?action={contact|newsletter}
#[instrument(skip(state, headers, body))]
pub async fn submit(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let ip = client_ip(&headers);

    let result = if query.action.as_deref() == Some("newsletter") {
        newsletter_flow(&state, &ip, &body).await
    } else {
        contact_flow(&state, &ip, &body).await
    };

    result.unwrap_or_else(|e| {
        warn!(error = %e, "form submission failed outside the validation chain");
        error_response(StatusCode::BAD_REQUEST, "Invalid request")
    })
}

/// Preflight for the form endpoint; CORS headers come from the middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

// =============================================================================
// Flows
// =============================================================================

async fn newsletter_flow(state: &AppState, ip: &str, body: &Bytes) -> FlowResult {
    if !rate_limit_allows(state, ip, NEWSLETTER_ENDPOINT).await {
        return Ok(too_many_requests());
    }

    let payload: Value = serde_json::from_slice(body)?;
    let Some(email) = validate_email(payload.get("email")) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid email"));
    };

    record_attempt(state, ip, NEWSLETTER_ENDPOINT).await;

    let outcome = FormsRepository::new(state.pool()).subscribe(&email).await?;
    let response_body = match outcome {
        SubscribeOutcome::Subscribed => json!({ "success": true }),
        // The subscriber's intent is already satisfied: report the duplicate
        // as a benign outcome with a success status.
        SubscribeOutcome::AlreadySubscribed => json!({ "error": "already_subscribed" }),
    };

    Ok((StatusCode::OK, Json(response_body)).into_response())
}

async fn contact_flow(state: &AppState, ip: &str, body: &Bytes) -> FlowResult {
    if !rate_limit_allows(state, ip, CONTACT_ENDPOINT).await {
        return Ok(too_many_requests());
    }

    let payload: Value = serde_json::from_slice(body)?;

    // Validate each field independently, short-circuiting on the first
    // failure, in a fixed order.
    let Some(name) = validate_name(payload.get("name")) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid name"));
    };
    let Some(email) = validate_email(payload.get("email")) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid email"));
    };
    let Some(subject) = payload
        .get("subject")
        .and_then(Value::as_str)
        .and_then(ContactSubject::parse)
    else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid subject"));
    };
    let Some(message) = validate_message(payload.get("message")) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid message"));
    };
    let Some(captcha_answer) = validate_captcha(payload.get("captchaAnswer")) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, "Invalid captcha"));
    };

    record_attempt(state, ip, CONTACT_ENDPOINT).await;

    let submission = NewContactSubmission {
        name,
        email,
        subject,
        message,
        captcha_answer,
    };

    match FormsRepository::new(state.pool())
        .insert_submission(&submission)
        .await
    {
        Ok(_) => Ok((StatusCode::OK, Json(json!({ "success": true }))).into_response()),
        Err(e) => {
            warn!(error = %e, "failed to persist contact submission");
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to submit",
            ))
        }
    }
}

// =============================================================================
// Rate limiting
// =============================================================================

async fn rate_limit_allows(state: &AppState, ip: &str, endpoint: &str) -> bool {
    match RateLimitRepository::new(state.pool())
        .check(ip, endpoint, MAX_REQUESTS_PER_WINDOW, WINDOW_MINUTES)
        .await
    {
        Ok(allowed) => allowed,
        Err(e) => {
            // A store outage must not lock the forms; fail open.
            warn!(endpoint, error = %e, "rate-limit check failed; allowing request");
            true
        }
    }
}

async fn record_attempt(state: &AppState, ip: &str, endpoint: &str) {
    if let Err(e) = RateLimitRepository::new(state.pool())
        .record(ip, endpoint)
        .await
    {
        warn!(endpoint, error = %e, "failed to record rate-limit attempt");
    }
}

// =============================================================================
// Field validation
// =============================================================================

fn validate_name(value: Option<&Value>) -> Option<String> {
    let name = value?.as_str()?;
    if name.trim().is_empty() || name.len() > MAX_NAME_LENGTH {
        return None;
    }
    Some(name.trim().to_string())
}

fn validate_email(value: Option<&Value>) -> Option<Email> {
    let email = value?.as_str()?;
    if !EMAIL_RE.is_match(email) || email.len() > MAX_EMAIL_LENGTH {
        return None;
    }
    // The regex gate matched; parsing canonicalizes (trim + lowercase).
    Email::parse(email).ok()
}

fn validate_message(value: Option<&Value>) -> Option<String> {
    let message = value?.as_str()?;
    if message.trim().is_empty() || message.len() > MAX_MESSAGE_LENGTH {
        return None;
    }
    Some(message.trim().to_string())
}

fn validate_captcha(value: Option<&Value>) -> Option<String> {
    let answer = value?.as_str()?;
    if !CAPTCHA_RE.is_match(answer) || answer == REJECTED_CAPTCHA_ANSWER {
        return None;
    }
    Some(answer.to_string())
}

// =============================================================================
// Responses
// =============================================================================

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn too_many_requests() -> Response {
    error_response(
        StatusCode::TOO_MANY_REQUESTS,
        "Too many requests. Please try again later.",
    )
}
