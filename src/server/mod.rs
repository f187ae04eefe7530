//! HTTP front for the pipeline: `POST /users` takes an XML batch, converts it
//! and relays the JSON to the configured collector.

use crate::adapters::http::HttpDelivery;
use crate::core::aggregate::{ValidationErrors, ValidationFailure};
use crate::core::converter::Converter;
use crate::core::etl::{EtlEngine, RunOutcome, RunReport};
use crate::core::pipeline::UsersPipeline;
use crate::utils::error::{ErrorCategory, EtlError};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub type UsersEngine = EtlEngine<UsersPipeline<HttpDelivery>>;

const BEARER_PREFIX: &str = "Bearer ";
const AUTH_REALM: &str = r#"Bearer realm="Access to the API""#;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<UsersEngine>,
    auth_key: Arc<str>,
}

impl AppState {
    pub fn new(converter: Converter, delivery: HttpDelivery, auth_key: &str) -> Self {
        Self {
            engine: Arc::new(EtlEngine::new(UsersPipeline::new(converter, delivery))),
            auth_key: Arc::from(auth_key),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    status: &'static str,
    delivered: usize,
    dropped: &'a [ValidationFailure],
    downstream_status: Option<u16>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    failures: Option<&'a ValidationErrors>,
}

pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route("/users", post(post_users))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "users-etl",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let Some(token) = header_value.strip_prefix(BEARER_PREFIX) else {
        tracing::warn!("Malformed authorization header on {}", request.uri().path());
        return unauthorized();
    };

    if token.trim() != &*state.auth_key {
        tracing::warn!("Invalid bearer token on {}", request.uri().path());
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
    response
}

async fn post_users(State(state): State<AppState>, body: Bytes) -> Response {
    tracing::debug!("Received /users payload: {}", String::from_utf8_lossy(&body));

    match state.engine.run(body.to_vec()).await {
        Ok(report) => summary_response(&report),
        Err(e) => error_response(&e),
    }
}

fn summary_response(report: &RunReport) -> Response {
    let status = match report.outcome {
        RunOutcome::Complete => "complete",
        RunOutcome::Partial => "partial",
    };
    let summary = RunSummary {
        status,
        delivered: report.delivered,
        dropped: report.dropped.as_ref().map(ValidationErrors::failures).unwrap_or(&[]),
        downstream_status: report.receipt.status,
    };
    (StatusCode::OK, Json(summary)).into_response()
}

fn error_response(err: &EtlError) -> Response {
    let status = match err.category() {
        ErrorCategory::Input => StatusCode::BAD_REQUEST,
        ErrorCategory::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCategory::Delivery => StatusCode::BAD_GATEWAY,
        ErrorCategory::Configuration | ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!("Request failed ({}): {}", status, err);

    let failures = match err {
        EtlError::AllRecordsInvalid(errors) => Some(errors),
        _ => None,
    };
    let body = ErrorBody {
        error: err.user_friendly_message(),
        failures,
    };
    (status, Json(body)).into_response()
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
