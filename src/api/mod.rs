// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    http::{HeaderName, Request, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::Span;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::session::SESSION_COOKIE_NAME,
    error::ApiError,
    models::{Credentials, NewNote, Note, NoteUpdate, UserResponse},
    state::AppState,
};

pub mod health;
pub mod notes;
pub mod sessions;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState, sessions: SessionManagerLayer<MemoryStore>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/users", post(users::create_user))
        .route("/sessions", post(sessions::create_session))
        .route("/private/whoami", get(users::whoami))
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/healthz", get(health::liveness))
        .route("/readyz", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(sessions)
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(RequestSpan)
                        .on_response(LogResponse),
                )
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
}

/// Run blocking storage work (password hashing, disk IO) off the async
/// workers.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        ApiError::internal("internal server error")
    })
}

/// One span per request, tagged with the request id.
#[derive(Clone, Copy)]
struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Log completed requests at a level matching the status class.
#[derive(Clone, Copy)]
struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status().as_u16();
        let latency_ms = latency.as_millis() as u64;
        if response.status().is_server_error() {
            tracing::error!(status, latency_ms, "Request failed");
        } else if response.status().is_client_error() {
            tracing::warn!(status, latency_ms, "Request rejected");
        } else {
            tracing::info!(status, latency_ms, "Request completed");
        }
    }
}

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::whoami,
        sessions::create_session,
        notes::create_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Credentials,
            UserResponse,
            Note,
            NewNote,
            NoteUpdate,
            health::HealthResponse,
            health::ReadyResponse,
            health::ReadyChecks
        )
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "Users", description = "Registration and identity"),
        (name = "Sessions", description = "Login"),
        (name = "Notes", description = "Per-user note management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
