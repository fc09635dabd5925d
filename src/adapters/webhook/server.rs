//! GitHub webhook HTTP server.
//!
//! Receives deliveries on a single POST route, acknowledges everything that
//! is not an opened issue, and runs opened issues through the mirroring
//! pipeline before answering.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::MirrorError;
use crate::domain::models::{PageId, ServerConfig};
use crate::infrastructure::logging::SecretScrubber;
use crate::services::IssueMirrorService;

use super::payload::{classify, WebhookDisposition};
use super::signature::{self, SIGNATURE_HEADER};

/// Header naming the event type.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the delivery GUID.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Body of every pipeline failure; the cause is only logged.
pub const PIPELINE_FAILURE_MESSAGE: &str = "Failed to add issue to Notion";

/// Shared state for the webhook server.
pub struct WebhookState {
    service: IssueMirrorService,
    webhook_secret: Option<String>,
    scrubber: SecretScrubber,
}

impl WebhookState {
    /// An empty secret is treated as no secret.
    pub fn new(
        service: IssueMirrorService,
        webhook_secret: Option<String>,
        scrubber: SecretScrubber,
    ) -> Self {
        Self {
            service,
            webhook_secret: webhook_secret.filter(|s| !s.is_empty()),
            scrubber,
        }
    }
}

/// Webhook HTTP server.
pub struct WebhookHttpServer {
    state: Arc<WebhookState>,
    config: ServerConfig,
}

impl WebhookHttpServer {
    /// Create a server running `service` for deliveries on `config.path`.
    pub fn new(service: IssueMirrorService, config: ServerConfig, scrubber: SecretScrubber) -> Self {
        let state = WebhookState::new(service, config.webhook_secret.clone(), scrubber);
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Build the router with all endpoints.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route(
                &self.config.path,
                post(receive_webhook).fallback(method_not_allowed),
            )
            .route("/health", get(health_check))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.router();

        info!(%addr, path = %self.config.path, "Webhook HTTP server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Success response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MirroredResponse {
    success: bool,
    page_id: PageId,
}

/// Acknowledgement of an ignored delivery.
#[derive(Debug, Serialize)]
struct ReceivedResponse {
    received: bool,
}

/// Error response structure.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Receive one webhook delivery.
async fn receive_webhook(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let delivery = header_str(&headers, DELIVERY_HEADER)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
    let event = header_str(&headers, EVENT_HEADER).unwrap_or("-").to_string();
    let span = info_span!("webhook", %delivery, %event);

    handle_delivery(&state, &headers, &body)
        .instrument(span)
        .await
}

async fn handle_delivery(state: &WebhookState, headers: &HeaderMap, body: &[u8]) -> Response {
    if let Some(secret) = state.webhook_secret.as_deref() {
        if !signature::verify(secret, body, header_str(headers, SIGNATURE_HEADER)) {
            warn!("rejected delivery with missing or invalid signature");
            return error_response(StatusCode::UNAUTHORIZED, "Invalid signature");
        }
    }

    let issue = match classify(header_str(headers, EVENT_HEADER), body) {
        Ok(WebhookDisposition::Ignored) => {
            info!("delivery ignored");
            return (StatusCode::OK, Json(ReceivedResponse { received: true })).into_response();
        }
        Ok(WebhookDisposition::Mirror(issue)) => issue,
        Err(err) => {
            warn!(error = %state.scrubber.scrub(&err.to_string()), "malformed issue payload");
            return error_response(StatusCode::BAD_REQUEST, "Malformed issue payload");
        }
    };

    match state.service.submit_issue(&issue).await {
        Ok(page_id) => (
            StatusCode::OK,
            Json(MirroredResponse {
                success: true,
                page_id,
            }),
        )
            .into_response(),
        Err(err) => {
            let stage = err.stage().map_or("-", |s| s.as_str());
            let kind = match &err {
                MirrorError::DuplicateIssue(_) => "duplicate_issue",
                MirrorError::MalformedPayload(_) => "malformed_payload",
                MirrorError::Store { .. } => "store_error",
            };
            error!(
                stage,
                kind,
                issue_url = %issue.url,
                error = %state.scrubber.scrub(&err.to_string()),
                "Error creating issue in Notion"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PIPELINE_FAILURE_MESSAGE)
        }
    }
}

/// Reject non-POST requests to the webhook path.
async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Liveness probe.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
    })
}
