//! Common test utilities for integration tests
//!
//! Provides webhook payload fixtures and a router backed by the in-memory
//! store, shared across the integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use issue_mirror::{
    GitHubUserRef, InMemoryDocumentStore, IssueData, IssueMirrorService, RepositoryRef,
    SecretScrubber, ServerConfig, WebhookHttpServer,
};
use serde_json::{json, Value};

/// Issue URL used by the default fixtures.
pub const ISSUE_URL: &str = "https://github.com/o/r/issues/1";

/// An `issues` webhook body for `action`.
pub fn issues_payload(action: &str, number: u32, login: &str, body: Option<&str>) -> Value {
    json!({
        "action": action,
        "issue": {
            "number": number,
            "title": format!("Bug {number}"),
            "html_url": format!("https://github.com/o/r/issues/{number}"),
            "body": body,
            "user": {
                "login": login,
                "html_url": format!("https://github.com/{login}"),
            },
        },
        "repository": {
            "name": "r",
            "full_name": "o/r",
            "html_url": "https://github.com/o/r",
        },
    })
}

/// The payload of GitHub's "alice opened Bug X in o/r" example.
pub fn bug_x_payload() -> Value {
    let mut payload = issues_payload("opened", 1, "alice", None);
    payload["issue"]["title"] = json!("Bug X");
    payload
}

/// Pipeline input equivalent to `issues_payload("opened", number, login, None)`.
pub fn issue_data(number: u32, login: &str) -> IssueData {
    IssueData {
        title: format!("Bug {number}"),
        url: format!("https://github.com/o/r/issues/{number}"),
        description: None,
        user: GitHubUserRef {
            login: login.to_string(),
            html_url: format!("https://github.com/{login}"),
        },
        repository: RepositoryRef {
            name: "r".to_string(),
            html_url: "https://github.com/o/r".to_string(),
        },
    }
}

/// A webhook router over a fresh in-memory store.
pub fn test_router(webhook_secret: Option<&str>) -> (Arc<InMemoryDocumentStore>, Router) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let service = IssueMirrorService::new(store.clone());
    let config = ServerConfig {
        webhook_secret: webhook_secret.map(str::to_string),
        ..ServerConfig::default()
    };
    let scrubber = SecretScrubber::try_new().expect("scrubber patterns compile");
    let router = WebhookHttpServer::new(service, config, scrubber).router();
    (store, router)
}

/// A POST to the webhook path carrying `body` as an `event` delivery.
pub fn delivery(event: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-github-event", event)
        .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Read a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}
