//! Shared test infrastructure for the integration tests.
//!
//! - `StubBackend::start()` runs a throwaway DPR service on a random local
//!   port with whatever routes the test configures.
//! - `client_for()` / `unreachable_client()` build `ApiClient`s against it.
//! - `feedback_json()` builds records in the backend's wire format.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpServer, web};
use serde_json::{Value, json};

use dpr_portal::config::RemoteConfig;
use dpr_portal::remote::ApiClient;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const CIVILIAN_ID: &str = "civ-1";
pub const CIVILIAN_EMAIL: &str = "civilian@example.com";
pub const ORG_EMAIL: &str = "org@example.com";
pub const TEST_PASSWORD: &str = "password123";

// ============================================================================
// STUB BACKEND
// ============================================================================

pub struct StubBackend {
    pub base_url: String,
}

impl StubBackend {
    /// Start a single-worker server with the routes set up by `routes`.
    /// Must run inside an actix system (`#[actix_rt::test]`).
    pub fn start<F>(routes: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Stub backend has no address");
        let server = HttpServer::new(move || App::new().configure(routes.clone()))
            .workers(1)
            .disable_signals()
            .listen(listener)
            .expect("Failed to listen")
            .run();
        actix_rt::spawn(server);
        Self {
            base_url: format!("http://{addr}"),
        }
    }

    pub fn client(&self) -> ApiClient {
        client_for(&self.base_url)
    }
}

pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&RemoteConfig::new(base_url)).expect("Failed to build client")
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_client() -> ApiClient {
    client_for("http://127.0.0.1:1")
}

/// Log of requests a stub handler saw, shared with the test body.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().expect("recorder poisoned").push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("recorder poisoned").clone()
    }
}

// ============================================================================
// WIRE FIXTURES
// ============================================================================

pub fn feedback_json(id: &str, likes: u32, liked_by: &[&str]) -> Value {
    json!({
        "id": id,
        "dpr_id": format!("dpr-{id}"),
        "project_title": format!("Project {id}"),
        "civilian_id": "author-1",
        "civilian_name": "Asha Author",
        "content": format!("Feedback {id}"),
        "submitted_at": "2025-10-01T10:30:00Z",
        "likes_count": likes,
        "dislikes_count": 0,
        "likes": liked_by,
        "dislikes": []
    })
}
