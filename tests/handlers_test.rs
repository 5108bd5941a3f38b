//! HTTP-level tests for the portal routes, with the DPR service replaced by
//! a stub backend.
//!
//! Covers:
//! - Sign-in pages and redirects for anonymous visitors
//! - CSRF rejection on form posts
//! - Civilian flow: sign in, community feedback tab, voting
//! - Organization flow: dashboard and DPR upload
//! - Role checks on role-specific actions

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use regex::Regex;
use serde_json::{Value, json};

use dpr_portal::config::RemoteConfig;
use dpr_portal::handlers;
use dpr_portal::models::feedback::LoadOutcome;
use dpr_portal::remote::ApiClient;
use dpr_portal::state::AppState;

use common::{CIVILIAN_EMAIL, CIVILIAN_ID, ORG_EMAIL, StubBackend, TEST_PASSWORD, feedback_json};

/// Stub login: knows the civilian and organization test accounts.
async fn stub_login(form: web::Form<HashMap<String, String>>) -> HttpResponse {
    let role = match form.get("username").map(String::as_str) {
        Some(CIVILIAN_EMAIL) => "Civilian",
        Some(ORG_EMAIL) => "Organization",
        _ => return HttpResponse::Unauthorized().json(json!({"detail": "Incorrect email or password"})),
    };
    let user_id = if role == "Civilian" { CIVILIAN_ID } else { "org-1" };
    HttpResponse::Ok().json(json!({
        "access_token": "tok",
        "token_type": "bearer",
        "role": role,
        "user_id": user_id
    }))
}

/// Stub DPR service answering every call the portal makes.
fn full_backend() -> StubBackend {
    StubBackend::start(|cfg| {
        cfg.route("/api/auth/login", web::post().to(stub_login))
        .route("/api/feedback/organization/dashboard", web::get().to(|| async {
            HttpResponse::Ok().json(json!([feedback_json("a", 0, &[]), feedback_json("b", 3, &[])]))
        }))
        .route("/api/feedback/{id}/{direction}", web::post().to(|path: web::Path<(String, String)>| async move {
            let (id, _) = path.into_inner();
            HttpResponse::Ok().json(feedback_json(&id, 1, &[CIVILIAN_ID]))
        }))
        .route("/api/dpr/organization/dashboard", web::get().to(|| async {
            HttpResponse::Ok().json(json!([{
                "id": "d1",
                "file_name": "road.pdf",
                "extracted_data": {"project_title": "Rural Road"}
            }]))
        }))
        .route("/api/dpr/upload_with_ai", web::post().to(|_body: web::Bytes| async {
            HttpResponse::Ok().json(json!({"dpr": {"extracted_data": {"project_title": "Rural Road"}}}))
        }));
    })
}

macro_rules! portal {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data($state.clone())
                .configure(handlers::configure)
                .default_service(web::to(handlers::not_found)),
        )
        .await
    };
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response().cookies().find(|c| c.name() == "id").map(|c| c.into_owned())
}

fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn csrf_from(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).unwrap();
    re.captures(html).expect("page carries a csrf token")[1].to_string()
}

/// Sign in through the login form; yields the signed-in session cookie
/// and its CSRF token.
macro_rules! sign_in {
    ($app:expr, $email:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&resp).expect("login page starts a session");
        let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        let csrf = csrf_from(&html);

        let req = test::TestRequest::post()
            .uri("/login")
            .cookie(cookie)
            .set_form(vec![("email", $email), ("password", TEST_PASSWORD), ("csrf_token", csrf.as_str())])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/dashboard");
        let cookie = session_cookie(&resp).expect("sign-in refreshes the session cookie");
        (cookie, csrf)
    }};
}

// ---------------------------------------------------------------------------
// Anonymous visitors
// ---------------------------------------------------------------------------

#[actix_rt::test]
async fn test_login_page_renders_form() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("DPR Review Portal"));
    assert!(html.contains("action=\"/login\""));
    csrf_from(&html);
}

#[actix_rt::test]
async fn test_dashboard_redirects_anonymous_to_login() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_rt::test]
async fn test_login_without_csrf_token_is_rejected() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(vec![("email", CIVILIAN_EMAIL), ("password", TEST_PASSWORD), ("csrf_token", "forged")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_wrong_password_shows_error() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).unwrap();
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let csrf = csrf_from(&html);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form(vec![("email", "nobody@example.com"), ("password", TEST_PASSWORD), ("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Incorrect email or password"));
}

// ---------------------------------------------------------------------------
// Civilian flow
// ---------------------------------------------------------------------------

#[actix_rt::test]
async fn test_civilian_sees_community_feedback_and_votes() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, csrf) = sign_in!(app, CIVILIAN_EMAIL);

    let req = test::TestRequest::get()
        .uri("/dashboard?tab=all-feedback")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Feedback a"));
    assert!(html.contains("/feedback/b/like"));
    assert_eq!(state.feedback.last_load(), Some(LoadOutcome::Live { count: 2 }));

    let req = test::TestRequest::post()
        .uri("/feedback/a/like")
        .cookie(cookie)
        .set_form(vec![("csrf_token", csrf.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard?tab=all-feedback");

    let a = state.feedback.get("a").expect("a still loaded");
    assert_eq!(a.like_count, 1);
    assert!(a.is_liked_by(CIVILIAN_ID));
    assert_eq!(state.feedback.get("b").unwrap().like_count, 3);
}

#[actix_rt::test]
async fn test_civilian_projects_tab_is_default() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, _) = sign_in!(app, CIVILIAN_EMAIL);

    let req = test::TestRequest::get().uri("/dashboard?tab=bogus").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Primary School Building"));
    assert!(!state.feedback.is_loaded());
}

#[actix_rt::test]
async fn test_feedback_tab_reloads_after_backend_recovers() {
    let list_calls = Arc::new(AtomicUsize::new(0));
    let stub = StubBackend::start({
        let list_calls = list_calls.clone();
        move |cfg| {
            let list_calls = list_calls.clone();
            cfg.route("/api/auth/login", web::post().to(stub_login))
                .route("/api/feedback/organization/dashboard", web::get().to(move || {
                    let call = list_calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if call == 0 {
                            HttpResponse::InternalServerError().finish()
                        } else {
                            HttpResponse::Ok().json(json!([feedback_json("live", 2, &[])]))
                        }
                    }
                }));
        }
    });
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, _) = sign_in!(app, CIVILIAN_EMAIL);

    let req = test::TestRequest::get()
        .uri("/dashboard?tab=all-feedback")
        .cookie(cookie.clone())
        .to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(!html.contains("Feedback live"));
    assert_eq!(state.feedback.last_load(), Some(LoadOutcome::Fallback));

    let req = test::TestRequest::get()
        .uri("/dashboard?tab=all-feedback")
        .cookie(cookie)
        .to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(html.contains("Feedback live"));
    assert_eq!(state.feedback.last_load(), Some(LoadOutcome::Live { count: 1 }));
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
    assert!(state.feedback.get("1").is_none());
}

#[actix_rt::test]
async fn test_civilian_cannot_upload_dpr() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, csrf) = sign_in!(app, CIVILIAN_EMAIL);

    let req = test::TestRequest::post()
        .uri("/dpr/upload")
        .cookie(cookie)
        .insert_header(("X-CSRF-Token", csrf))
        .insert_header(("X-File-Name", "road.pdf"))
        .set_payload("pdf bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Organization flow
// ---------------------------------------------------------------------------

#[actix_rt::test]
async fn test_organization_dashboard_lists_dprs_and_feedback() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, _) = sign_in!(app, ORG_EMAIL);

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Rural Road"));
    assert!(html.contains("road.pdf"));
    assert!(html.contains("Feedback b"));
}

#[actix_rt::test]
async fn test_organization_upload_returns_report() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, csrf) = sign_in!(app, ORG_EMAIL);

    let req = test::TestRequest::post()
        .uri("/dpr/upload")
        .cookie(cookie.clone())
        .insert_header(("X-CSRF-Token", csrf))
        .insert_header(("X-File-Name", "road.pdf"))
        .insert_header(("Content-Type", "application/pdf"))
        .set_payload("pdf bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report["ok"], true);
    assert_eq!(report["project_title"], "Rural Road");

    let req = test::TestRequest::post()
        .uri("/dpr/upload")
        .cookie(cookie)
        .insert_header(("X-CSRF-Token", "forged"))
        .insert_header(("X-File-Name", "road.pdf"))
        .set_payload("pdf bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_organization_upload_decodes_file_name() {
    let stub = full_backend();
    let state = web::Data::new(AppState::with_client("DPR Review Portal", stub.client()));
    let app = portal!(state);
    let (cookie, csrf) = sign_in!(app, ORG_EMAIL);

    let req = test::TestRequest::post()
        .uri("/dpr/upload")
        .cookie(cookie)
        .insert_header(("X-CSRF-Token", csrf))
        .insert_header(("X-File-Name", "%E0%A4%B8%E0%A4%A1%E0%A4%BC%E0%A4%95%20DPR.pdf"))
        .set_payload("pdf bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = test::read_body_json(resp).await;
    let first = report["log"][0].as_str().unwrap_or_default();
    assert!(first.ends_with("Starting upload for: सड़क DPR.pdf"), "{first}");
}

#[actix_rt::test]
async fn test_organization_upload_times_out_at_configured_bound() {
    let stub = StubBackend::start(|cfg| {
        cfg.route("/api/auth/login", web::post().to(stub_login))
            .route("/api/dpr/upload_with_ai", web::post().to(|_body: web::Bytes| async {
                actix_rt::time::sleep(Duration::from_secs(5)).await;
                HttpResponse::Ok().json(json!({}))
            }));
    });
    let client = {
        let mut config = RemoteConfig::new(&stub.base_url);
        config.upload_timeout = Duration::from_millis(300);
        ApiClient::new(&config).expect("client")
    };
    let state = web::Data::new(AppState::with_client("DPR Review Portal", client));
    let app = portal!(state);
    let (cookie, csrf) = sign_in!(app, ORG_EMAIL);

    let req = test::TestRequest::post()
        .uri("/dpr/upload")
        .cookie(cookie)
        .insert_header(("X-CSRF-Token", csrf))
        .insert_header(("X-File-Name", "road.pdf"))
        .set_payload("pdf bytes")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report["ok"], false);
    assert_eq!(
        report["message"],
        "Request timed out. The file might be too large or the processing took too long."
    );
}
