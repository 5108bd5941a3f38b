//! HTTP client for the remote DPR API.
//!
//! One `reqwest::Client` is shared by every call. It keeps a cookie store so
//! requests carry the backend's session cookies, the equivalent of a browser
//! sending credentials with each fetch.

pub mod error;

pub use error::ApiError;

use std::time::Duration;

use reqwest::header::{ACCEPT, ORIGIN};
use reqwest::{Method, RequestBuilder, Response, Url, multipart};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::RemoteConfig;
use crate::models::account::{Account, Credentials, LoginGrant, NewAccount};
use crate::models::diagnostics::{CorsProbe, HealthStatus};
use crate::models::dpr::{DprSummary, DprUpload, UploadResult};
use crate::models::feedback::{FeedbackRecord, FeedbackService, NewFeedback, VoteDirection, VoteRequest};
use error::extract_detail;

pub const FEEDBACK_LIST_PATH: &str = "/api/feedback/organization/dashboard";
pub const FEEDBACK_SUBMIT_PATH: &str = "/api/feedback";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const ORGANIZATION_DPRS_PATH: &str = "/api/dpr/organization/dashboard";
pub const DPR_UPLOAD_PATH: &str = "/api/dpr/upload_with_ai";
pub const HEALTH_PATH: &str = "/api/health";
pub const CORS_TEST_PATH: &str = "/cors-test";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            request_timeout: config.request_timeout,
            upload_timeout: config.upload_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a URL from path segments, percent-encoding each one.
    fn segment_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json")
            .timeout(self.request_timeout)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.request_timeout))?;
        ensure_success(resp).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(builder).await?;
        decode_json(resp, self.request_timeout).await
    }

    /// POST /api/feedback — the reply body is not used.
    pub async fn submit_feedback(&self, feedback: &NewFeedback) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, FEEDBACK_SUBMIT_PATH).json(feedback);
        self.send(builder).await.map(|_| ())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        let builder = self.request(Method::POST, LOGIN_PATH).form(&credentials.form_fields());
        self.send_json(builder).await
    }

    pub async fn signup(&self, account: &NewAccount) -> Result<Account, ApiError> {
        let builder = self.request(Method::POST, SIGNUP_PATH).json(account);
        self.send_json(builder).await
    }

    /// DPRs for the organization dashboard. Documents that do not decode are
    /// skipped rather than failing the whole list.
    pub async fn organization_dprs(&self) -> Result<Vec<DprSummary>, ApiError> {
        let raw: Vec<serde_json::Value> = self.send_json(self.request(Method::GET, ORGANIZATION_DPRS_PATH)).await?;
        let total = raw.len();
        let dprs: Vec<DprSummary> = raw
            .into_iter()
            .filter_map(|value| match DprSummary::from_value(value) {
                Ok(dpr) => Some(dpr),
                Err(e) => {
                    log::warn!("Skipping malformed DPR document: {e}");
                    None
                }
            })
            .collect();
        if dprs.len() < total {
            log::warn!("Decoded {} of {total} DPR documents", dprs.len());
        }
        Ok(dprs)
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.send_json(self.request(Method::GET, HEALTH_PATH)).await
    }

    /// Cross-origin probe: sends `Origin` and reports the CORS headers the
    /// backend answered with.
    pub async fn cors_probe(&self, origin: &str) -> Result<CorsProbe, ApiError> {
        let builder = self.request(Method::GET, CORS_TEST_PATH).header(ORIGIN, origin);
        let resp = self.send(builder).await?;
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let allow_origin = header("access-control-allow-origin");
        let allow_credentials = header("access-control-allow-credentials");
        let body: serde_json::Value = decode_json(resp, self.request_timeout).await?;
        Ok(CorsProbe {
            message: body.get("message").and_then(|m| m.as_str()).unwrap_or_default().to_string(),
            status: body.get("status").and_then(|s| s.as_str()).unwrap_or_default().to_string(),
            allow_origin,
            allow_credentials,
        })
    }

    /// Multipart upload of a DPR file.
    ///
    /// The exchange runs under a child of `cancel` that a timer cancels once
    /// the upload timeout elapses. Cancelling `cancel` reports `Cancelled`,
    /// the timer firing reports `TimedOut`; neither is a status error.
    pub async fn upload_dpr(&self, upload: DprUpload, cancel: &CancellationToken) -> Result<UploadResult, ApiError> {
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("uploaded_by", upload.uploaded_by)
            .text("generate_reports", upload.generate_reports.to_string());

        let builder = self
            .http
            .post(self.url(DPR_UPLOAD_PATH))
            .header(ACCEPT, "application/json")
            .multipart(form);

        let exchange = async {
            let resp = builder
                .send()
                .await
                .map_err(|e| ApiError::from_transport(e, self.upload_timeout))?;
            let resp = ensure_success(resp).await?;
            decode_json::<UploadResult>(resp, self.upload_timeout).await
        };

        let deadline = cancel.child_token();
        let _stop_timer = deadline.clone().drop_guard();
        spawn_deadline(deadline.clone(), self.upload_timeout);

        tokio::select! {
            _ = deadline.cancelled() => {
                if cancel.is_cancelled() {
                    Err(ApiError::Cancelled)
                } else {
                    Err(ApiError::TimedOut(self.upload_timeout))
                }
            }
            result = exchange => result,
        }
    }
}

impl FeedbackService for ApiClient {
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, ApiError> {
        self.send_json(self.request(Method::GET, FEEDBACK_LIST_PATH)).await
    }

    /// POST /api/feedback/{id}/like|dislike. `user_id` goes in the JSON body
    /// and, for older backends that read it from the query, in the query too.
    async fn vote_feedback(
        &self,
        feedback_id: &str,
        user_id: &str,
        direction: VoteDirection,
    ) -> Result<FeedbackRecord, ApiError> {
        let url = self.segment_url(&["api", "feedback", feedback_id, direction.as_str()])?;
        let builder = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .query(&[("user_id", user_id)])
            .json(&VoteRequest { user_id });
        self.send_json(builder).await
    }
}

/// Cancel `token` after `bound` unless it is cancelled first.
fn spawn_deadline(token: CancellationToken, bound: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(bound) => {
                log::debug!("Upload deadline of {}s reached", bound.as_secs());
                token.cancel();
            }
        }
    });
}

async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

async fn decode_json<T: DeserializeOwned>(resp: Response, timeout: Duration) -> Result<T, ApiError> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::from_transport(e, timeout))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
