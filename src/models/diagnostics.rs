use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::models::dpr::{DprUpload, UploadResult};
use crate::remote::{ApiClient, ApiError, DPR_UPLOAD_PATH};

/// Reply of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}

/// What the CORS test endpoint answered, including the CORS headers.
#[derive(Debug, Clone, Serialize)]
pub struct CorsProbe {
    pub message: String,
    pub status: String,
    pub allow_origin: Option<String>,
    pub allow_credentials: Option<String>,
}

/// Timestamped trace of a diagnostic run, shown to the user verbatim.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: Vec<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.entries.push(format!("{ts}: {message}"));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub reachable: bool,
    pub healthy: bool,
    pub status: Option<String>,
    pub database: Option<String>,
    pub error: Option<String>,
}

pub async fn check_health(client: &ApiClient) -> HealthReport {
    match client.health().await {
        Ok(h) => HealthReport {
            reachable: true,
            healthy: h.is_healthy(),
            status: Some(h.status),
            database: h.database,
            error: None,
        },
        Err(e) => HealthReport {
            reachable: !matches!(e, ApiError::Network(_) | ApiError::TimedOut(_)),
            healthy: false,
            status: None,
            database: None,
            error: Some(e.to_string()),
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorsReport {
    pub passed: bool,
    pub message: String,
    pub allow_origin: Option<String>,
    pub allow_credentials: Option<String>,
}

pub async fn probe_cors(client: &ApiClient, origin: &str) -> CorsReport {
    match client.cors_probe(origin).await {
        Ok(probe) => CorsReport {
            passed: true,
            message: format!("CORS Test Passed: {}", probe.message),
            allow_origin: probe.allow_origin,
            allow_credentials: probe.allow_credentials,
        },
        Err(ApiError::Status { status, detail }) => CorsReport {
            passed: false,
            message: format!("CORS Test Failed: {status} - {}", detail.unwrap_or_default()),
            allow_origin: None,
            allow_credentials: None,
        },
        Err(e) => CorsReport {
            passed: false,
            message: format!("CORS Test Error: {e}"),
            allow_origin: None,
            allow_credentials: None,
        },
    }
}

/// Result of the debug upload, returned as JSON to the upload tester.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub ok: bool,
    pub message: String,
    pub project_title: Option<String>,
    pub result: Option<UploadResult>,
    pub log: Vec<String>,
}

/// User-facing sentence for a failed upload.
pub fn upload_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::TimedOut(_) => {
            "Request timed out. The file might be too large or the processing took too long.".to_string()
        }
        ApiError::Cancelled => "Upload cancelled.".to_string(),
        ApiError::Status { detail: Some(d), .. } => format!("Server Error: {d}"),
        ApiError::Status { status, detail: None } => format!(
            "Server Error: Failed to process the file. Server responded with status {status}"
        ),
        ApiError::Network(e) => format!("Network error: {e}"),
        ApiError::Decode(e) => format!("Server Error: unreadable response ({e})"),
        ApiError::InvalidRequest(e) => format!("Invalid upload: {e}"),
    }
}

/// Upload a DPR while recording each step, distinguishing an aborted
/// (timed out) request from one the server rejected.
pub async fn run_upload(client: &ApiClient, upload: DprUpload, cancel: &CancellationToken) -> UploadReport {
    let mut trace = DiagnosticLog::new();
    trace.push(format!("Starting upload for: {}", upload.file_name));
    trace.push(format!("Form entry - file: {} ({} bytes, {})", upload.file_name, upload.bytes.len(), upload.content_type));
    trace.push(format!("Form entry - uploaded_by: {}", upload.uploaded_by));
    trace.push(format!("Form entry - generate_reports: {}", upload.generate_reports));
    trace.push(format!(
        "Sending request to: {} (aborts after {}s)",
        client.url(DPR_UPLOAD_PATH),
        client.upload_timeout().as_secs()
    ));

    let report = match client.upload_dpr(upload, cancel).await {
        Ok(result) => {
            trace.push("Upload completed successfully");
            if let Some(score) = result.completeness_score {
                trace.push(format!("Completeness score: {score}"));
            }
            UploadReport {
                ok: true,
                message: "Upload completed successfully".to_string(),
                project_title: result.project_title(),
                result: Some(result),
                log: Vec::new(),
            }
        }
        Err(e) => {
            match &e {
                ApiError::TimedOut(d) => {
                    trace.push(format!("Request aborted after {}s without a response", d.as_secs()))
                }
                ApiError::Status { status, detail } => {
                    trace.push(format!("Server error - Status: {status}"));
                    trace.push(format!("Server error response: {}", detail.as_deref().unwrap_or("<empty>")));
                }
                other => trace.push(format!("Request failed: {other}")),
            }
            let message = upload_failure_message(&e);
            trace.push(message.clone());
            log::warn!("DPR upload failed: {e}");
            UploadReport {
                ok: false,
                message,
                project_title: None,
                result: None,
                log: Vec::new(),
            }
        }
    };

    trace.push("Upload process finished");
    UploadReport { log: trace.into_entries(), ..report }
}
