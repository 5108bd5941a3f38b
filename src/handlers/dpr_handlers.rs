use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use tokio_util::sync::CancellationToken;

use crate::auth::csrf::{self, CSRF_HEADER};
use crate::auth::session::require_role;
use crate::auth::validate::validate_file_name;
use crate::errors::AppError;
use crate::models::account::Role;
use crate::models::diagnostics::run_upload;
use crate::models::dpr::DprUpload;
use crate::state::AppState;

/// Largest DPR document accepted from the browser.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub const FILE_NAME_HEADER: &str = "x-file-name";
pub const GENERATE_REPORTS_HEADER: &str = "x-generate-reports";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Percent-decode a header value. Header values are Latin-1 only, so the
/// browser sends the file name through `encodeURIComponent`.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = (char::from(bytes[i + 1]).to_digit(16), char::from(bytes[i + 2]).to_digit(16));
            if let (Some(hi), Some(lo)) = hex {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// POST /dpr/upload
///
/// The browser sends the raw file as the body, the percent-encoded file name
/// in `X-File-Name` and the CSRF token in `X-CSRF-Token`. Answers with the
/// upload report as JSON: 200 on success, 502 when the DPR service
/// failed, timed out or the upload was cancelled.
pub async fn upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let user = require_role(&session, Role::Organization)?;
    csrf::validate_csrf(&session, header(&req, CSRF_HEADER).unwrap_or_default())?;

    let file_name = percent_decode(header(&req, FILE_NAME_HEADER).unwrap_or_default())
        .trim()
        .to_string();
    if let Some(err) = validate_file_name(&file_name) {
        return Err(AppError::BadRequest(err));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("The uploaded file is empty".to_string()));
    }

    let upload = DprUpload {
        file_name,
        content_type: header(&req, "content-type")
            .unwrap_or("application/octet-stream")
            .to_string(),
        bytes: body.to_vec(),
        uploaded_by: user.id,
        generate_reports: header(&req, GENERATE_REPORTS_HEADER).is_none_or(|v| !v.eq_ignore_ascii_case("false")),
    };

    let cancel = CancellationToken::new();
    let report = run_upload(&state.client, upload, &cancel).await;

    let response = if report.ok {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::BadGateway().json(report)
    };
    Ok(response)
}
