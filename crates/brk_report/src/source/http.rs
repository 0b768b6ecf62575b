use std::time::Duration;

use brk_core::error::AppError;

use super::ReportSource;
use crate::model::{ReportKind, ReportRequest, ReportRows};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Report backend reached over HTTP.
///
/// Each request is sent exactly once; transient failures come back flagged `retryable`.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    base_url: String,
    timeout: Duration,
}

impl HttpReportSource {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let host = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"));
        match host {
            Some(h) if !h.is_empty() && !h.contains(char::is_whitespace) => {}
            _ => {
                return Err(AppError::new(
                    "REPORT_ENDPOINT_INVALID",
                    "Report base URL must be an http(s) URL",
                )
                .with_details(format!("base_url={base_url}")))
            }
        }
        if timeout_ms == 0 {
            return Err(AppError::new(
                "REPORT_ENDPOINT_INVALID",
                "Report timeout must be at least 1 ms",
            ));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, kind: ReportKind) -> String {
        format!("{}/reports/{}", self.base_url, kind.path())
    }
}

impl ReportSource for HttpReportSource {
    fn fetch(&self, request: &ReportRequest) -> Result<ReportRows, AppError> {
        let url = self.endpoint(request.kind());
        let body = serde_json::to_value(request)
            .map_err(|e| AppError::wrap("REPORT_ENCODE_FAILED", "Failed to encode report request", e))?;

        tracing::info!(%url, kind = ?request.kind(), "requesting report");
        let resp = ureq::post(&url).timeout(self.timeout).send_json(body);

        match resp {
            Ok(r) => {
                let rows: ReportRows = r.into_json().map_err(|e| {
                    AppError::new("REPORT_DECODE_FAILED", "Failed to decode report response")
                        .with_details(e.to_string())
                })?;
                if rows.kind() != request.kind() {
                    return Err(AppError::new(
                        "REPORT_KIND_MISMATCH",
                        "Report response does not match the request",
                    )
                    .with_details(format!(
                        "requested={:?}; received={:?}",
                        request.kind(),
                        rows.kind()
                    )));
                }
                Ok(rows)
            }
            Err(ureq::Error::Status(code, _)) => {
                tracing::warn!(%url, status = code, "report request rejected");
                Err(AppError::new("REPORT_FETCH_FAILED", "Report request failed")
                    .with_details(format!("status={code}; url={url}"))
                    .with_retryable(code >= 500))
            }
            Err(ureq::Error::Transport(t)) => {
                tracing::warn!(%url, error = %t, "report endpoint unreachable");
                Err(AppError::new(
                    "REPORT_UNREACHABLE",
                    "Failed to reach report endpoint",
                )
                .with_details(t.to_string())
                .with_retryable(true))
            }
        }
    }
}
