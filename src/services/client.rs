//! Data Fetch Client
//!
//! Wraps the HTTP boundary of the dashboard: the farm volume endpoint (JSON)
//! and the daily report endpoint (binary). Failures are normalized into
//! [`Error`] variants so callers only deal with one taxonomy.

use chrono::NaiveDate;
use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::constants::{DAILY_REPORT_ENDPOINT, FARM_VOLUMES_ENDPOINT};
use crate::domain::config::ServerConfig;
use crate::domain::farm::{FarmVolumesRequest, FarmVolumesResponse};
use crate::error::{Error, Result};
use crate::utils::format::format_date;

/// Request for a rendered daily report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub company_name: String,
    pub company_id: String,
    pub date: NaiveDate,
}

/// Binary document returned by the report endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Source of farm data. Implemented over HTTP, and by fakes in tests.
pub trait FarmDataSource: Send + Sync {
    /// POST the farm volume request and return the raw envelope
    fn fetch_farm_volumes<'a>(
        &'a self,
        request: &'a FarmVolumesRequest,
    ) -> BoxFuture<'a, Result<FarmVolumesResponse>>;

    /// GET the rendered report for a company and date
    fn fetch_daily_report<'a>(
        &'a self,
        request: &'a ReportRequest,
    ) -> BoxFuture<'a, Result<ReportDocument>>;
}

/// reqwest-backed data source
#[derive(Debug, Clone)]
pub struct HttpDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDataClient {
    /// Build a client; without a configured timeout the reqwest default applies
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn report_url(&self, request: &ReportRequest) -> Result<reqwest::Url> {
        let invalid = |detail: String| Error::Invalid {
            message: format!("Invalid report URL: {detail}"),
        };
        let mut url = reqwest::Url::parse(&self.endpoint(DAILY_REPORT_ENDPOINT))
            .map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(self.base_url.clone()))?
            .push(&request.company_name);
        url.query_pairs_mut()
            .append_pair("company_id", &request.company_id)
            .append_pair("date", &format_date(&request.date));
        Ok(url)
    }

    async fn post_farm_volumes(&self, request: &FarmVolumesRequest) -> Result<FarmVolumesResponse> {
        let url = self.endpoint(FARM_VOLUMES_ENDPOINT);
        tracing::debug!(%url, company_id = %request.company_id, date = %request.date, "POST farm volumes");

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let content_type = header_content_type(&response);
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_message_from_body(&content_type, &body, status.canonical_reason()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            message: e.to_string(),
        })
    }

    async fn get_daily_report(&self, request: &ReportRequest) -> Result<ReportDocument> {
        let url = self.report_url(request)?;
        tracing::debug!(%url, "GET daily report");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_type = header_content_type(&response);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_message_from_body(&content_type, &body, status.canonical_reason()),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        Ok(ReportDocument {
            content_type,
            bytes,
        })
    }
}

impl FarmDataSource for HttpDataClient {
    fn fetch_farm_volumes<'a>(
        &'a self,
        request: &'a FarmVolumesRequest,
    ) -> BoxFuture<'a, Result<FarmVolumesResponse>> {
        Box::pin(self.post_farm_volumes(request))
    }

    fn fetch_daily_report<'a>(
        &'a self,
        request: &'a ReportRequest,
    ) -> BoxFuture<'a, Result<ReportDocument>> {
        Box::pin(self.get_daily_report(request))
    }
}

fn header_content_type(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Extract a readable message from an error body.
///
/// JSON bodies contribute their `error`/`errorMessage`/`message` field; other
/// bodies are used as plain text. Falls back to the HTTP reason phrase.
pub fn error_message_from_body(content_type: &str, body: &str, reason: Option<&str>) -> String {
    let fallback = || reason.unwrap_or("Request failed").to_string();

    if content_type.contains("json") {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return fallback();
        };
        return ["error", "errorMessage", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(fallback);
    }

    let text = body.trim();
    if text.is_empty() {
        fallback()
    } else {
        text.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port
    async fn serve_once(status_line: &str, content_type: &str, body: &str) -> HttpDataClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });

        HttpDataClient::new(&ServerConfig {
            base_url: format!("http://{addr}"),
            request_timeout_secs: Some(5),
        })
        .expect("client")
    }

    /// Read the request head and its body so the client sees a clean exchange
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    fn volumes_request() -> FarmVolumesRequest {
        FarmVolumesRequest {
            company_id: "42".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
        }
    }

    #[tokio::test]
    async fn test_server_error_status_is_http_error() {
        let client = serve_once(
            "500 Internal Server Error",
            "application/json",
            r#"{"error": "Database unavailable"}"#,
        )
        .await;

        let err = client
            .fetch_farm_volumes(&volumes_request())
            .await
            .expect_err("500 must fail");
        match err {
            Error::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database unavailable");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_malformed() {
        let client = serve_once("200 OK", "application/json", "{not json").await;

        let err = client
            .fetch_farm_volumes(&volumes_request())
            .await
            .expect_err("bad body must fail");
        assert!(matches!(err, Error::MalformedResponse { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_success_body_is_parsed() {
        let client = serve_once(
            "200 OK",
            "application/json",
            r#"{"success": true, "data": [{"farmId": "f1", "farmName": "North", "volume": 12.5}]}"#,
        )
        .await;

        let response = client
            .fetch_farm_volumes(&volumes_request())
            .await
            .expect("response");
        let records = response.into_records().expect("records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].farm_id, "f1");
    }

    #[test]
    fn test_error_message_from_json_body() {
        assert_eq!(
            error_message_from_body(
                "application/json; charset=utf-8",
                r#"{"error": "Report not available"}"#,
                Some("Not Found")
            ),
            "Report not available"
        );
        assert_eq!(
            error_message_from_body("application/json", "not json", Some("Bad Gateway")),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_error_message_from_text_body() {
        assert_eq!(
            error_message_from_body("text/plain", "  upstream down \n", None),
            "upstream down"
        );
        assert_eq!(error_message_from_body("text/html", "", None), "Request failed");
    }

    #[test]
    fn test_report_url_encodes_company_name() {
        let client = HttpDataClient::new(&ServerConfig {
            base_url: "http://example.test/".into(),
            request_timeout_secs: Some(5),
        })
        .expect("client");
        let url = client
            .report_url(&ReportRequest {
                company_name: "Green Acres".into(),
                company_id: "9".into(),
                date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            })
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://example.test/api/reports/daily-pdf/Green%20Acres?company_id=9&date=2024-05-01"
        );
    }
}
