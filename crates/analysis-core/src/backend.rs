use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use protocol::config::ClientConfig;
use protocol::{
    fields, AnalysisResult, ErrorBody, HealthStatus, HEALTH_PATH, SUMMARIZE_PATH,
};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::capture::{AnalysisPayload, AnalysisRequest};
use crate::error::{BackendError, SubmitError, GENERIC_SERVICE_MESSAGE};

static HTTP_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// The remote analysis service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, BackendError>;

    /// Sends one analysis request. Service-reported failures come back as
    /// `SubmitError::Service`, everything else on the wire as `Transport`.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, SubmitError>;
}

pub struct HttpBackend {
    base_url: String,
    client: Client,
    probe_timeout: Duration,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        join_base_path(&config.service_url, HEALTH_PATH).map_err(BackendError::InvalidUrl)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Ok(Self {
            base_url: config.service_url.trim().to_string(),
            client,
            probe_timeout: config.probe_timeout,
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let url = join_base_path(&self.base_url, HEALTH_PATH).map_err(BackendError::InvalidUrl)?;
        tracing::debug!(request_id, %url, "http GET start");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|err| {
                tracing::debug!(
                    request_id,
                    timeout = err.is_timeout(),
                    connect = err.is_connect(),
                    "http GET failed"
                );
                BackendError::Transport(err.to_string())
            })?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(BackendError::Status(status));
        }
        let body = response
            .text()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        tracing::debug!(request_id, status, body_len = body.len(), "http GET done");
        serde_json::from_str(&body).map_err(|err| BackendError::Decode(err.to_string()))
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, SubmitError> {
        let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let url = join_base_path(&self.base_url, SUMMARIZE_PATH).map_err(SubmitError::transport)?;
        let form = build_form(request).map_err(|err| SubmitError::transport(err.to_string()))?;
        let started = Instant::now();
        tracing::info!(request_id, mode = request.mode().label(), "http POST {SUMMARIZE_PATH} start");
        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(
                    request_id,
                    timeout = err.is_timeout(),
                    connect = err.is_connect(),
                    error = %err,
                    "http POST failed"
                );
                SubmitError::transport(err.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            tracing::warn!(request_id, error = %err, "http POST read failed");
            SubmitError::transport(err.to_string())
        })?;
        tracing::info!(
            request_id,
            status,
            body_len = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "http POST {SUMMARIZE_PATH} done"
        );
        classify_response(status, &body)
    }
}

fn build_form(request: &AnalysisRequest) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    match &request.payload {
        AnalysisPayload::Text(text) => {
            form = form.text(fields::TEXT, text.clone());
        }
        AnalysisPayload::File(file) => {
            let part = Part::bytes(file.bytes().to_vec())
                .file_name(file.name().to_string())
                .mime_str(file.mime())?;
            form = form.part(fields::FILE, part);
        }
    }
    if let Some(query) = &request.query {
        form = form.text(fields::QUERY, query.clone());
    }
    Ok(form)
}

/// Maps a `/summarize` response onto the result or the error taxonomy.
pub fn classify_response(status: u16, body: &str) -> Result<AnalysisResult, SubmitError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_string());
        return Err(SubmitError::Service(message));
    }
    let result: AnalysisResult = serde_json::from_str(body)
        .map_err(|err| SubmitError::transport(format!("malformed response: {err}")))?;
    if let Some(message) = result.service_error() {
        return Err(SubmitError::Service(message.to_string()));
    }
    Ok(result)
}

pub fn join_base_path(base: &str, path: &str) -> Result<String, String> {
    if base.trim().is_empty() {
        return Err("service_url is empty".to_string());
    }
    let normalized_base = base.trim().trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(format!("{normalized_base}{normalized_path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CONNECTIVITY_MESSAGE;

    #[test]
    fn joins_paths() {
        assert_eq!(
            join_base_path("http://127.0.0.1:5000/", "summarize").unwrap(),
            "http://127.0.0.1:5000/summarize"
        );
        assert_eq!(
            join_base_path("http://h/api", "/health").unwrap(),
            "http://h/api/health"
        );
        assert!(join_base_path("  ", "/health").is_err());
    }

    #[test]
    fn ok_response_parses() {
        let body = r#"{"summary":"S","risk_level":"High","confidence":90,"word_count":500,"fake_sentences":["X"]}"#;
        let result = classify_response(200, body).expect("result");
        assert_eq!(result.word_count, 500);
        assert_eq!(result.fake_sentences, vec!["X".to_string()]);
    }

    #[test]
    fn embedded_error_on_ok_status() {
        let err = classify_response(200, r#"{"summary":"","error":"too long"}"#).unwrap_err();
        assert_eq!(err, SubmitError::Service("too long".into()));
    }

    #[test]
    fn error_status_uses_body_message() {
        let err = classify_response(400, r#"{"error":"Unsupported file type"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type");
    }

    #[test]
    fn error_status_without_message_is_generic() {
        let err = classify_response(502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err, SubmitError::Service(GENERIC_SERVICE_MESSAGE.into()));
    }

    #[test]
    fn malformed_success_body_is_transport() {
        let err = classify_response(200, "not json").unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn backend_rejects_empty_url() {
        let config = ClientConfig {
            service_url: String::new(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpBackend::new(&config),
            Err(BackendError::InvalidUrl(_))
        ));
    }
}
