use serde::{Deserialize, Deserializer, Serialize};

pub mod config;

/// Upper bound on pasted text, counted in characters.
pub const MAX_CHARS: usize = 15_000;

/// File extensions the analysis service can extract text from.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

pub const HEALTH_PATH: &str = "/health";
pub const SUMMARIZE_PATH: &str = "/summarize";

/// Multipart field names understood by `POST /summarize`.
pub mod fields {
    pub const TEXT: &str = "text";
    pub const FILE: &str = "file";
    pub const QUERY: &str = "query";
}

/// Verdict returned by `POST /summarize`.
///
/// The service is loose about which keys it sends, so every field falls back
/// to its default when missing or `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fake_sentences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Service-reported failure message. Blank messages do not count.
    pub fn service_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }

    pub fn flag_count(&self) -> usize {
        self.fake_sentences.len()
    }

    /// Echoed focus query, if the service sent a non-blank one.
    pub fn focus_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    #[serde(alias = "available")]
    pub ollama: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Error payload the service attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true when `name` ends in one of [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_file_name(name: &str) -> bool {
    extension_of(name)
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_result_tolerates_missing_fields() {
        let body = r#"{"summary":"ok","query":"","risk_level":"Low","fake_sentences":[]}"#;
        let decoded: AnalysisResult = serde_json::from_str(body).expect("deserialize");
        assert_eq!(decoded.summary, "ok");
        assert_eq!(decoded.confidence, 0.0);
        assert_eq!(decoded.word_count, 0);
        assert!(decoded.service_error().is_none());
        assert!(decoded.focus_query().is_none());
    }

    #[test]
    fn blank_query_echo_counts_as_absent() {
        let body = r#"{"summary":"ok","query":"   "}"#;
        let decoded: AnalysisResult = serde_json::from_str(body).expect("deserialize");
        assert!(decoded.focus_query().is_none());

        let body = r#"{"summary":"ok","query":"  dates  "}"#;
        let decoded: AnalysisResult = serde_json::from_str(body).expect("deserialize");
        assert_eq!(decoded.focus_query(), Some("dates"));
    }

    #[test]
    fn analysis_result_treats_null_as_default() {
        let body = r#"{"summary":null,"confidence":null,"word_count":null,"fake_sentences":null}"#;
        let decoded: AnalysisResult = serde_json::from_str(body).expect("deserialize");
        assert!(decoded.summary.is_empty());
        assert!(decoded.fake_sentences.is_empty());
    }

    #[test]
    fn blank_error_is_not_a_failure() {
        let decoded: AnalysisResult =
            serde_json::from_str(r#"{"error":"  "}"#).expect("deserialize");
        assert!(decoded.service_error().is_none());

        let decoded: AnalysisResult =
            serde_json::from_str(r#"{"error":"too long"}"#).expect("deserialize");
        assert_eq!(decoded.service_error(), Some("too long"));
    }

    #[test]
    fn health_accepts_available_alias() {
        let decoded: HealthStatus =
            serde_json::from_str(r#"{"available":true}"#).expect("deserialize");
        assert!(decoded.ollama);
        assert!(serde_json::from_str::<HealthStatus>(r#"{"status":"ok"}"#).is_err());
    }

    #[test]
    fn accepted_file_names() {
        assert!(is_accepted_file_name("notes.txt"));
        assert!(is_accepted_file_name("Paper.PDF"));
        assert!(!is_accepted_file_name("slides.pptx"));
        assert!(!is_accepted_file_name("README"));
        assert!(!is_accepted_file_name(".pdf"));
    }
}
