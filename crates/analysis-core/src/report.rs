//! Plain-text artifacts offered for download from the results view.

use std::path::{Path, PathBuf};

use protocol::AnalysisResult;

use crate::error::ExportError;

pub const REPORT_FILE_NAME: &str = "verifai-report.txt";
pub const SUMMARY_FILE_NAME: &str = "summary.txt";
pub const TEXT_MIME: &str = "text/plain";

pub const NO_SUMMARY: &str = "No summary generated.";
pub const NO_FLAGS: &str = "No misinformation detected.";
const DEFAULT_QUERY: &str = "General summary";
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub contents: String,
}

impl Artifact {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ExportError::Io { path, source }
        };
        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.contents).map_err(io_err(&path))?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "artifact written");
        Ok(path)
    }
}

pub fn render_report(result: &AnalysisResult) -> String {
    let mut lines = vec![
        "VERIFAI — ANALYSIS REPORT".to_string(),
        "=".repeat(RULE_WIDTH),
        String::new(),
        format!("Query: {}", result.focus_query().unwrap_or(DEFAULT_QUERY)),
        format!(
            "Risk Level: {}",
            result
                .risk_level
                .as_deref()
                .filter(|label| !label.trim().is_empty())
                .unwrap_or("Low")
        ),
        format!("Confidence: {}%", format_number(result.confidence)),
        format!("Word Count: {}", result.word_count),
        String::new(),
        "SUMMARY".to_string(),
        "-".repeat(RULE_WIDTH),
    ];
    lines.push(if result.summary.is_empty() {
        NO_SUMMARY.to_string()
    } else {
        result.summary.clone()
    });
    lines.push(String::new());
    lines.push("FLAGGED STATEMENTS".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    if result.fake_sentences.is_empty() {
        lines.push(NO_FLAGS.to_string());
    } else {
        lines.extend(
            result
                .fake_sentences
                .iter()
                .enumerate()
                .map(|(idx, sentence)| format!("{}. {}", idx + 1, sentence)),
        );
    }
    lines.join("\n")
}

pub fn report_artifact(result: &AnalysisResult) -> Artifact {
    Artifact {
        file_name: REPORT_FILE_NAME,
        mime: TEXT_MIME,
        contents: render_report(result),
    }
}

/// Summary-only download. Not offered when there is no summary.
pub fn summary_artifact(result: &AnalysisResult) -> Option<Artifact> {
    if result.summary.is_empty() {
        return None;
    }
    Some(Artifact {
        file_name: SUMMARY_FILE_NAME,
        mime: TEXT_MIME,
        contents: result.summary.clone(),
    })
}

/// Integral values print without a fractional part (`90`, not `90.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(fake_sentences: Vec<&str>) -> AnalysisResult {
        AnalysisResult {
            summary: "Vaccines were tested in large trials.".into(),
            risk_level: Some("High".into()),
            confidence: 90.0,
            word_count: 500,
            fake_sentences: fake_sentences.into_iter().map(String::from).collect(),
            query: Some("health claims".into()),
            error: None,
        }
    }

    #[test]
    fn full_report_layout() {
        let report = render_report(&sample(vec!["A", "B"]));
        let expected = [
            "VERIFAI — ANALYSIS REPORT",
            "========================================",
            "",
            "Query: health claims",
            "Risk Level: High",
            "Confidence: 90%",
            "Word Count: 500",
            "",
            "SUMMARY",
            "----------------------------------------",
            "Vaccines were tested in large trials.",
            "",
            "FLAGGED STATEMENTS",
            "----------------------------------------",
            "1. A",
            "2. B",
        ]
        .join("\n");
        assert_eq!(report, expected);
    }

    #[test]
    fn numbering_follows_input_order() {
        let report = render_report(&sample(vec!["B", "A"]));
        let first = report.find("1. B").expect("first");
        let second = report.find("2. A").expect("second");
        assert!(first < second);
    }

    #[test]
    fn empty_flags_use_placeholder() {
        let report = render_report(&sample(Vec::new()));
        assert!(report.contains(NO_FLAGS));
        assert!(!report.contains("1. "));
    }

    #[test]
    fn placeholders_for_missing_fields() {
        let report = render_report(&AnalysisResult::default());
        assert!(report.contains("Query: General summary"));
        assert!(report.contains("Risk Level: Low"));
        assert!(report.contains("Confidence: 0%"));
        assert!(report.contains(NO_SUMMARY));
    }

    #[test]
    fn rendering_does_not_touch_the_result() {
        let result = sample(vec!["A"]);
        let before = result.clone();
        let first = render_report(&result);
        assert_eq!(first, render_report(&result));
        assert_eq!(result, before);
    }

    #[test]
    fn summary_artifact_requires_summary() {
        assert!(summary_artifact(&AnalysisResult::default()).is_none());
        let artifact = summary_artifact(&sample(Vec::new())).expect("artifact");
        assert_eq!(artifact.file_name, SUMMARY_FILE_NAME);
        assert_eq!(artifact.mime, TEXT_MIME);
    }

    #[test]
    fn fractional_confidence() {
        assert_eq!(format_number(87.5), "87.5");
        assert_eq!(format_number(100.0), "100");
    }

    #[test]
    fn writes_report_file() {
        let dir = std::env::temp_dir().join(format!("verifai-report-{}", std::process::id()));
        let path = report_artifact(&sample(vec!["A"]))
            .write_to(&dir)
            .expect("write");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(REPORT_FILE_NAME));
        let written = std::fs::read_to_string(&path).expect("read");
        assert!(written.ends_with("1. A"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
