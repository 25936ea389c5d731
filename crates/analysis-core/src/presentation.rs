use protocol::AnalysisResult;
use serde::Serialize;

use crate::readiness::Readiness;
use crate::report::{format_number, NO_SUMMARY};
use crate::risk::{classify, RiskAssessment, RiskScale};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultsTab {
    #[default]
    Summary,
    Flagged,
}

impl ResultsTab {
    pub fn toggle(self) -> Self {
        match self {
            ResultsTab::Summary => ResultsTab::Flagged,
            ResultsTab::Flagged => ResultsTab::Summary,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResultsTab::Summary => "Summary",
            ResultsTab::Flagged => "Flagged Statements",
        }
    }

    /// Count shown next to the tab title, if any.
    pub fn badge(self, flag_count: usize) -> Option<usize> {
        match self {
            ResultsTab::Flagged if flag_count > 0 => Some(flag_count),
            _ => None,
        }
    }
}

/// Everything a results view draws, derived from one stored result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPresentation {
    pub risk: RiskAssessment,
    pub badge: String,
    pub flag_count: usize,
    pub flag_headline: &'static str,
    pub flag_detail: &'static str,
    pub summary: String,
    pub confidence: Option<String>,
    pub word_count: Option<String>,
    pub query: Option<String>,
    pub flags: Vec<String>,
}

impl ResultPresentation {
    pub fn new(result: &AnalysisResult, scale: RiskScale) -> Self {
        let flag_count = result.flag_count();
        let badge = result
            .risk_level
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or("Low")
            .to_string();
        let flag_headline = match flag_count {
            0 => "All clear",
            1 => "Statement flagged",
            _ => "Statements flagged",
        };
        let flag_detail = if flag_count == 0 {
            "No misinformation detected in this document."
        } else {
            "These sentences appear false, misleading, or unverifiable."
        };
        let summary = if result.summary.is_empty() {
            NO_SUMMARY.to_string()
        } else {
            result.summary.clone()
        };
        let confidence = (result.confidence > 0.0)
            .then(|| format!("{}%", format_number(result.confidence.min(100.0))));
        let word_count = (result.word_count > 0)
            .then(|| format!("{} words", group_thousands(result.word_count)));
        Self {
            risk: classify(result.risk_level.as_deref(), scale),
            badge,
            flag_count,
            flag_headline,
            flag_detail,
            summary,
            confidence,
            word_count,
            query: result.focus_query().map(str::to_string),
            flags: result.fake_sentences.clone(),
        }
    }
}

/// Persistent status line for the availability probe.
pub fn readiness_status(readiness: Readiness, model: Option<&str>) -> String {
    match readiness {
        Readiness::Unknown => "Checking analysis engine…".to_string(),
        Readiness::Available => match model {
            Some(model) => format!("Analysis engine connected · {model} ready"),
            None => "Analysis engine connected".to_string(),
        },
        Readiness::Unavailable => "Analysis engine offline, start the service".to_string(),
    }
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{RiskLevel, RiskTone};

    #[test]
    fn high_risk_single_flag() {
        let result = AnalysisResult {
            summary: "S".into(),
            risk_level: Some("High".into()),
            confidence: 90.0,
            word_count: 500,
            fake_sentences: vec!["X".into()],
            ..AnalysisResult::default()
        };
        let view = ResultPresentation::new(&result, RiskScale::Editorial);
        assert_eq!(view.risk.level, RiskLevel::High);
        assert_eq!(view.risk.percent, 85);
        assert_eq!(view.risk.tone, RiskTone::Red);
        assert_eq!(view.flag_count, 1);
        assert_eq!(ResultsTab::Flagged.badge(view.flag_count), Some(1));
        assert_eq!(view.flag_headline, "Statement flagged");
        assert_eq!(view.confidence.as_deref(), Some("90%"));
        assert_eq!(view.word_count.as_deref(), Some("500 words"));
    }

    #[test]
    fn empty_result_uses_placeholders() {
        let view = ResultPresentation::new(&AnalysisResult::default(), RiskScale::Compact);
        assert_eq!(view.badge, "Low");
        assert_eq!(view.risk.percent, 20);
        assert_eq!(view.summary, NO_SUMMARY);
        assert_eq!(view.flag_headline, "All clear");
        assert!(view.confidence.is_none());
        assert!(view.word_count.is_none());
        assert!(view.query.is_none());
        assert_eq!(ResultsTab::Flagged.badge(0), None);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(1234), "1,234");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            readiness_status(Readiness::Available, Some("llama3.2")),
            "Analysis engine connected · llama3.2 ready"
        );
        assert!(readiness_status(Readiness::Unknown, None).starts_with("Checking"));
    }
}
