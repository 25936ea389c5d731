use protocol::config::Skin;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Case-insensitive; anything unrecognized is `Low`.
    pub fn normalize(label: Option<&str>) -> Self {
        let normalized = label.unwrap_or_default().trim().to_lowercase();
        match normalized.as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Which severity table to use. The compact skin draws Low a little higher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RiskScale {
    #[default]
    Editorial,
    Compact,
}

impl From<Skin> for RiskScale {
    fn from(skin: Skin) -> Self {
        match skin {
            Skin::Editorial => RiskScale::Editorial,
            Skin::Compact => RiskScale::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTone {
    Green,
    Amber,
    Red,
}

impl RiskTone {
    pub fn hex(self, scale: RiskScale) -> &'static str {
        match (scale, self) {
            (RiskScale::Editorial, RiskTone::Green) => "#1e8449",
            (RiskScale::Editorial, RiskTone::Amber) => "#b7950b",
            (RiskScale::Editorial, RiskTone::Red) => "#c0392b",
            (RiskScale::Compact, RiskTone::Green) => "#2ecc71",
            (RiskScale::Compact, RiskTone::Amber) => "#f1c40f",
            (RiskScale::Compact, RiskTone::Red) => "#e74c3c",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub percent: u8,
    pub tone: RiskTone,
}

pub fn classify(label: Option<&str>, scale: RiskScale) -> RiskAssessment {
    let level = RiskLevel::normalize(label);
    let (percent, tone) = match level {
        RiskLevel::Low => (
            match scale {
                RiskScale::Editorial => 15,
                RiskScale::Compact => 20,
            },
            RiskTone::Green,
        ),
        RiskLevel::Medium => (50, RiskTone::Amber),
        RiskLevel::High => (85, RiskTone::Red),
    };
    RiskAssessment {
        level,
        percent,
        tone,
    }
}
