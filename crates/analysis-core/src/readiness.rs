use protocol::HealthStatus;

use crate::backend::AnalysisBackend;
use crate::error::BackendError;

/// Availability of the analysis engine as seen by this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Readiness {
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl Readiness {
    pub fn from_probe(result: &Result<HealthStatus, BackendError>) -> Self {
        match result {
            Ok(status) if status.ollama => Readiness::Available,
            _ => Readiness::Unavailable,
        }
    }

    /// Only `Unavailable` gates submission; `Unknown` lets it through.
    pub fn blocks_submission(self) -> bool {
        self == Readiness::Unavailable
    }

    pub fn is_resolved(self) -> bool {
        self != Readiness::Unknown
    }
}

/// Result of the one-shot health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub readiness: Readiness,
    pub model: Option<String>,
}

pub async fn probe(backend: &dyn AnalysisBackend) -> ProbeOutcome {
    let result = backend.health().await;
    let readiness = Readiness::from_probe(&result);
    match &result {
        Ok(status) => tracing::info!(available = status.ollama, "health probe finished"),
        Err(err) => tracing::warn!(error = %err, "health probe failed"),
    }
    ProbeOutcome {
        readiness,
        model: result.ok().and_then(|status| status.model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_result_mapping() {
        let up = Ok(HealthStatus {
            ollama: true,
            model: None,
        });
        let down = Ok(HealthStatus {
            ollama: false,
            model: None,
        });
        assert_eq!(Readiness::from_probe(&up), Readiness::Available);
        assert_eq!(Readiness::from_probe(&down), Readiness::Unavailable);
        assert_eq!(
            Readiness::from_probe(&Err(BackendError::Status(503))),
            Readiness::Unavailable
        );
    }

    #[test]
    fn only_unavailable_blocks() {
        assert!(!Readiness::Unknown.blocks_submission());
        assert!(!Readiness::Available.blocks_submission());
        assert!(Readiness::Unavailable.blocks_submission());
    }
}
