use std::fmt;
use std::time::{Duration, Instant};

use protocol::AnalysisResult;
use uuid::Uuid;

use crate::capture::{AnalysisRequest, InputCapture, InputMode};
use crate::error::SubmitError;
use crate::readiness::Readiness;

/// Ticket tying an asynchronous completion to the submission that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        ticket: SubmissionId,
        mode: InputMode,
        started_at: Instant,
        /// Set once the input view stops listening for this submission.
        detached: bool,
    },
}

/// A request that passed the gate and must be sent exactly once.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: SubmissionId,
    pub request: AnalysisRequest,
}

#[derive(Debug, Clone)]
pub enum BeginOutcome {
    Started(Submission),
    /// A submission is already outstanding; nothing happens.
    Busy,
    Rejected(SubmitError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Succeeded(AnalysisResult),
    Failed(SubmitError),
    /// The consumer went away; the result is dropped.
    Discarded,
    /// Ticket does not match the outstanding submission.
    Stale,
}

/// Idle/Submitting state machine. Holds no I/O; the session sends requests.
#[derive(Debug, Default)]
pub struct SubmissionController {
    state: SubmissionState,
}

impl SubmissionController {
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    pub fn begin(&mut self, capture: &InputCapture, readiness: Readiness) -> BeginOutcome {
        if self.is_submitting() {
            return BeginOutcome::Busy;
        }
        if readiness.blocks_submission() {
            return BeginOutcome::Rejected(SubmitError::Unavailable);
        }
        let request = match capture.build_request() {
            Ok(request) => request,
            Err(err) => return BeginOutcome::Rejected(err.into()),
        };
        let ticket = SubmissionId::new();
        self.state = SubmissionState::Submitting {
            ticket,
            mode: request.mode(),
            started_at: Instant::now(),
            detached: false,
        };
        BeginOutcome::Started(Submission { ticket, request })
    }

    /// Marks the outstanding submission as unwanted. The controller stays
    /// busy until the response arrives so requests never overlap.
    pub fn detach(&mut self) -> bool {
        match &mut self.state {
            SubmissionState::Submitting { detached, .. } => {
                *detached = true;
                true
            }
            SubmissionState::Idle => false,
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match &self.state {
            SubmissionState::Submitting { started_at, .. } => Some(started_at.elapsed()),
            SubmissionState::Idle => None,
        }
    }

    pub fn complete(
        &mut self,
        ticket: SubmissionId,
        outcome: Result<AnalysisResult, SubmitError>,
    ) -> Completion {
        let detached = match &self.state {
            SubmissionState::Submitting {
                ticket: current,
                detached,
                ..
            } if *current == ticket => *detached,
            _ => return Completion::Stale,
        };
        self.state = SubmissionState::Idle;
        if detached {
            return Completion::Discarded;
        }
        match outcome {
            Ok(result) => match result.service_error() {
                Some(message) => Completion::Failed(SubmitError::Service(message.to_string())),
                None => Completion::Succeeded(result),
            },
            Err(err) => Completion::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn ready_capture() -> InputCapture {
        let mut capture = InputCapture::default();
        capture.set_text("The moon is made of cheese.");
        capture
    }

    fn started(outcome: BeginOutcome) -> Submission {
        match outcome {
            BeginOutcome::Started(submission) => submission,
            other => panic!("expected start, got {other:?}"),
        }
    }

    #[test]
    fn invalid_input_is_rejected_without_state_change() {
        let mut controller = SubmissionController::default();
        let outcome = controller.begin(&InputCapture::default(), Readiness::Available);
        assert!(matches!(
            outcome,
            BeginOutcome::Rejected(SubmitError::Validation(ValidationError::EmptyText))
        ));
        assert!(!controller.is_submitting());
    }

    #[test]
    fn unavailable_service_rejects_valid_input() {
        let mut controller = SubmissionController::default();
        let outcome = controller.begin(&ready_capture(), Readiness::Unavailable);
        assert!(matches!(outcome, BeginOutcome::Rejected(SubmitError::Unavailable)));
        assert!(!controller.is_submitting());
    }

    #[test]
    fn unknown_readiness_does_not_block() {
        let mut controller = SubmissionController::default();
        started(controller.begin(&ready_capture(), Readiness::Unknown));
        assert!(controller.is_submitting());
    }

    #[test]
    fn second_begin_while_submitting_is_busy() {
        let mut controller = SubmissionController::default();
        started(controller.begin(&ready_capture(), Readiness::Available));
        assert!(matches!(
            controller.begin(&ready_capture(), Readiness::Available),
            BeginOutcome::Busy
        ));
    }

    #[test]
    fn success_returns_to_idle() {
        let mut controller = SubmissionController::default();
        let submission = started(controller.begin(&ready_capture(), Readiness::Available));
        let result = AnalysisResult {
            summary: "S".into(),
            ..AnalysisResult::default()
        };
        let completion = controller.complete(submission.ticket, Ok(result.clone()));
        assert_eq!(completion, Completion::Succeeded(result));
        assert!(!controller.is_submitting());
    }

    #[test]
    fn embedded_error_becomes_service_failure() {
        let mut controller = SubmissionController::default();
        let submission = started(controller.begin(&ready_capture(), Readiness::Available));
        let result = AnalysisResult {
            error: Some("too long".into()),
            ..AnalysisResult::default()
        };
        assert_eq!(
            controller.complete(submission.ticket, Ok(result)),
            Completion::Failed(SubmitError::Service("too long".into()))
        );
        assert!(!controller.is_submitting());
    }

    #[test]
    fn mismatched_ticket_is_stale() {
        let mut controller = SubmissionController::default();
        started(controller.begin(&ready_capture(), Readiness::Available));
        let completion = controller.complete(SubmissionId::new(), Ok(AnalysisResult::default()));
        assert_eq!(completion, Completion::Stale);
        assert!(controller.is_submitting());
    }

    #[test]
    fn detached_result_is_discarded() {
        let mut controller = SubmissionController::default();
        let submission = started(controller.begin(&ready_capture(), Readiness::Available));
        assert!(controller.detach());
        assert!(controller.is_submitting());
        assert_eq!(
            controller.complete(submission.ticket, Ok(AnalysisResult::default())),
            Completion::Discarded
        );
        assert!(!controller.is_submitting());
    }
}
