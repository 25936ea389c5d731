use std::sync::Arc;

use protocol::AnalysisResult;
use tokio::sync::mpsc;

use crate::backend::AnalysisBackend;
use crate::capture::InputCapture;
use crate::controller::{BeginOutcome, Completion, SubmissionController, SubmissionId};
use crate::error::{ExportError, SubmitError};
use crate::navigation::{Navigator, View};
use crate::presentation::ResultPresentation;
use crate::readiness::{probe, ProbeOutcome, Readiness};
use crate::report::{report_artifact, summary_artifact, Artifact};
use crate::risk::RiskScale;
use crate::store::ResultStore;

/// Completions delivered by the session's background tasks.
#[derive(Debug)]
pub enum SessionEvent {
    ProbeFinished(ProbeOutcome),
    SubmissionFinished {
        ticket: SubmissionId,
        outcome: Result<AnalysisResult, SubmitError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    Started(SubmissionId),
    Busy,
    Rejected(SubmitError),
}

/// What applying an event changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Readiness(Readiness),
    /// Result stored and the results view shown.
    Stored,
    Failed(SubmitError),
    Discarded,
    Ignored,
}

pub struct Session {
    backend: Arc<dyn AnalysisBackend>,
    events: mpsc::Sender<SessionEvent>,
    capture: InputCapture,
    readiness: Readiness,
    model: Option<String>,
    probe_started: bool,
    controller: SubmissionController,
    store: ResultStore,
    navigator: Navigator,
    notice: Option<SubmitError>,
}

impl Session {
    pub fn new(backend: Arc<dyn AnalysisBackend>, events: mpsc::Sender<SessionEvent>) -> Self {
        Self {
            backend,
            events,
            capture: InputCapture::default(),
            readiness: Readiness::Unknown,
            model: None,
            probe_started: false,
            controller: SubmissionController::default(),
            store: ResultStore::default(),
            navigator: Navigator::default(),
            notice: None,
        }
    }

    /// Spawns the health probe. Only the first call does anything.
    pub fn start_probe(&mut self) -> bool {
        if self.probe_started {
            return false;
        }
        self.probe_started = true;
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = probe(backend.as_ref()).await;
            let _ = events.send(SessionEvent::ProbeFinished(outcome)).await;
        });
        true
    }

    pub fn submit(&mut self) -> SubmitAttempt {
        let submission = match self.controller.begin(&self.capture, self.readiness) {
            BeginOutcome::Started(submission) => submission,
            BeginOutcome::Busy => {
                tracing::debug!("submit ignored, request in flight");
                return SubmitAttempt::Busy;
            }
            BeginOutcome::Rejected(err) => {
                tracing::info!(kind = err.kind(), "submission rejected");
                self.notice = Some(err.clone());
                return SubmitAttempt::Rejected(err);
            }
        };
        self.notice = None;
        let ticket = submission.ticket;
        tracing::info!(%ticket, mode = submission.request.mode().label(), "submission started");
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = backend.analyze(&submission.request).await;
            let _ = events
                .send(SessionEvent::SubmissionFinished { ticket, outcome })
                .await;
        });
        SubmitAttempt::Started(ticket)
    }

    pub fn apply(&mut self, event: SessionEvent) -> Applied {
        match event {
            SessionEvent::ProbeFinished(outcome) => {
                if self.readiness.is_resolved() {
                    tracing::debug!("late probe result ignored");
                    return Applied::Ignored;
                }
                self.readiness = outcome.readiness;
                self.model = outcome.model;
                Applied::Readiness(self.readiness)
            }
            SessionEvent::SubmissionFinished { ticket, outcome } => {
                match self.controller.complete(ticket, outcome) {
                    Completion::Succeeded(result) => {
                        tracing::info!(
                            %ticket,
                            flags = result.flag_count(),
                            "submission finished"
                        );
                        self.store.put(result);
                        self.navigator.activate_results(&self.store);
                        Applied::Stored
                    }
                    Completion::Failed(err) => {
                        tracing::warn!(%ticket, kind = err.kind(), "submission failed");
                        self.notice = Some(err.clone());
                        Applied::Failed(err)
                    }
                    Completion::Discarded => {
                        tracing::info!(%ticket, "late submission result discarded");
                        Applied::Discarded
                    }
                    Completion::Stale => {
                        tracing::debug!(%ticket, "stale submission result ignored");
                        Applied::Ignored
                    }
                }
            }
        }
    }

    /// Leaving the input view while a request is in flight abandons it.
    pub fn open_results(&mut self) -> View {
        let view = self.navigator.activate_results(&self.store);
        if view == View::Results && self.controller.detach() {
            tracing::info!("input view left, pending submission detached");
        }
        view
    }

    pub fn back_to_input(&mut self) -> View {
        self.navigator.back()
    }

    pub fn view(&self) -> View {
        self.navigator.current()
    }

    pub fn capture(&self) -> &InputCapture {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut InputCapture {
        &mut self.capture
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.controller.is_submitting()
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn notice(&self) -> Option<&SubmitError> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub fn presentation(&self, scale: RiskScale) -> Option<ResultPresentation> {
        self.store
            .get()
            .map(|result| ResultPresentation::new(result, scale))
    }

    pub fn report(&self) -> Result<Artifact, ExportError> {
        self.store
            .get()
            .map(report_artifact)
            .ok_or(ExportError::NothingToExport)
    }

    pub fn summary_export(&self) -> Result<Artifact, ExportError> {
        let result = self.store.get().ok_or(ExportError::NothingToExport)?;
        summary_artifact(result).ok_or(ExportError::EmptySummary)
    }
}
