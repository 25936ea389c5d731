use analysis_core::capture::DocumentFile;
use analysis_core::presentation::{ResultPresentation, ResultsTab};
use analysis_core::{Applied, InputMode, RiskScale, Session, SessionEvent, SubmitAttempt, View};
use protocol::config::Skin;
use std::path::{Path, PathBuf};

use crate::preferences::{Preferences, ThemeMode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Focus {
    /// Text area in text mode, path prompt in file mode.
    #[default]
    Editor,
    Query,
    Submit,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Editor => Focus::Query,
            Focus::Query => Focus::Submit,
            Focus::Submit => Focus::Editor,
        }
    }
}

pub(crate) struct AppState {
    pub(crate) session: Session,
    pub(crate) skin: Skin,
    pub(crate) preferences: Preferences,
    pub(crate) report_dir: PathBuf,
    pub(crate) focus: Focus,
    pub(crate) path_input: String,
    pub(crate) file_error: Option<String>,
    pub(crate) truncated: bool,
    pub(crate) results_tab: ResultsTab,
    pub(crate) status_message: Option<String>,
    pub(crate) confirm_quit: bool,
}

impl AppState {
    pub(crate) fn new(
        session: Session,
        skin: Skin,
        preferences: Preferences,
        report_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            skin,
            preferences,
            report_dir,
            focus: Focus::default(),
            path_input: String::new(),
            file_error: None,
            truncated: false,
            results_tab: ResultsTab::default(),
            status_message: None,
            confirm_quit: false,
        }
    }

    pub(crate) fn handle_event(&mut self, event: SessionEvent) {
        if let Applied::Stored = self.session.apply(event) {
            self.results_tab = ResultsTab::default();
            self.status_message = None;
        }
    }

    pub(crate) fn scale(&self) -> RiskScale {
        self.skin.into()
    }

    pub(crate) fn theme_mode(&self) -> ThemeMode {
        self.preferences.theme()
    }

    pub(crate) fn view(&self) -> View {
        self.session.view()
    }

    pub(crate) fn presentation(&self) -> Option<ResultPresentation> {
        self.session.presentation(self.scale())
    }

    /// Submission is offered only when it could actually start.
    pub(crate) fn can_submit(&self) -> bool {
        !self.session.is_submitting() && !self.session.readiness().blocks_submission()
    }

    pub(crate) fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub(crate) fn toggle_mode(&mut self) {
        self.session.capture_mut().toggle_mode();
        self.focus = Focus::Editor;
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        match self.focus {
            Focus::Editor => match self.session.capture().mode() {
                InputMode::Text => {
                    self.truncated = !self.session.capture_mut().push_char(ch);
                }
                InputMode::File => self.path_input.push(ch),
            },
            Focus::Query => self.session.capture_mut().push_query_char(ch),
            Focus::Submit => {}
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.focus {
            Focus::Editor => match self.session.capture().mode() {
                InputMode::Text => {
                    self.session.capture_mut().pop_char();
                    self.truncated = false;
                }
                InputMode::File => {
                    self.path_input.pop();
                }
            },
            Focus::Query => {
                self.session.capture_mut().pop_query_char();
            }
            Focus::Submit => {}
        }
    }

    /// Enter: newline in the text area, load in the path prompt, submit on
    /// the button.
    pub(crate) fn confirm(&mut self) {
        match (self.focus, self.session.capture().mode()) {
            (Focus::Editor, InputMode::Text) => self.insert_char('\n'),
            (Focus::Editor, InputMode::File) => {
                self.load_file();
            }
            (Focus::Query, _) => self.cycle_focus(),
            (Focus::Submit, _) => self.submit(),
        }
    }

    pub(crate) fn load_file(&mut self) -> bool {
        let raw = self.path_input.trim();
        if raw.is_empty() {
            self.session.capture_mut().clear_file();
            self.file_error = None;
            return false;
        }
        let path = expand_home(raw);
        match DocumentFile::from_path(&path) {
            Ok(file) => {
                tracing::info!(name = file.name(), bytes = file.size(), "file selected");
                self.session.capture_mut().set_file(file);
                self.file_error = None;
                true
            }
            Err(err) => {
                tracing::info!(path = %path.display(), error = %err, "file rejected");
                self.session.capture_mut().clear_file();
                self.file_error = Some(err.to_string());
                false
            }
        }
    }

    pub(crate) fn submit(&mut self) {
        // Reload from the prompt so the bytes sent match the path shown.
        if self.session.capture().mode() == InputMode::File
            && !self.path_input.trim().is_empty()
            && !self.load_file()
        {
            return;
        }
        if let SubmitAttempt::Started(_) = self.session.submit() {
            self.status_message = None;
        }
    }

    pub(crate) fn open_results(&mut self) {
        self.session.open_results();
    }

    pub(crate) fn back_to_input(&mut self) {
        self.session.back_to_input();
        self.focus = Focus::Editor;
    }

    pub(crate) fn dismiss(&mut self) {
        if !self.session.dismiss_notice() {
            self.file_error = None;
        }
    }

    pub(crate) fn toggle_results_tab(&mut self) {
        self.results_tab = self.results_tab.toggle();
    }

    pub(crate) fn toggle_theme(&mut self) {
        let mode = self.preferences.toggle();
        tracing::info!(theme = mode.label(), "theme toggled");
    }

    pub(crate) fn offers_summary_download(&self) -> bool {
        self.skin == Skin::Compact
    }

    pub(crate) fn export_report(&mut self) {
        let outcome = self
            .session
            .report()
            .and_then(|artifact| artifact.write_to(&self.report_dir));
        self.status_message = Some(match outcome {
            Ok(path) => format!("Report saved to {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        });
    }

    pub(crate) fn export_summary(&mut self) {
        if !self.offers_summary_download() {
            return;
        }
        let outcome = self
            .session
            .summary_export()
            .and_then(|artifact| artifact.write_to(&self.report_dir));
        self.status_message = Some(match outcome {
            Ok(path) => format!("Summary saved to {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        });
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| Path::new(raw).to_path_buf()),
        None => PathBuf::from(raw),
    }
}
