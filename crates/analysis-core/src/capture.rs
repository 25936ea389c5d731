use std::path::Path;

use protocol::{extension_of, is_accepted_file_name, MAX_CHARS};

use crate::error::{CaptureError, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Text,
    File,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            InputMode::Text => "text",
            InputMode::File => "file",
        }
    }
}

/// An uploaded document. The client never limits its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    name: String,
    bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CaptureError> {
        let name = name.into();
        if !is_accepted_file_name(&name) {
            return Err(CaptureError::UnsupportedFile { name });
        }
        Ok(Self { name, bytes })
    }

    pub fn from_path(path: &Path) -> Result<Self, CaptureError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        if !is_accepted_file_name(&name) {
            return Err(CaptureError::UnsupportedFile { name });
        }
        let bytes = std::fs::read(path).map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime(&self) -> &'static str {
        match extension_of(&self.name).as_deref() {
            Some("pdf") => "application/pdf",
            _ => "text/plain",
        }
    }

    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size() as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityTier {
    Nominal,
    Warning,
    Critical,
}

/// Fill level of the text buffer against [`MAX_CHARS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharBudget {
    pub used: usize,
    pub max: usize,
}

impl CharBudget {
    pub fn percent(&self) -> f64 {
        if self.max == 0 {
            return 100.0;
        }
        (self.used as f64 / self.max as f64 * 100.0).min(100.0)
    }

    pub fn tier(&self) -> CapacityTier {
        let percent = self.percent();
        if percent > 90.0 {
            CapacityTier::Critical
        } else if percent > 70.0 {
            CapacityTier::Warning
        } else {
            CapacityTier::Nominal
        }
    }

    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.used)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisPayload {
    Text(String),
    File(DocumentFile),
}

/// What actually goes over the wire for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub payload: AnalysisPayload,
    pub query: Option<String>,
}

impl AnalysisRequest {
    pub fn mode(&self) -> InputMode {
        match self.payload {
            AnalysisPayload::Text(_) => InputMode::Text,
            AnalysisPayload::File(_) => InputMode::File,
        }
    }
}

/// Both input buffers plus the focus query. Switching mode keeps the other
/// buffer intact; only the active one is submitted.
#[derive(Debug, Clone, Default)]
pub struct InputCapture {
    mode: InputMode,
    text: String,
    file: Option<DocumentFile>,
    query: String,
}

impl InputCapture {
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn select_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            InputMode::Text => InputMode::File,
            InputMode::File => InputMode::Text,
        };
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text buffer, truncating at [`MAX_CHARS`]. Returns true when
    /// input was cut.
    pub fn set_text(&mut self, text: &str) -> bool {
        match text.char_indices().nth(MAX_CHARS) {
            Some((cut, _)) => {
                self.text = text[..cut].to_string();
                true
            }
            None => {
                self.text = text.to_string();
                false
            }
        }
    }

    /// Appends one character unless the buffer is full.
    pub fn push_char(&mut self, ch: char) -> bool {
        if self.char_count() >= MAX_CHARS {
            return false;
        }
        self.text.push(ch);
        true
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn char_budget(&self) -> CharBudget {
        CharBudget {
            used: self.char_count(),
            max: MAX_CHARS,
        }
    }

    pub fn file(&self) -> Option<&DocumentFile> {
        self.file.as_ref()
    }

    pub fn set_file(&mut self, file: DocumentFile) {
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push_query_char(&mut self, ch: char) {
        self.query.push(ch);
    }

    pub fn pop_query_char(&mut self) -> Option<char> {
        self.query.pop()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.mode {
            InputMode::Text if self.text.trim().is_empty() => Err(ValidationError::EmptyText),
            InputMode::File if self.file.is_none() => Err(ValidationError::MissingFile),
            _ => Ok(()),
        }
    }

    /// Validates and snapshots the active buffer into a request.
    pub fn build_request(&self) -> Result<AnalysisRequest, ValidationError> {
        self.validate()?;
        let payload = match (self.mode, &self.file) {
            (InputMode::Text, _) => AnalysisPayload::Text(self.text.clone()),
            (InputMode::File, Some(file)) => AnalysisPayload::File(file.clone()),
            (InputMode::File, None) => return Err(ValidationError::MissingFile),
        };
        let query = Some(self.query.trim())
            .filter(|query| !query.is_empty())
            .map(str::to_string);
        Ok(AnalysisRequest { payload, query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> DocumentFile {
        DocumentFile::new("paper.pdf", b"%PDF-1.7".to_vec()).expect("file")
    }

    #[test]
    fn switching_mode_keeps_other_buffer() {
        let mut capture = InputCapture::default();
        capture.set_text("claims");
        capture.select_mode(InputMode::File);
        capture.set_file(pdf());
        capture.select_mode(InputMode::Text);
        assert_eq!(capture.text(), "claims");
        assert!(capture.file().is_some());

        let request = capture.build_request().expect("request");
        assert_eq!(request.payload, AnalysisPayload::Text("claims".into()));
    }

    #[test]
    fn only_active_buffer_is_sent() {
        let mut capture = InputCapture::default();
        capture.set_text("ignored");
        capture.select_mode(InputMode::File);
        capture.set_file(pdf());
        let request = capture.build_request().expect("request");
        assert_eq!(request.mode(), InputMode::File);
        assert!(matches!(request.payload, AnalysisPayload::File(ref f) if f.name() == "paper.pdf"));
    }

    #[test]
    fn blank_text_fails_validation() {
        let mut capture = InputCapture::default();
        capture.set_text("   \n\t");
        assert_eq!(capture.validate(), Err(ValidationError::EmptyText));
    }

    #[test]
    fn file_mode_without_file_fails_validation() {
        let mut capture = InputCapture::default();
        capture.set_text("plenty of text");
        capture.select_mode(InputMode::File);
        assert_eq!(capture.build_request(), Err(ValidationError::MissingFile));
    }

    #[test]
    fn set_text_truncates_at_max_chars() {
        let mut capture = InputCapture::default();
        let long = "é".repeat(MAX_CHARS + 10);
        assert!(capture.set_text(&long));
        assert_eq!(capture.char_count(), MAX_CHARS);
        assert!(!capture.push_char('x'));
        assert_eq!(capture.char_budget().remaining(), 0);
    }

    #[test]
    fn capacity_tiers() {
        let budget = |used| CharBudget { used, max: 100 };
        assert_eq!(budget(70).tier(), CapacityTier::Nominal);
        assert_eq!(budget(71).tier(), CapacityTier::Warning);
        assert_eq!(budget(90).tier(), CapacityTier::Warning);
        assert_eq!(budget(91).tier(), CapacityTier::Critical);
        assert_eq!(budget(250).percent(), 100.0);
    }

    #[test]
    fn blank_query_is_not_sent() {
        let mut capture = InputCapture::default();
        capture.set_text("text");
        capture.set_query("   ");
        assert_eq!(capture.build_request().expect("request").query, None);
        capture.set_query(" health claims ");
        assert_eq!(
            capture.build_request().expect("request").query.as_deref(),
            Some("health claims")
        );
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = DocumentFile::new("deck.pptx", Vec::new()).unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedFile { .. }));
    }

    #[test]
    fn file_metadata() {
        let file = DocumentFile::new("notes.TXT", vec![0; 2048]).expect("file");
        assert_eq!(file.mime(), "text/plain");
        assert_eq!(file.size_label(), "2.0 KB");
        assert_eq!(pdf().mime(), "application/pdf");
    }
}
