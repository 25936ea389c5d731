pub mod backend;
pub mod capture;
pub mod controller;
pub mod error;
pub mod navigation;
pub mod presentation;
pub mod readiness;
pub mod report;
pub mod risk;
pub mod session;
pub mod store;

pub use backend::{AnalysisBackend, HttpBackend};
pub use capture::{AnalysisRequest, DocumentFile, InputCapture, InputMode};
pub use error::{BackendError, CaptureError, ExportError, SubmitError, ValidationError};
pub use navigation::View;
pub use readiness::Readiness;
pub use risk::{classify, RiskLevel, RiskScale};
pub use session::{Applied, Session, SessionEvent, SubmitAttempt};
