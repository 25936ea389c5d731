use analysis_core::presentation::{readiness_status, ResultPresentation};
use analysis_core::readiness::probe;
use analysis_core::report::render_report;
use analysis_core::{
    AnalysisBackend, Applied, DocumentFile, HttpBackend, InputMode, Readiness, RiskScale, Session,
    SessionEvent, SubmitAttempt, SubmitError,
};
use anyhow::Context;
use protocol::config::ClientConfig;
use protocol::AnalysisResult;
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cli::AnalyzeArgs;

pub(crate) async fn run_health(config: &ClientConfig) -> anyhow::Result<ExitCode> {
    let backend = HttpBackend::new(config)?;
    let outcome = probe(&backend).await;
    let readiness = outcome.readiness;
    println!("{}", readiness_status(readiness, outcome.model.as_deref()));
    Ok(if readiness == Readiness::Available {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Probe, submit once, print. Mirrors what the TUI does for a single document.
pub(crate) async fn run_analyze(
    config: &ClientConfig,
    args: &AnalyzeArgs,
) -> anyhow::Result<ExitCode> {
    let backend: Arc<dyn AnalysisBackend> = Arc::new(HttpBackend::new(config)?);
    let (event_tx, mut event_rx) = mpsc::channel::<SessionEvent>(4);
    let mut session = Session::new(backend, event_tx);

    session.start_probe();
    if let Some(event) = event_rx.recv().await {
        session.apply(event);
    }

    let capture = session.capture_mut();
    match (&args.text, &args.file) {
        (Some(text), _) => {
            capture.select_mode(InputMode::Text);
            if capture.set_text(text) {
                eprintln!("note: input truncated to {} characters", protocol::MAX_CHARS);
            }
        }
        (None, Some(path)) => {
            let file = DocumentFile::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            capture.set_file(file);
            capture.select_mode(InputMode::File);
        }
        (None, None) => anyhow::bail!("either --text or --file is required"),
    }
    if let Some(query) = &args.query {
        capture.set_query(query.as_str());
    }

    let outcome = match session.submit() {
        SubmitAttempt::Started(_) => wait_for_result(&mut session, &mut event_rx).await?,
        SubmitAttempt::Busy => anyhow::bail!("a submission is already in flight"),
        SubmitAttempt::Rejected(err) => Err(err),
    };

    let scale = RiskScale::from(config.skin);
    match outcome {
        Ok(result) => {
            if let Some(path) = &args.report {
                std::fs::write(path, render_report(&result))
                    .with_context(|| format!("failed to write report {}", path.display()))?;
                tracing::info!(path = %path.display(), "report written");
            }
            print_result(&result, scale, args.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print_failure(&err, args.json)?;
            Ok(ExitCode::from(1))
        }
    }
}

async fn wait_for_result(
    session: &mut Session,
    event_rx: &mut mpsc::Receiver<SessionEvent>,
) -> anyhow::Result<Result<AnalysisResult, SubmitError>> {
    while let Some(event) = event_rx.recv().await {
        match session.apply(event) {
            Applied::Stored => {
                let result = session
                    .store()
                    .get()
                    .cloned()
                    .context("stored result missing")?;
                return Ok(Ok(result));
            }
            Applied::Failed(err) => return Ok(Err(err)),
            _ => continue,
        }
    }
    anyhow::bail!("session closed before the submission finished")
}

fn print_result(result: &AnalysisResult, scale: RiskScale, as_json: bool) -> anyhow::Result<()> {
    let view = ResultPresentation::new(result, scale);
    if as_json {
        let body = json!({ "ok": true, "view": view, "result": result });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "{} risk ({}%) · {} flagged",
            view.risk.level.label(),
            view.risk.percent,
            view.flag_count
        );
        println!();
        println!("{}", render_report(result));
    }
    Ok(())
}

fn print_failure(err: &SubmitError, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let body = json!({ "ok": false, "kind": err.kind(), "message": err.to_string() });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        eprintln!("error: {err}");
    }
    Ok(())
}
