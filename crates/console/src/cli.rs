use clap::{Parser, Subcommand};
use protocol::config::Skin;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "verifai",
    version,
    about = "Document summarization and misinformation check client"
)]
pub(crate) struct Args {
    #[arg(long, global = true, default_value = "config/verifai.toml")]
    pub(crate) config: PathBuf,
    /// Overrides `service_url` from the config file.
    #[arg(long, global = true)]
    pub(crate) service_url: Option<String>,
    #[arg(long, global = true, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    /// editorial or compact
    #[arg(long, global = true)]
    pub(crate) skin: Option<Skin>,
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Analyse one document and print the verdict.
    Analyze(AnalyzeArgs),
    /// Check whether the analysis engine is up.
    Health,
}

#[derive(clap::Args, Debug)]
pub(crate) struct AnalyzeArgs {
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub(crate) text: Option<String>,
    /// A .txt or .pdf document.
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Also write the plain-text report to this path.
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub(crate) json: bool,
}
