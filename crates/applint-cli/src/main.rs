//! applint - change-set linter for app store repositories
//!
//! ## Commands
//!
//! - `run`: lint the files changed between two revisions (or in the current
//!   pull request) and report the findings
//! - `render`: re-render a previously exported report without the network

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use applint_core::render::{parse_export, render};
use applint_core::{
    decide, CheckRunSink, CommandChecker, LintConfig, LintPipeline, Platform, ReportSink, Trigger,
    WorkflowSink,
};
use applint_github::{GitHubClient, GitHubConfig, DEFAULT_API_URL};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(name = "applint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint the app files changed in a pull request", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lint a revision range and publish the report
    Run(RunArgs),

    /// Re-render an exported report to stdout
    Render {
        /// Structured export written by `run --export`
        #[arg(short, long)]
        input: PathBuf,

        /// View to print
        #[arg(long, value_enum, default_value_t = View::Summary)]
        view: View,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Base revision (defaults to the pull request base)
    #[arg(long, env = "INPUT_BASE")]
    base: Option<String>,

    /// Head revision (defaults to the pull request head)
    #[arg(long, env = "INPUT_HEAD_SHA")]
    head_sha: Option<String>,

    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Event payload of the triggering workflow run
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Validator executable speaking the JSON checker protocol
    #[arg(long, env = "APPLINT_CHECKER")]
    checker: String,

    /// Extra argument for the validator (repeatable)
    #[arg(long = "checker-arg", allow_hyphen_values = true)]
    checker_args: Vec<String>,

    /// Per-check timeout, 0 disables it
    #[arg(long, default_value_t = 120)]
    checker_timeout_secs: u64,

    /// Checks in flight at once
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Skip image architecture verification for compose files
    #[arg(long)]
    no_architecture_check: bool,

    /// Top-level directory excluded from structural checks (repeatable)
    #[arg(long = "ignore-unit")]
    ignore_units: Vec<String>,

    /// Where the report goes
    #[arg(long, value_enum, default_value_t = SinkKind::Workflow)]
    sink: SinkKind,

    /// Check run name for the check-run sink
    #[arg(long, default_value = "app-linter")]
    check_name: String,

    /// Do not comment on the pull request
    #[arg(long)]
    no_comment: bool,

    /// Also write the structured export to this file
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// Workflow commands, job summary and step outputs
    Workflow,
    /// A completed check run with annotations
    CheckRun,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    Summary,
    Comment,
    Annotations,
    Export,
}

impl RunArgs {
    fn lint_config(&self) -> LintConfig {
        let mut config = LintConfig::default()
            .with_concurrency(self.concurrency)
            .with_architecture_check(!self.no_architecture_check)
            .with_comment(!self.no_comment);
        for unit in &self.ignore_units {
            config = config.ignoring_unit(unit);
        }
        config
    }

    fn github_config(&self) -> Result<GitHubConfig> {
        let mut config = GitHubConfig::for_repository(&self.repository)?.with_api_url(&self.api_url);
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        Ok(config)
    }

    fn trigger(&self) -> Result<Trigger> {
        match &self.event_path {
            Some(path) if path.exists() => {
                Trigger::from_event_file(path, self.base.clone(), self.head_sha.clone())
                    .with_context(|| format!("read event payload {}", path.display()))
            }
            _ => Ok(Trigger::new(self.base.clone(), self.head_sha.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    applint_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Render { input, view } => cmd_render(&input, view).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Action failed with error {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run passed.
async fn cmd_run(args: RunArgs) -> Result<bool> {
    let trigger = args.trigger()?;
    let client = GitHubClient::new(args.github_config()?).context("Failed to build GitHub client")?;
    let platform: Arc<dyn Platform> = Arc::new(client);

    let checker = CommandChecker::new(
        args.checker.clone(),
        args.checker_args.clone(),
        args.checker_timeout_secs,
    );
    let pipeline = LintPipeline::new(Arc::clone(&platform), Arc::new(checker), args.lint_config())?;

    let sink: Box<dyn ReportSink> = match args.sink {
        SinkKind::Workflow => Box::new(WorkflowSink::from_env()),
        SinkKind::CheckRun => Box::new(CheckRunSink::new(Arc::clone(&platform), args.check_name.clone())),
    };
    debug!(sink = sink.name(), "report sink selected");

    let result = pipeline.execute(&trigger, sink.as_ref()).await?;

    if let Some(path) = &args.export {
        std::fs::write(path, &result.rendered.export)
            .with_context(|| format!("write {:?}", path))?;
        info!(path = %path.display(), "export written");
    }

    if result.failed() {
        eprintln!("{}", result.outcome.title);
        return Ok(false);
    }
    info!(title = %result.outcome.title, "Lint run passed");
    Ok(true)
}

fn render_view(raw: &str, view: View) -> Result<String> {
    let report = parse_export(raw).context("parse export")?;
    let outcome = decide(&report);
    let rendered = render(&report, &outcome)?;
    Ok(match view {
        View::Summary => rendered.summary,
        View::Comment => rendered.comment,
        View::Annotations => rendered
            .annotations
            .iter()
            .map(|a| format!("{}\n", a.to_workflow_command()))
            .collect(),
        View::Export => format!("{}\n", rendered.export),
    })
}

fn cmd_render(input: &Path, view: View) -> Result<()> {
    let raw = std::fs::read_to_string(input).with_context(|| format!("read {:?}", input))?;
    print!("{}", render_view(&raw, view)?);
    Ok(())
}
