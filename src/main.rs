//! auto-commit - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use autocommit::config::{CliOverrides, ProviderId, RunOptions, Style};
use autocommit::draft::SystemEditor;
use autocommit::git::{GitCli, open_repository};
use autocommit::llm::Backend;
use autocommit::pipeline::{Pipeline, RunOutcome};
use autocommit::staging::TerminalDecision;

/// Generate a commit message for the staged changes with an LLM.
#[derive(Parser, Debug)]
#[command(name = "auto-commit")]
#[command(about = "Generate a commit message for the staged changes with an LLM")]
#[command(version)]
struct Cli {
    /// Language of the generated message (default: COMMIT_LANGUAGE or English)
    #[arg(long)]
    lang: Option<String>,

    /// Model name (default: the provider's *_MODEL variable)
    #[arg(long)]
    model: Option<String>,

    /// Generation provider (default: AI_PROVIDER or gemini)
    #[arg(long, value_enum)]
    provider: Option<ProviderId>,

    /// Tone of the message
    #[arg(long, value_enum)]
    style: Option<Style>,

    /// Base URL of the Z.ai API
    #[arg(long)]
    zai_base_url: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    openai_base_url: Option<String>,

    /// Editor command used to review the message (overrides EDITOR)
    #[arg(long)]
    editor: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // A local .env may hold API keys; a missing file is fine.
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    let options = RunOptions::resolve(CliOverrides {
        language: cli.lang,
        model: cli.model,
        provider: cli.provider,
        style: cli.style,
        zai_base_url: cli.zai_base_url,
        openai_base_url: cli.openai_base_url,
        editor: cli.editor,
    })
    .context("Invalid configuration")?;
    debug!("Resolved options: {:?}", options);

    let cwd = std::env::current_dir().context("Could not read the current directory")?;
    let repo = open_repository(&cwd)
        .context("Not a git repository. Run auto-commit from within a git repository.")?;
    let workdir = repo
        .workdir()
        .context("Repository has no working directory")?
        .to_path_buf();

    let backend = Backend::from_config(&options.provider);
    let decision = TerminalDecision;
    let editor = SystemEditor::new(options.editor.clone());
    let publisher = GitCli::new(workdir);

    let pipeline = Pipeline {
        options: &options,
        backend: &backend,
        decision: &decision,
        editor: &editor,
        publisher: &publisher,
        scratch_dir: None,
    };

    let outcome = pipeline.run(&repo).await?;
    debug!("Run finished: {:?}", outcome);

    Ok(match outcome {
        RunOutcome::CommitFailed { code } => {
            ExitCode::from(code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1))
        }
        _ => ExitCode::SUCCESS,
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "autocommit=debug" } else { "autocommit=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
