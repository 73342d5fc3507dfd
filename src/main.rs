//! repograph CLI binary
//!
//! This is the main entry point for the repograph command-line interface.
//! The CLI is a thin adapter over existing APIs - NO logic is implemented here.

use futures::StreamExt;
use repograph::cli::{CliErrorPayload, CliSuccessPayload, Commands, OutputFormat, RunSummary};
use repograph::RepoGraphError;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = repograph::cli::parse_args();

    // Initialize logger if verbose or explicitly configured
    if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    }

    // Execute command
    let result = match cli.command {
        Commands::Extract {
            repo,
            languages,
            shallow,
            batch_size,
            config,
            format,
        } => match repograph::cli::resolve_config(config.as_deref(), &languages, shallow, batch_size)
        {
            Ok(config) => execute_extract(&repo, &config, format).await,
            Err(e) => Err(e),
        },

        Commands::List {
            repo,
            languages,
            config,
        } => match repograph::cli::resolve_config(config.as_deref(), &languages, false, None) {
            Ok(config) => execute_list(&repo, &config),
            Err(e) => Err(e),
        },
    };

    // Handle result
    match result {
        Ok(Some(payload)) => match serde_json::to_string_pretty(&payload) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => report(&RepoGraphError::Json(e)),
        },
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(error: &RepoGraphError) -> ExitCode {
    match serde_json::to_string_pretty(&CliErrorPayload::from_error(error)) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("Error: {}", error),
    }
    ExitCode::from(1)
}

/// Execute the extract command.
///
/// JSON-lines output is written as the stream produces it; the summary
/// payload is returned once the stream is drained.
async fn execute_extract(
    repo: &Path,
    config: &repograph::ExtractionConfig,
    format: OutputFormat,
) -> Result<Option<CliSuccessPayload>, RepoGraphError> {
    let stream = repograph::extract_repository(repo, config)?;
    futures::pin_mut!(stream);

    let stdout = std::io::stdout();
    let mut summary = RunSummary::default();

    while let Some(node) = stream.next().await {
        summary.record(&node);
        if format == OutputFormat::Jsonl {
            let line = serde_json::to_string(&node)?;
            let mut out = stdout.lock();
            writeln!(out, "{}", line).map_err(|source| RepoGraphError::Io {
                path: "<stdout>".into(),
                source,
            })?;
        }
    }

    match format {
        OutputFormat::Jsonl => Ok(None),
        OutputFormat::Summary => {
            let message = format!(
                "Extracted {} entities from {} files",
                summary.total_entities(),
                summary.files
            );
            Ok(Some(CliSuccessPayload::with_data(
                message,
                serde_json::to_value(&summary)?,
            )))
        }
    }
}

/// Execute the list command.
fn execute_list(
    repo: &Path,
    config: &repograph::ExtractionConfig,
) -> Result<Option<CliSuccessPayload>, RepoGraphError> {
    let files = repograph::repo::list_repository(repo, config)?;
    if files.is_empty() {
        return Ok(Some(CliSuccessPayload::message_only(
            "No source files found".to_string(),
        )));
    }

    let paths: Vec<String> = files
        .iter()
        .map(|f| f.to_string_lossy().to_string())
        .collect();
    Ok(Some(CliSuccessPayload::with_data(
        format!("{} source files", paths.len()),
        serde_json::to_value(paths)?,
    )))
}
