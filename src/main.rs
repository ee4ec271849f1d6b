//! @ai:module:intent CLI for load-test result reports
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use loadtest_report::{
    config::ReportConfig,
    metrics::RunStatus,
    report::ExportFormat,
    service::{AnalysisOptions, ReportService},
    store::{FileRunStore, RunQuery},
    RelayEvent,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

const DEFAULT_CONFIG_FILE: &str = "loadtest-report.toml";

#[derive(Parser)]
#[command(name = "loadtest-report")]
#[command(about = "Summaries, exports and AI analysis of LLM load-test runs")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of a run
    Status {
        run_id: String,
    },

    /// List past runs, newest first
    History {
        #[arg(short, long, default_value = "50")]
        limit: usize,

        #[arg(long, default_value = "0")]
        offset: usize,

        /// Only runs in this state (pending, running, completed, failed)
        #[arg(long)]
        status: Option<RunStatus>,
    },

    /// Print a run's result as JSON, summary included
    #[command(name = "result")]
    ShowResult {
        run_id: String,
    },

    /// Export a run's result as CSV or XLSX
    Export {
        run_id: String,

        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output directory (defaults to export.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the analysis prompt for a run
    Prompt {
        run_id: String,
    },

    /// Stream an AI analysis of a run
    Analyze {
        run_id: String,

        /// Analysis server base URL
        #[arg(long)]
        server_url: Option<String>,

        /// Model used for the analysis
        #[arg(long)]
        model: Option<String>,

        /// Print report text instead of SSE frames
        #[arg(long)]
        raw: bool,
    },

    /// Render throughput and latency charts for a run
    Charts {
        run_id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loadtest_report=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Init { output } = &cli.command {
        return init_config(output);
    }

    let config = load_or_default_config(cli.config)?;
    let store = Arc::new(FileRunStore::new(config.store.runs_dir.clone()));
    let service = ReportService::new(store, config)?;

    match cli.command {
        Commands::Status { run_id } => show_status(&service, &run_id),
        Commands::History { limit, offset, status } => show_history(&service, RunQuery { limit, offset, status }),
        Commands::ShowResult { run_id } => show_result(&service, &run_id),
        Commands::Export { run_id, format, output } => export(&service, &run_id, format, output),
        Commands::Prompt { run_id } => {
            println!("{}", service.analysis_prompt(&run_id)?);
            Ok(())
        }
        Commands::Analyze {
            run_id,
            server_url,
            model,
            raw,
        } => analyze(&service, &run_id, AnalysisOptions { server_url, model }, raw).await,
        Commands::Charts { run_id, output } => charts(&service, &run_id, output),
        Commands::Init { .. } => Ok(()),
    }
}

type Service = ReportService<FileRunStore>;

/// @ai:intent Print one run's status record
/// @ai:effects fs:read
fn show_status(service: &Service, run_id: &str) -> Result<()> {
    let run = service.run_status(run_id)?;

    println!("Run:        {}", run.run_id);
    println!("Status:     {}", run.status);
    println!("Server:     {}", run.server_url);
    println!("Model:      {}", run.model);
    println!("Adapter:    {}", run.adapter);
    println!("Created:    {}", run.created_at.to_rfc3339());
    if let Some(started) = run.started_at {
        println!("Started:    {}", started.to_rfc3339());
    }
    if let Some(completed) = run.completed_at {
        println!("Completed:  {}", completed.to_rfc3339());
    }
    Ok(())
}

/// @ai:intent Print run history as a table
/// @ai:effects fs:read
fn show_history(service: &Service, query: RunQuery) -> Result<()> {
    let runs = service.list_runs(&query)?;

    println!("Runs ({}):", runs.len());
    println!();
    println!("{:<38} {:<10} {:<24} {:<20}", "ID", "Status", "Model", "Created");
    println!("{}", "-".repeat(94));

    for run in &runs {
        println!(
            "{:<38} {:<10} {:<24} {:<20}",
            run.run_id,
            run.status.as_str(),
            run.model,
            run.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// @ai:intent Print a result as pretty JSON
/// @ai:effects fs:read
fn show_result(service: &Service, run_id: &str) -> Result<()> {
    let result = service.result(run_id)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// @ai:intent Write an export document to disk
/// @ai:effects fs:read, fs:write
fn export(service: &Service, run_id: &str, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let document = service.export(run_id, format)?;
    let output_dir = output.unwrap_or_else(|| service.config().export.output_dir.clone());

    let path = document
        .write_to(&output_dir)
        .with_context(|| format!("Failed to write export to {}", output_dir.display()))?;
    println!("Exported {} ({})", path.display(), document.content_type);
    Ok(())
}

/// @ai:intent Render charts into a per-run directory
/// @ai:effects fs:read, fs:write
fn charts(service: &Service, run_id: &str, output: Option<PathBuf>) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| service.config().export.output_dir.join(run_id));
    let files = service.generate_charts(run_id, &output_dir)?;

    for file in files {
        println!("{}", output_dir.join(file).display());
    }
    Ok(())
}

/// @ai:intent Stream an analysis to stdout until done, failed or cancelled
/// @ai:effects network, fs:read
async fn analyze(service: &Service, run_id: &str, options: AnalysisOptions, raw: bool) -> Result<()> {
    let mut events = service.analyze(run_id, options)?;
    let mut stdout = tokio::io::stdout();

    let cancel = tokio::signal::ctrl_c();
    tokio::pin!(cancel);

    loop {
        let event = tokio::select! {
            _ = &mut cancel => {
                tracing::warn!("Analysis cancelled");
                break;
            }
            event = events.next() => event,
        };

        let Some(event) = event else { break };

        if raw {
            match &event {
                RelayEvent::Content(text) => stdout.write_all(text.as_bytes()).await?,
                RelayEvent::Done => stdout.write_all(b"\n").await?,
                RelayEvent::Error(message) => {
                    stdout.flush().await?;
                    anyhow::bail!("{}", message);
                }
            }
        } else {
            stdout.write_all(event.to_sse_frame().as_bytes()).await?;
        }
        stdout.flush().await?;
    }

    Ok(())
}

/// @ai:intent Write the default configuration
/// @ai:effects fs:write
fn init_config(output: &Path) -> Result<()> {
    let config = ReportConfig::default();
    config.save(output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<ReportConfig> {
    match path {
        Some(p) => ReportConfig::load(&p).with_context(|| format!("Failed to load config {}", p.display())),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                ReportConfig::load(&default_path)
            } else {
                Ok(ReportConfig::default())
            }
        }
    }
}
