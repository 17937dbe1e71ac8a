//! amnesia-editor - Command line front end for the editing pipeline
//!
//! Talks to the rendering service (health, export of a prepared layout) and
//! diffs the text of two document versions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amnesia_editor::diff::{diff_words, DiffKind, DiffResult, DiffSummary};
use amnesia_editor::export::{LayoutExporter, RenderServiceClient};
use amnesia_editor::layout::LayoutModel;
use amnesia_editor::Config;

#[derive(Parser, Debug)]
#[command(name = "amnesia-editor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rendering service base URL (overrides RENDER_SERVICE_URL)
    #[arg(long, global = true)]
    service_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the rendering service is up
    Health,

    /// Send a document and an edited layout to the rendering service
    Export {
        /// Original document
        #[arg(long)]
        pdf: PathBuf,

        /// Layout model JSON (native units)
        #[arg(long)]
        layout: PathBuf,

        /// Where to write the regenerated document
        #[arg(long)]
        out: PathBuf,
    },

    /// Word diff of two text files
    Diff {
        #[arg(long)]
        old: PathBuf,

        #[arg(long)]
        new: PathBuf,

        /// Print the diff as JSON
        #[arg(long)]
        json: bool,
    },
}

fn read_layout(path: &Path) -> anyhow::Result<LayoutModel> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout {}", path.display()))?;
    LayoutModel::from_json(&json).with_context(|| format!("Invalid layout {}", path.display()))
}

/// `+word` / `-word` / ` word`, one token per line
fn render_diff(diff: &[DiffResult<String>]) -> String {
    let mut out = String::new();
    for step in diff {
        let marker = match step.kind {
            DiffKind::Add => '+',
            DiffKind::Remove => '-',
            DiffKind::Keep => ' ',
        };
        out.push(marker);
        out.push_str(&step.value);
        out.push('\n');
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "amnesia_editor=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = args.service_url {
        config.render_service.base_url = url;
    }

    match args.command {
        Command::Health => {
            let client = RenderServiceClient::new(config.render_service)?;
            let status = client.health().await?;
            println!("{}", status);
        }
        Command::Export { pdf, layout, out } => {
            let layout = read_layout(&layout)?;
            let document = fs::read(&pdf)
                .with_context(|| format!("Failed to read document {}", pdf.display()))?;

            let client = RenderServiceClient::new(config.render_service)?;
            let output = client.export(document, &layout).await?;
            fs::write(&out, &output)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            tracing::info!("Wrote {} bytes to {}", output.len(), out.display());
        }
        Command::Diff { old, new, json } => {
            let old_text = fs::read_to_string(&old)
                .with_context(|| format!("Failed to read {}", old.display()))?;
            let new_text = fs::read_to_string(&new)
                .with_context(|| format!("Failed to read {}", new.display()))?;

            let diff = diff_words(&old_text, &new_text);
            if json {
                println!("{}", serde_json::to_string_pretty(&diff)?);
            } else {
                print!("{}", render_diff(&diff));
                let summary = DiffSummary::of(&diff);
                eprintln!(
                    "{} added, {} removed, {} unchanged",
                    summary.added, summary.removed, summary.kept
                );
            }
        }
    }

    Ok(())
}
