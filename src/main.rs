// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;

use file_preview::core::render::{render_page, InlineViewer};
use file_preview::{PreviewConfig, PreviewSession, SelectedFile};

/// Preview local files as a single HTML page.
#[derive(Debug, Parser)]
#[command(name = "file-preview", version)]
struct Cli {
    /// Files to preview, in selection order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Where to write the rendered page.
    #[arg(short, long, default_value = "preview.html")]
    output: PathBuf,

    /// Print the view state as JSON instead of writing a page.
    #[arg(long)]
    json: bool,

    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference documents by locator instead of embedding their bytes.
    #[arg(long)]
    no_inline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PreviewConfig::load(path)?,
        None => PreviewConfig::default(),
    };
    if cli.no_inline {
        config.inline_documents = false;
    }

    let files: Vec<SelectedFile> = cli.files.iter().map(SelectedFile::from_path).collect();
    let session = PreviewSession::new(config.clone());
    let state = match session.select(files).await {
        Some(state) => state,
        None => session.snapshot().await,
    };

    for error in &state.errors {
        warn!("{}: {}", error.file_name, error.message);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let viewer = InlineViewer::new(Arc::clone(session.registry()), &config);
    let html = render_page(&state, &viewer, &config)?;
    tokio::fs::write(&cli.output, html)
        .await
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("✅ Preview saved to {}", cli.output.display());
    Ok(())
}
