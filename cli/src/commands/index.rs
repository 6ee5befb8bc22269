use super::context::AppContext;
use super::ui;
use anyhow::{Context, Result};
use clap::Args;
use docqa_config::ReingestPolicy;
use docqa_core::loader::load_documents;
use docqa_core::Document;
use docqa_pipeline::{CancellationToken, IngestReport, Retriever};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory of documents (defaults to core.documents_dir)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Drop stale chunks of each re-ingested document
    #[arg(long)]
    pub replace: bool,

    #[arg(long, value_name = "N")]
    pub chunk_size: Option<usize>,

    #[arg(long, value_name = "N")]
    pub chunk_overlap: Option<usize>,
}

pub async fn handle_index(args: IndexArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = super::context::load_config(config_path)?;
    if let Some(size) = args.chunk_size {
        config.chunking.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        config.chunking.chunk_overlap = overlap;
    }
    if args.replace {
        config.ingest.reingest = ReingestPolicy::Replace;
    }
    let dir = args.dir.unwrap_or_else(|| config.core.documents_dir.clone());

    let ctx = AppContext::with_config(config)?;
    let retriever = ctx.retriever()?;

    ui::print_header(&format!("Indexing {}", dir.display()));
    let report = ingest_dir(&ctx, &retriever, &dir).await?;
    print_report(&report);
    Ok(())
}

/// Load every document under `dir` and ingest it, cancelling on Ctrl-C.
pub async fn ingest_dir(ctx: &AppContext, retriever: &Retriever, dir: &Path) -> Result<IngestReport> {
    let loaded = load_documents(dir, &ctx.config.documents)
        .with_context(|| format!("failed to read documents from {}", dir.display()))?;
    for failure in &loaded.failures {
        ui::print_error(&format!("{}: {}", failure.path.display(), failure.message));
    }
    if loaded.documents.is_empty() {
        warn!("no documents found in {}", dir.display());
    }
    info!("loaded {} documents", loaded.documents.len());

    let report = ingest_with_bar(retriever, &loaded.documents).await?;
    ctx.index.flush().await?;
    Ok(report)
}

async fn ingest_with_bar(retriever: &Retriever, documents: &[Document]) -> Result<IngestReport> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let pb = ProgressBar::new(documents.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }

    let params = retriever.options().chunk_params()?;
    let progress = |id: &str| {
        pb.set_message(id.to_string());
        pb.inc(1);
    };
    let result = retriever
        .ingest_with_progress(documents, params, &cancel, &progress)
        .await;
    watcher.abort();

    if cancel.is_cancelled() {
        pb.abandon_with_message("cancelled");
    } else {
        pb.finish_with_message("done");
    }
    Ok(result?)
}

pub fn print_report(report: &IngestReport) {
    ui::print_key_value("Documents indexed", &report.documents_indexed.to_string());
    ui::print_key_value("Chunks written", &report.chunks_upserted.to_string());
    ui::print_key_value("Chunks unchanged", &report.chunks_unchanged.to_string());
    if report.chunks_skipped_empty > 0 {
        ui::print_key_value("Empty chunks skipped", &report.chunks_skipped_empty.to_string());
    }
    if report.records_removed > 0 {
        ui::print_key_value("Stale chunks removed", &report.records_removed.to_string());
    }
    if report.skipped_cancelled > 0 {
        ui::print_key_value(
            "Skipped (cancelled)",
            &report.skipped_cancelled.to_string(),
        );
    }
    for failure in &report.failures {
        ui::print_error(&format!("{}: {}", failure.document_id, failure.error));
    }
    if report.failures.is_empty() && report.skipped_cancelled == 0 {
        ui::print_success("Index is up to date.");
    }
}
