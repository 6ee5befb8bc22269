use super::context::AppContext;
use super::ui;
use anyhow::Result;
use docqa_core::traits::VectorIndex;
use std::path::Path;

pub async fn handle_status(config_path: Option<&Path>) -> Result<()> {
    let ctx = AppContext::open(config_path)?;
    let index = &ctx.index;

    ui::print_header("Collection");
    ui::print_key_value("Name", index.collection());
    ui::print_key_value("Path", &index.path().display().to_string());
    ui::print_key_value("Records", &index.count().await?.to_string());
    ui::print_key_value(
        "Embedding",
        &format!("{} ({})", ctx.config.embedding.backend, ctx.config.embedding.model()),
    );
    ui::print_key_value(
        "LLM",
        &format!("{} ({})", ctx.config.llm.backend, ctx.config.llm.model()),
    );

    let documents = index.documents()?;
    if !documents.is_empty() {
        ui::print_header("Documents");
        for (id, chunks) in &documents {
            println!("  {:>5}  {}", chunks, id);
        }
    }
    Ok(())
}
