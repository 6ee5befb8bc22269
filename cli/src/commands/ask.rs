use super::context::AppContext;
use super::ui;
use super::utils::{format_sources, render_markdown_answer};
use anyhow::Result;
use clap::Args;
use console::Style;
use docqa_pipeline::Answer;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve (defaults to retrieval.n_results)
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Print the retrieved sources after the answer
    #[arg(long)]
    pub show_context: bool,
}

pub async fn handle_ask(args: AskArgs, config_path: Option<&Path>) -> Result<()> {
    let ctx = AppContext::open(config_path)?;
    let assembler = ctx.assembler()?;

    let n_results = args.top.unwrap_or(ctx.config.retrieval.n_results);
    let answer = assembler
        .answer_with(
            &args.question,
            n_results,
            ctx.config.retrieval.max_context_length,
        )
        .await?;

    print_answer(&answer, args.show_context);
    Ok(())
}

pub fn print_answer(answer: &Answer, show_context: bool) {
    ui::print_header("Answer");
    println!("{}", render_markdown_answer(&answer.text));

    if show_context {
        let sources = format_sources(&answer.context);
        ui::print_panel("Sources", &sources, Style::new().blue(), None);
    }
}
