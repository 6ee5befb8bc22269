use super::ask::print_answer;
use super::context::AppContext;
use super::index::{ingest_dir, print_report};
use super::ui;
use anyhow::Result;
use console::Style;
use docqa_core::traits::VectorIndex;
use docqa_core::RagError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

const SAMPLE_QUESTIONS: [&str; 5] = [
    "What is ChatGPT?",
    "Tell me about AI investments",
    "What companies are working on AI?",
    "What are the main AI trends mentioned?",
    "How is AI affecting different industries?",
];

enum Input {
    Quit,
    Help,
    Empty,
    Question(String),
}

fn classify(line: &str) -> Input {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        "help" => Input::Help,
        "" => Input::Empty,
        _ => Input::Question(trimmed.to_string()),
    }
}

pub async fn handle_chat(dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let ctx = AppContext::open(config_path)?;
    let assembler = ctx.assembler()?;

    if ctx.index.count().await? == 0 {
        let dir = dir.unwrap_or_else(|| ctx.config.core.documents_dir.clone());
        ui::print_header(&format!("Collection is empty, indexing {}", dir.display()));
        let report = ingest_dir(&ctx, assembler.retriever(), &dir).await?;
        print_report(&report);
    }

    ui::print_panel(
        "docqa",
        "Ask questions about your documents.\nType 'help' for sample questions, 'quit' to exit.",
        Style::new().cyan(),
        None,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{} ", Style::new().bold().green().apply_to("?"));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = match classify(&line) {
            Input::Quit => break,
            Input::Empty => continue,
            Input::Help => {
                print_samples();
                continue;
            }
            Input::Question(q) => q,
        };

        match assembler.answer_question(&question).await {
            Ok(answer) => print_answer(&answer, false),
            Err(RagError::EmptyQuery) => continue,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_samples() {
    ui::print_header("Sample questions");
    for q in SAMPLE_QUESTIONS {
        println!("  - {}", q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_commands() {
        assert!(matches!(classify("quit"), Input::Quit));
        assert!(matches!(classify("  EXIT "), Input::Quit));
        assert!(matches!(classify("q"), Input::Quit));
        assert!(matches!(classify("help"), Input::Help));
        assert!(matches!(classify("   "), Input::Empty));
    }

    #[test]
    fn test_classify_question_is_trimmed() {
        match classify("  What is ChatGPT?\n") {
            Input::Question(q) => assert_eq!(q, "What is ChatGPT?"),
            _ => panic!("expected a question"),
        }
    }
}
