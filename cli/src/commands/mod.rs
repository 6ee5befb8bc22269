pub mod ask;
pub mod chat;
pub mod context;
pub mod index;
pub mod status;
pub mod ui;
pub mod utils;

pub use ask::{handle_ask, AskArgs};
pub use chat::handle_chat;
pub use index::{handle_index, IndexArgs};
pub use status::handle_status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Ask questions about a folder of text documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (.toml, .yml, .yaml or .json)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log ingest and retrieval progress
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chunk, embed and store the documents
    Index(IndexArgs),
    /// Answer a single question
    Ask(AskArgs),
    /// Interactive question loop
    Chat {
        /// Documents to ingest if the collection is empty
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Show collection name, location and size
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_flags() {
        let cli = Cli::parse_from([
            "docqa",
            "index",
            "--dir",
            "articles",
            "--replace",
            "--chunk-size",
            "500",
            "--chunk-overlap",
            "50",
        ]);
        match cli.command {
            Commands::Index(args) => {
                assert_eq!(args.dir, Some(PathBuf::from("articles")));
                assert!(args.replace);
                assert_eq!(args.chunk_size, Some(500));
                assert_eq!(args.chunk_overlap, Some(50));
            }
            _ => panic!("expected index"),
        }
    }

    #[test]
    fn test_parse_ask_with_globals() {
        let cli = Cli::parse_from([
            "docqa",
            "ask",
            "What is ChatGPT?",
            "--top",
            "3",
            "--show-context",
            "--config",
            "my.toml",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.question, "What is ChatGPT?");
                assert_eq!(args.top, Some(3));
                assert!(args.show_context);
            }
            _ => panic!("expected ask"),
        }
    }
}
